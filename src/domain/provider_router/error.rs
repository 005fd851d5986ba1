//! Router-local error taxonomy.

use thiserror::Error;

/// Failure returned by [`crate::domain::provider_router::ProviderRouter::parse_with`].
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// The provider has no registration.
    #[error("provider is not registered")]
    InvalidProvider,
    /// The provider is disabled, or rollout denies this org.
    #[error("provider is unavailable")]
    ProviderUnavailable,
    /// The global or per-org sliding-window quota is exhausted.
    #[error("quota exceeded")]
    QuotaExceeded,
    /// The provider's in-flight concurrency cap is reached.
    #[error("concurrency limit reached")]
    ConcurrencyLimit,
    /// The circuit breaker is open; calls are rejected without invoking the
    /// client.
    #[error("circuit breaker is open")]
    CircuitOpen,
    /// The provider client call itself failed; the message is surfaced
    /// verbatim, never remapped.
    #[error("{0}")]
    ClientFailure(String),
}
