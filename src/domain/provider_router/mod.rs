//! Gatekeeper between [`crate::domain::parse_service::ParseService`] and
//! provider clients.
//!
//! Enforces, per provider: enablement, per-tenant rollout, global and
//! per-tenant sliding-window quotas, max in-flight concurrency, and a
//! failure-count circuit breaker with cooldown, then delegates the parse to
//! a registered [`crate::domain::ports::ProviderClient`].

mod clock;
mod config;
mod error;
mod policy;

pub use clock::{MonotonicClock, SystemMonotonicClock};
#[cfg(test)]
pub use clock::FakeMonotonicClock;
pub use config::{ProviderConfig, ProviderRollout};
pub use error::RouterError;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::job::{Provider, ParsedEvent};
use policy::ProviderState;

struct Registration {
    config: ProviderConfig,
    state: ProviderState,
}

/// Gatekeeper enforcing quota, rollout, concurrency, and circuit-breaker
/// policy for every registered [`Provider`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use parsehub_backend::domain::job::Provider;
/// use parsehub_backend::domain::provider_router::{ProviderConfig, ProviderRouter};
/// use parsehub_backend::outbound::stub_provider::StubProviderClient;
///
/// # let runtime = tokio::runtime::Runtime::new().expect("runtime");
/// # runtime.block_on(async {
/// let router = ProviderRouter::new();
/// router.register(
///     Provider::Openai,
///     ProviderConfig::new(Arc::new(StubProviderClient::new("openai"))),
/// );
/// let events = router.parse_with(Provider::Openai, "org-1", "https://example.com/a.png").await;
/// assert!(events.is_ok());
/// # });
/// ```
pub struct ProviderRouter {
    registrations: Mutex<HashMap<Provider, Registration>>,
    clock: Arc<dyn MonotonicClock>,
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRouter {
    /// Construct a router using the system monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemMonotonicClock))
    }

    /// Construct a router using an injected clock (tests only, in practice).
    pub fn with_clock(clock: Arc<dyn MonotonicClock>) -> Self {
        Self {
            registrations: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Provider, Registration>> {
        match self.registrations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register (or re-register) a provider's configuration. Re-registration
    /// replaces both the config and its accumulated state.
    pub fn register(&self, provider: Provider, config: ProviderConfig) {
        let now = self.clock.now();
        self.lock().insert(
            provider,
            Registration {
                config,
                state: ProviderState::new(now),
            },
        );
    }

    /// Every currently registered provider, in unspecified order.
    pub fn available_providers(&self) -> Vec<Provider> {
        self.lock().keys().copied().collect()
    }

    /// The gated parse call: admission, then the client call outside the
    /// lock, then post-call bookkeeping.
    pub async fn parse_with(
        &self,
        provider: Provider,
        org_id: &str,
        source_url: &str,
    ) -> Result<Vec<ParsedEvent>, RouterError> {
        let client = self.admit(provider, org_id)?;

        let result = client.parse_timetable(source_url).await;

        match result {
            Ok(events) => {
                self.on_success(provider);
                Ok(events)
            }
            Err(error) => {
                self.on_failure(provider);
                Err(RouterError::ClientFailure(error.to_string()))
            }
        }
    }

    fn admit(
        &self,
        provider: Provider,
        org_id: &str,
    ) -> Result<Arc<dyn crate::domain::ports::ProviderClient>, RouterError> {
        let now = self.clock.now();
        let mut registrations = self.lock();
        let registration = registrations
            .get_mut(&provider)
            .ok_or(RouterError::InvalidProvider)?;

        if !registration.config.enabled {
            return Err(RouterError::ProviderUnavailable);
        }

        registration.state.check_circuit_open(now)?;

        if let Some(rollout) = &registration.config.rollout {
            if !rollout.admits(org_id) {
                return Err(RouterError::ProviderUnavailable);
            }
        }

        registration.state.admit(&registration.config, org_id, now)?;
        Ok(Arc::clone(&registration.config.client))
    }

    fn on_success(&self, provider: Provider) {
        if let Some(registration) = self.lock().get_mut(&provider) {
            registration.state.record_success();
        }
    }

    fn on_failure(&self, provider: Provider) {
        let now = self.clock.now();
        if let Some(registration) = self.lock().get_mut(&provider) {
            let config = &registration.config;
            registration.state.record_failure(config, now);
        }
    }
}
