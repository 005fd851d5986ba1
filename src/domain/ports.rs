//! Driving/driven port boundary between the router and concrete provider
//! adapters.
//!
//! In hexagonal terms this is a driven port: [`crate::domain::provider_router::ProviderRouter`]
//! calls it without knowing which upstream (OpenAI, OpenRouter, a local Qwen
//! deployment, or a deterministic test stub) backs the call.

use async_trait::async_trait;

use super::job::ParsedEvent;

/// Opaque per-provider adapter.
///
/// Any failure is surfaced as an unhandled error from the call; the router
/// treats all failures uniformly for breaker purposes and never inspects
/// error kinds. Implementations must not block the async scheduler.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Asynchronously parse the artifact at `source_url` into timetable
    /// events.
    async fn parse_timetable(
        &self,
        source_url: &str,
    ) -> Result<Vec<ParsedEvent>, Box<dyn std::error::Error + Send + Sync>>;
}
