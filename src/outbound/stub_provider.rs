//! Deterministic stub provider used by default at boot and throughout the
//! test suite so the service is runnable without a real upstream.
//!
//! Seeded from `(label, source_url)` via a portable 64-bit FNV-1a digest,
//! per spec.md §6.3 and the design note against language-specific hashes.
//! Draws are uniform within the documented bounds; callers must not assert
//! on exact values, only on the bounds themselves.

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::job::{ParsedEvent, ToolCall};
use crate::domain::ports::ProviderClient;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn seed_for(label: &str, source_url: &str) -> u64 {
    let mut buf = Vec::with_capacity(label.len() + source_url.len() + 1);
    buf.extend_from_slice(label.as_bytes());
    buf.push(0);
    buf.extend_from_slice(source_url.as_bytes());
    fnv1a(&buf) & 0xFFFF_FFFF
}

/// Deterministic test/demo fixture implementing [`ProviderClient`].
///
/// # Examples
/// ```
/// use parsehub_backend::domain::ports::ProviderClient;
/// use parsehub_backend::outbound::stub_provider::StubProviderClient;
///
/// # let runtime = tokio::runtime::Runtime::new().expect("runtime");
/// # runtime.block_on(async {
/// let client = StubProviderClient::new("openai");
/// let events = client.parse_timetable("https://example.com/a.png").await.expect("stub succeeds");
/// assert_eq!(events.len(), 1);
/// assert!((0.55..=0.95).contains(&events[0].confidence));
/// # });
/// ```
pub struct StubProviderClient {
    label: String,
    /// Artificial failure probability in `[0.0, 1.0]`, for exercising the
    /// circuit breaker without a real upstream. Zero by default.
    failure_rate: f64,
}

impl StubProviderClient {
    /// Build a stub identified by `label` (used both in the generated
    /// event title and as part of the deterministic seed).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            failure_rate: 0.0,
        }
    }

    /// Set the artificial failure rate (clamped to `[0.0, 1.0]`).
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }
}

#[async_trait]
impl ProviderClient for StubProviderClient {
    async fn parse_timetable(
        &self,
        source_url: &str,
    ) -> Result<Vec<ParsedEvent>, Box<dyn std::error::Error + Send + Sync>> {
        let seed = seed_for(&self.label, source_url);
        let mut rng = SmallRng::seed_from_u64(seed);

        if self.failure_rate > 0.0 && rng.gen_range(0.0..1.0) < self.failure_rate {
            return Err(format!("stub injected failure for {}", self.label).into());
        }

        let confidence = (rng.gen_range(0.55..=0.95) * 100.0).round() / 100.0;
        let weekday = rng.gen_range(1..=5_u8);

        let mut tool_calls = Vec::new();
        if confidence < 0.65 {
            tool_calls.push(ToolCall {
                kind: "notify_admin".to_owned(),
                payload: serde_json::json!({
                    "reason": "low_confidence",
                    "source_url": source_url,
                }),
                needs_approval: false,
            });
        }

        Ok(vec![ParsedEvent {
            title: format!("Auto Generated ({})", self.label),
            weekday,
            start: "09:00".to_owned(),
            end: "10:30".to_owned(),
            location: Some("Room 101".to_owned()),
            assignees: vec!["instructor-1".to_owned()],
            confidence,
            tool_calls,
        }])
    }
}
