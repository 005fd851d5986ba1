//! Admission state machine: sliding-window quota, concurrency cap, and
//! failure-based circuit breaker.
//!
//! This mirrors the shape of this codebase's Overpass enrichment worker
//! policy (daily quota + breaker), generalized from a fixed daily window to
//! an arbitrary `window_seconds` sliding window and from a single quota to a
//! global-plus-per-org pair, per spec.md §4.2.

use std::collections::HashMap;

use tokio::time::Instant;

use super::config::ProviderConfig;
use super::error::RouterError;

/// Mutable bookkeeping owned by the router, one instance per registered
/// provider. Only mutated while the router holds its lock.
pub struct ProviderState {
    window_started_at: Instant,
    window_count: u32,
    org_counts: HashMap<String, u32>,
    inflight: usize,
    failure_count: u32,
    circuit_open_until: Option<Instant>,
}

impl ProviderState {
    /// Construct state rooted at `now`, the instant of registration.
    pub fn new(now: Instant) -> Self {
        Self {
            window_started_at: now,
            window_count: 0,
            org_counts: HashMap::new(),
            inflight: 0,
            failure_count: 0,
            circuit_open_until: None,
        }
    }

    #[cfg(test)]
    pub fn inflight(&self) -> usize {
        self.inflight
    }

    #[cfg(test)]
    pub fn window_count(&self) -> u32 {
        self.window_count
    }

    fn reset_window_if_expired(&mut self, config: &ProviderConfig, now: Instant) {
        if now.saturating_duration_since(self.window_started_at).as_secs() >= config.window_seconds
        {
            self.window_started_at = now;
            self.window_count = 0;
            self.org_counts.clear();
        }
    }

    /// Step 3 of the admission algorithm: reject while the breaker's
    /// cooldown is still in effect. Split out from [`ProviderState::admit`]
    /// so the router can run it *before* the rollout check (step 4), per
    /// spec.md §4.2's ordering.
    pub fn check_circuit_open(&self, now: Instant) -> Result<(), RouterError> {
        if let Some(open_until) = self.circuit_open_until {
            if now < open_until {
                return Err(RouterError::CircuitOpen);
            }
        }
        Ok(())
    }

    /// Run the remainder of the admission algorithm (spec.md §4.2 steps
    /// 5-9), assuming the caller has already run steps 1 (registration
    /// lookup), 2 (enabled flag), 3 ([`ProviderState::check_circuit_open`]),
    /// and 4 (rollout).
    pub fn admit(
        &mut self,
        config: &ProviderConfig,
        org_id: &str,
        now: Instant,
    ) -> Result<(), RouterError> {
        self.reset_window_if_expired(config, now);

        if let Some(quota) = config.quota_per_window {
            if self.window_count >= quota {
                return Err(RouterError::QuotaExceeded);
            }
        }

        if let Some(&org_quota) = config.org_quotas.get(org_id) {
            let used = self.org_counts.get(org_id).copied().unwrap_or(0);
            if used >= org_quota {
                return Err(RouterError::QuotaExceeded);
            }
        }

        if let Some(limit) = config.concurrency_limit {
            if self.inflight >= limit {
                return Err(RouterError::ConcurrencyLimit);
            }
        }

        self.window_count += 1;
        *self.org_counts.entry(org_id.to_owned()).or_insert(0) += 1;
        self.inflight += 1;
        Ok(())
    }

    /// Post-call bookkeeping on a successful client call: release the
    /// in-flight slot and reset the consecutive-failure counter.
    pub fn record_success(&mut self) {
        self.inflight = self.inflight.saturating_sub(1);
        self.failure_count = 0;
    }

    /// Post-call bookkeeping on a failed client call: release the in-flight
    /// slot, bump the consecutive-failure counter, and trip the breaker once
    /// `failure_threshold` is reached.
    pub fn record_failure(&mut self, config: &ProviderConfig, now: Instant) {
        self.inflight = self.inflight.saturating_sub(1);
        self.failure_count += 1;
        if self.failure_count >= config.failure_threshold {
            self.failure_count = 0;
            self.circuit_open_until = Some(now + config.cooldown);
        }
    }
}
