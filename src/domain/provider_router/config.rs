//! Per-provider configuration, registered once and treated as immutable
//! thereafter.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::ProviderClient;

/// Allow/deny policy gating which orgs may call a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRollout {
    /// When `true`, every org is admitted except those in `blocklist`.
    /// When `false`, only orgs in `allowlist` are admitted.
    pub allow_by_default: bool,
    pub allowlist: HashSet<String>,
    pub blocklist: HashSet<String>,
}

impl ProviderRollout {
    /// Evaluate the admission rule in spec.md §4.2 step 4.
    pub fn admits(&self, org_id: &str) -> bool {
        if self.allow_by_default {
            !self.blocklist.contains(org_id)
        } else {
            self.allowlist.contains(org_id)
        }
    }
}

/// Static configuration for one registered provider.
pub struct ProviderConfig {
    pub client: Arc<dyn ProviderClient>,
    pub enabled: bool,
    pub quota_per_window: Option<u32>,
    pub window_seconds: u64,
    pub org_quotas: HashMap<String, u32>,
    pub concurrency_limit: Option<usize>,
    pub failure_threshold: u32,
    pub cooldown: Duration,
    pub rollout: Option<ProviderRollout>,
}

impl ProviderConfig {
    /// Build a config with permissive defaults (enabled, no quotas, no
    /// concurrency cap, no rollout restriction) and the given failure
    /// threshold / cooldown, overridable via the builder-style `with_*`
    /// methods.
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self {
            client,
            enabled: true,
            quota_per_window: None,
            window_seconds: 60,
            org_quotas: HashMap::new(),
            concurrency_limit: None,
            failure_threshold: 3,
            cooldown: Duration::from_secs(30),
            rollout: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_quota_per_window(mut self, quota: u32, window_seconds: u64) -> Self {
        self.quota_per_window = Some(quota);
        self.window_seconds = window_seconds;
        self
    }

    pub fn with_window_seconds(mut self, window_seconds: u64) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    pub fn with_org_quota(mut self, org_id: impl Into<String>, quota: u32) -> Self {
        self.org_quotas.insert(org_id.into(), quota);
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_rollout(mut self, rollout: ProviderRollout) -> Self {
        self.rollout = Some(rollout);
        self
    }
}
