//! Environment-driven configuration read once at boot.

use std::env;
use std::sync::Arc;

use tracing::warn;

use crate::domain::job::Provider;
use crate::domain::provider_router::{ProviderConfig, ProviderRouter};
use crate::outbound::stub_provider::StubProviderClient;

/// Bind address, defaulting to `0.0.0.0:8080`; `PORT` falls back to 8080 on
/// parse failure rather than refusing to start.
pub fn bind_address() -> (String, u16) {
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = match env::var("PORT") {
        Ok(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                warn!(value = %value, "invalid PORT; falling back to 8080");
                8080
            }
        },
        Err(_) => 8080,
    };
    (host, port)
}

/// Artificial failure rate injected into the stub provider for local demos
/// and load testing, read from `PARSEHUB_STUB_FAILURE_RATE` (`0.0`..`1.0`,
/// default `0.0`). Never consulted outside [`default_providers`]; production
/// deployments leave it unset.
fn stub_failure_rate() -> f64 {
    match env::var("PARSEHUB_STUB_FAILURE_RATE") {
        Ok(value) => match value.parse::<f64>() {
            Ok(rate) if (0.0..=1.0).contains(&rate) => rate,
            _ => {
                warn!(value = %value, "invalid PARSEHUB_STUB_FAILURE_RATE; ignoring");
                0.0
            }
        },
        Err(_) => 0.0,
    }
}

/// Register the default set of stub providers for every [`Provider`]
/// variant so the service is immediately usable without real upstream
/// credentials.
pub fn default_providers(router: &ProviderRouter) {
    let failure_rate = stub_failure_rate();
    for provider in Provider::ALL {
        let client = Arc::new(
            StubProviderClient::new(provider.to_string()).with_failure_rate(failure_rate),
        );
        router.register(provider, ProviderConfig::new(client));
    }
}
