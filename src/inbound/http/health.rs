//! Health endpoints: liveness, readiness, and a combined probe.
//!
//! Adapted from the teacher's `api/health.rs`: the two-probe `HealthState`
//! is kept so orchestrators can still wire `/health/live` and
//! `/health/ready` independently, plus a single `GET /healthz` combined
//! probe for simpler deployments.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde_json::json;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state. When false, liveness probes emit 503 to trigger restarts.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "server is ready to handle traffic"),
        (status = 503, description = "server is not ready"),
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "server is alive"),
        (status = 503, description = "server is shutting down"),
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Combined health probe, true while both live and ready.
#[utoipa::path(
    get,
    path = "/healthz",
    tags = ["health"],
    responses(
        (status = 200, description = "server is live and ready"),
        (status = 503, description = "server is not yet ready or is shutting down"),
    )
)]
#[get("/healthz")]
pub async fn healthz(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_alive() && state.is_ready() {
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn healthz_reflects_readiness() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(healthz)
                .service(live)
                .service(ready),
        )
        .await;

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 503);

        state.mark_ready();
        let req = test::TestRequest::get().uri("/healthz").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
    }
}
