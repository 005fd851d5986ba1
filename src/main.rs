#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Backend entry-point: wires the parse job HTTP routes, health probes, and
//! OpenAPI docs over an in-process [`ProviderRouter`]/[`JobStore`] pair.

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use parsehub_backend::config;
#[cfg(debug_assertions)]
use parsehub_backend::ApiDoc;
use parsehub_backend::Trace;
use parsehub_backend::domain::job_store::JobStore;
use parsehub_backend::domain::parse_service::ParseService;
use parsehub_backend::domain::provider_router::ProviderRouter;
use parsehub_backend::inbound::http::health::{self, HealthState};
use parsehub_backend::inbound::http::jobs;
use parsehub_backend::inbound::http::state::AppState;

fn build_app(
    app_state: web::Data<AppState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(app_state)
        .app_data(health_state)
        .wrap(Trace)
        .configure(jobs::configure)
        .service(health::healthz)
        .service(health::ready)
        .service(health::live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

fn create_server(
    app_state: web::Data<AppState>,
    health_state: web::Data<HealthState>,
    bind_address: (String, u16),
) -> std::io::Result<Server> {
    let server_app_state = app_state.clone();
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_app_state.clone(), server_health_state.clone())
    })
    .bind(bind_address)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Application bootstrap: init logging, register default providers, serve.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let router = Arc::new(ProviderRouter::new());
    config::default_providers(&router);
    let service = Arc::new(ParseService::new(Arc::new(JobStore::new()), router));
    let app_state = web::Data::new(AppState::new(service));
    let health_state = web::Data::new(HealthState::new());

    let server = create_server(app_state, health_state, config::bind_address())?;
    server.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn create_server_marks_ready() {
        let router = Arc::new(ProviderRouter::new());
        config::default_providers(&router);
        let service = Arc::new(ParseService::new(Arc::new(JobStore::new()), router));
        let app_state = web::Data::new(AppState::new(service));
        let health_state = web::Data::new(HealthState::new());

        assert!(!health_state.is_ready());
        let server = create_server(app_state, health_state.clone(), ("127.0.0.1".into(), 0))
            .expect("server should build");

        assert!(health_state.is_ready());
        drop(server);
    }
}
