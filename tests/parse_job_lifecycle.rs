//! End-to-end HTTP exercise of the parse job lifecycle: submit, poll,
//! review, and org-scoped listing, wired the way `main.rs` wires the
//! production app (minus logging and Swagger UI).

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, test, web};
use parsehub_backend::Trace;
use parsehub_backend::domain::job::Provider;
use parsehub_backend::domain::job_store::JobStore;
use parsehub_backend::domain::parse_service::ParseService;
use parsehub_backend::domain::provider_router::{ProviderConfig, ProviderRollout, ProviderRouter};
use parsehub_backend::inbound::http::health;
use parsehub_backend::inbound::http::jobs;
use parsehub_backend::inbound::http::state::AppState;
use parsehub_backend::outbound::stub_provider::StubProviderClient;
use serde_json::{Value, json};

fn build_test_app_state() -> AppState {
    let router = Arc::new(ProviderRouter::new());
    router.register(
        Provider::Openai,
        ProviderConfig::new(Arc::new(StubProviderClient::new("openai"))),
    );
    router.register(
        Provider::QwenLocal,
        ProviderConfig::new(Arc::new(StubProviderClient::new("qwen-local"))),
    );
    let service = Arc::new(ParseService::new(Arc::new(JobStore::new()), router));
    AppState::new(service)
}

macro_rules! wait_for_status {
    ($app:expr, $job_id:expr) => {{
        let mut terminal = None;
        for _ in 0..200 {
            let req = test::TestRequest::get()
                .uri(&format!("/parse/jobs/{}", $job_id))
                .to_request();
            let res = test::call_service(&$app, req).await;
            let body: Value = test::read_body_json(res).await;
            let status = body["status"].as_str().unwrap_or_default().to_owned();
            if status != "PENDING" && status != "RUNNING" {
                terminal = Some(body);
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        terminal.expect("job never reached a terminal state")
    }};
}

#[actix_web::test]
async fn submit_poll_review_round_trip() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(build_test_app_state()))
            .wrap(Trace)
            .configure(jobs::configure)
            .service(health::healthz),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/parse/jobs")
        .set_json(json!({
            "orgId": "org-1",
            "creatorId": "user-1",
            "sourceUrl": "https://example.com/sample.png",
            "provider": "OPENAI",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 202);
    let submitted: Value = test::read_body_json(res).await;
    assert_eq!(submitted["status"], "PENDING");
    let job_id = submitted["id"].as_str().expect("job id present").to_owned();

    let terminal = wait_for_status!(app, job_id);
    let status = terminal["status"].as_str().expect("status present");
    assert!(status == "SUCCEEDED" || status == "NEEDS_REVIEW");
    assert!(!terminal["events"].as_array().expect("events array").is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/parse/jobs/{job_id}/review"))
        .set_json(json!({ "decision": "APPROVED" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let reviewed: Value = test::read_body_json(res).await;
    assert_eq!(reviewed["status"], "SUCCEEDED");
    assert_eq!(reviewed["metadata"]["review"], "approved");
}

#[actix_web::test]
async fn listing_scopes_jobs_to_their_org() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(build_test_app_state()))
            .wrap(Trace)
            .configure(jobs::configure),
    )
    .await;

    for (org, url) in [
        ("org-1", "https://example.com/a.png"),
        ("org-1", "https://example.com/b.png"),
        ("org-2", "https://example.com/c.png"),
    ] {
        let req = test::TestRequest::post()
            .uri("/parse/jobs")
            .set_json(json!({
                "orgId": org,
                "creatorId": "user-1",
                "sourceUrl": url,
                "provider": "QWEN_LOCAL",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 202);
    }

    let req = test::TestRequest::get()
        .uri("/parse/jobs?org_id=org-1")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let jobs_list: Value = test::read_body_json(res).await;
    let jobs_list = jobs_list.as_array().expect("array of jobs");
    assert_eq!(jobs_list.len(), 2);
    assert!(
        jobs_list
            .iter()
            .all(|job| job["orgId"].as_str() == Some("org-1"))
    );
}

#[actix_web::test]
async fn unknown_job_and_unknown_provider_are_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(build_test_app_state()))
            .wrap(Trace)
            .configure(jobs::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/parse/jobs/{}", uuid::Uuid::new_v4()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 404);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "detail": "job_not_found" }));

    let req = test::TestRequest::post()
        .uri("/parse/jobs")
        .set_json(json!({
            "orgId": "org-1",
            "creatorId": "user-1",
            "sourceUrl": "https://example.com/a.png",
            "provider": "NOT_A_PROVIDER",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
}

#[actix_web::test]
async fn rollout_denied_org_never_reaches_succeeded() {
    let router = Arc::new(ProviderRouter::new());
    router.register(
        Provider::Openrouter,
        ProviderConfig::new(Arc::new(StubProviderClient::new("openrouter"))).with_rollout(
            ProviderRollout {
                allow_by_default: false,
                allowlist: ["org-allowed".to_owned()].into_iter().collect(),
                blocklist: Default::default(),
            },
        ),
    );
    let service = Arc::new(ParseService::new(Arc::new(JobStore::new()), router));
    let state = AppState::new(service);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(jobs::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/parse/jobs")
        .set_json(json!({
            "orgId": "org-denied",
            "creatorId": "user-1",
            "sourceUrl": "https://example.com/a.png",
            "provider": "OPENROUTER",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 202);
    let submitted: Value = test::read_body_json(res).await;
    let job_id = submitted["id"].as_str().expect("job id present").to_owned();

    let terminal = wait_for_status!(app, job_id);
    assert_eq!(terminal["status"], "FAILED");
    assert!(
        terminal["error"]
            .as_str()
            .expect("error message present")
            .contains("unavailable")
    );
}
