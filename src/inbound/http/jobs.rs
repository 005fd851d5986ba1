//! Parse job HTTP routes.

use actix_web::{HttpResponse, web};
use url::Url;
use uuid::Uuid;

use crate::domain::Error;
use crate::inbound::http::dto::{ListJobsQuery, ReviewRequest, SubmitJobRequest};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::AppState;

fn validate_source_url(raw: &str) -> Result<(), Error> {
    let url = Url::parse(raw).map_err(|_| Error::invalid_request("sourceUrl must be a valid URL"))?;
    if url.cannot_be_a_base() {
        return Err(Error::invalid_request("sourceUrl must be an absolute URL"));
    }
    Ok(())
}

/// `POST /parse/jobs`
#[utoipa::path(
    post,
    path = "/parse/jobs",
    request_body = SubmitJobRequest,
    responses((status = 202, body = crate::domain::job::ParseJob)),
    tag = "jobs"
)]
pub async fn submit_job(
    state: web::Data<AppState>,
    body: web::Json<SubmitJobRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    if body.org_id.trim().is_empty() {
        return Err(Error::invalid_request("orgId must not be empty"));
    }
    if body.creator_id.trim().is_empty() {
        return Err(Error::invalid_request("creatorId must not be empty"));
    }
    validate_source_url(&body.source_url)?;

    let job = state
        .parse_service
        .submit_job(body.org_id, body.creator_id, body.provider, body.source_url)
        .await;
    Ok(HttpResponse::Accepted().json(job))
}

/// `GET /parse/jobs/{id}`
#[utoipa::path(
    get,
    path = "/parse/jobs/{id}",
    responses(
        (status = 200, body = crate::domain::job::ParseJob),
        (status = 404, description = "job not found"),
    ),
    tag = "jobs"
)]
pub async fn get_job(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult<HttpResponse> {
    let job = state
        .parse_service
        .get_job(id.into_inner())
        .ok_or_else(|| Error::not_found("job_not_found"))?;
    Ok(HttpResponse::Ok().json(job))
}

/// `GET /parse/jobs?org_id=...`
#[utoipa::path(
    get,
    path = "/parse/jobs",
    params(("org_id" = String, Query, description = "organization to list jobs for")),
    responses((status = 200, body = [crate::domain::job::ParseJob])),
    tag = "jobs"
)]
pub async fn list_jobs(
    state: web::Data<AppState>,
    query: web::Query<ListJobsQuery>,
) -> ApiResult<HttpResponse> {
    if query.org_id.trim().is_empty() {
        return Err(Error::invalid_request("org_id must not be empty"));
    }
    let jobs = state.parse_service.list_jobs(&query.org_id);
    Ok(HttpResponse::Ok().json(jobs))
}

/// `POST /parse/jobs/{id}/review`
#[utoipa::path(
    post,
    path = "/parse/jobs/{id}/review",
    request_body = ReviewRequest,
    responses(
        (status = 200, body = crate::domain::job::ParseJob),
        (status = 404, description = "job not found"),
    ),
    tag = "jobs"
)]
pub async fn review_job(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let job = state
        .parse_service
        .review_job(id.into_inner(), body.decision)
        .ok_or_else(|| Error::not_found("job_not_found"))?;
    Ok(HttpResponse::Ok().json(job))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/parse/jobs")
            .route(web::post().to(submit_job))
            .route(web::get().to(list_jobs)),
    )
    .service(web::resource("/parse/jobs/{id}").route(web::get().to(get_job)))
    .service(web::resource("/parse/jobs/{id}/review").route(web::post().to(review_job)));
}
