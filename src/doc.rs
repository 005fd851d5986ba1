//! OpenAPI documentation configuration.
//!
//! Registers every HTTP path and the schemas they reference so Swagger UI
//! (debug builds) and the `openapi-dump` binary can render the same contract.

use utoipa::OpenApi;

/// OpenAPI document for the parse job API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parse job backend API",
        description = "HTTP interface for submitting, polling, and reviewing AI-parsed timetable jobs.",
        license(name = "MIT")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::jobs::submit_job,
        crate::inbound::http::jobs::get_job,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::review_job,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::healthz,
    ),
    components(schemas(
        crate::domain::job::Provider,
        crate::domain::job::JobStatus,
        crate::domain::job::ReviewDecision,
        crate::domain::job::ToolCall,
        crate::domain::job::ParsedEvent,
        crate::domain::job::ParseJob,
        crate::domain::ErrorCode,
        crate::domain::Error,
        crate::inbound::http::dto::SubmitJobRequest,
        crate::inbound::http::dto::ReviewRequest,
    )),
    tags(
        (name = "jobs", description = "Parse job submission, polling, and review"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_registers_job_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.ends_with("ParseJob")));
    }
}
