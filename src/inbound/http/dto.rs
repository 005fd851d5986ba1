//! Wire-shaped request DTOs.
//!
//! [`crate::domain::job::ParseJob`] already derives `#[serde(rename_all =
//! "camelCase")]`, so it serializes as the response body directly; only
//! request bodies need dedicated DTOs here, to keep validation at the
//! adapter boundary instead of leaking into the domain model.

use serde::Deserialize;

use crate::domain::job::{Provider, ReviewDecision};

/// Body of `POST /parse/jobs`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub org_id: String,
    pub creator_id: String,
    pub source_url: String,
    pub provider: Provider,
}

/// Body of `POST /parse/jobs/{id}/review`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

/// Query parameters of `GET /parse/jobs`.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub org_id: String,
}
