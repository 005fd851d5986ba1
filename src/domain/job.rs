//! Parse job aggregate and its constituent value types.
//!
//! These types are mutated exclusively through [`crate::domain::job_store::JobStore`]
//! operations; nothing outside that module assigns to a stored job's fields
//! directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

/// Third-party AI provider selected for a parse job.
///
/// Closed set: these three values are part of the wire contract (§3 of the
/// specification this service implements), so new providers require a code
/// change rather than open registration of arbitrary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Openai,
    Openrouter,
    QwenLocal,
}

impl Provider {
    /// All provider variants, in a stable declaration order.
    pub const ALL: [Provider; 3] = [Provider::Openai, Provider::Openrouter, Provider::QwenLocal];
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Provider::Openai => "OPENAI",
            Provider::Openrouter => "OPENROUTER",
            Provider::QwenLocal => "QWEN_LOCAL",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle state of a [`ParseJob`]. See the state machine documented on
/// [`crate::domain::parse_service::ParseService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    NeedsReview,
}

impl JobStatus {
    /// Whether a job in this status is eligible for a review decision.
    pub fn is_reviewable(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::NeedsReview)
    }
}

/// A human reviewer's adjudication of a low-confidence (or already
/// successful) parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

/// Advisory side-action requested by a provider while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Json,
    pub needs_approval: bool,
}

/// One extracted timetable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEvent {
    pub title: String,
    /// ISO weekday, 1 (Monday) through 7 (Sunday).
    pub weekday: u8,
    /// Wall-clock start time, `"HH:MM"`.
    pub start: String,
    /// Wall-clock end time, `"HH:MM"`.
    pub end: String,
    pub location: Option<String>,
    pub assignees: Vec<String>,
    /// Extraction confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub tool_calls: Vec<ToolCall>,
}

/// A single parse job and its current lifecycle state.
///
/// ## Invariants
/// - `status` transitions only as permitted by the state machine in
///   [`crate::domain::parse_service::ParseService`]; there is no way to
///   construct a job outside of [`crate::domain::job_store::JobStore::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseJob {
    pub id: Uuid,
    pub org_id: String,
    pub creator_id: String,
    pub provider: Provider,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub events: Vec<ParsedEvent>,
    pub error: Option<String>,
    pub metadata: Json,
}

impl ParseJob {
    pub(crate) fn new(
        id: Uuid,
        org_id: String,
        creator_id: String,
        provider: Provider,
        source_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            org_id,
            creator_id,
            provider,
            source_url,
            created_at,
            status: JobStatus::Pending,
            events: Vec::new(),
            error: None,
            metadata: Json::Object(serde_json::Map::new()),
        }
    }
}

/// Threshold below which a [`ParsedEvent`] forces its job into
/// [`JobStatus::NeedsReview`] rather than [`JobStatus::Succeeded`].
pub const NEEDS_REVIEW_CONFIDENCE_THRESHOLD: f64 = 0.6;
