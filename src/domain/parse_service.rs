//! Parse job lifecycle coordinator.
//!
//! Translates user intent into job state transitions, schedules
//! asynchronous execution, and applies the review decision rule.
//!
//! ```text
//! PENDING ──────► RUNNING ──► SUCCEEDED ──► SUCCEEDED  (review APPROVED)
//!                       │            │   ──► FAILED     (review REJECTED)
//!                       │            │
//!                       │            └► NEEDS_REVIEW ── APPROVED ► SUCCEEDED
//!                       │                            ── REJECTED ► FAILED
//!                       └► FAILED     (terminal; review is a no-op)
//! ```

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use super::job::{JobStatus, ParseJob, Provider, ReviewDecision};
use super::job_store::JobStore;
use super::provider_router::ProviderRouter;

/// Orchestrates a job's lifecycle: create, run, succeed/needs-review/fail,
/// and handle the review decision transition.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use parsehub_backend::domain::job::Provider;
/// use parsehub_backend::domain::job_store::JobStore;
/// use parsehub_backend::domain::parse_service::ParseService;
/// use parsehub_backend::domain::provider_router::{ProviderConfig, ProviderRouter};
/// use parsehub_backend::outbound::stub_provider::StubProviderClient;
///
/// # let runtime = tokio::runtime::Runtime::new().expect("runtime");
/// # runtime.block_on(async {
/// let router = Arc::new(ProviderRouter::new());
/// router.register(
///     Provider::Openai,
///     ProviderConfig::new(Arc::new(StubProviderClient::new("openai"))),
/// );
/// let service = ParseService::new(Arc::new(JobStore::new()), router);
/// let job = service
///     .submit_job("org-1", "user-1", Provider::Openai, "https://example.com/a.png")
///     .await;
/// assert_eq!(job.status, parsehub_backend::domain::job::JobStatus::Pending);
/// # });
/// ```
pub struct ParseService {
    store: Arc<JobStore>,
    router: Arc<ProviderRouter>,
}

impl ParseService {
    /// Construct a service over the given store and router.
    pub fn new(store: Arc<JobStore>, router: Arc<ProviderRouter>) -> Self {
        Self { store, router }
    }

    /// Create the job, schedule its background execution, and return it
    /// immediately in [`JobStatus::Pending`]. Callers poll via
    /// [`ParseService::get_job`].
    pub async fn submit_job(
        &self,
        org_id: impl Into<String>,
        creator_id: impl Into<String>,
        provider: Provider,
        source_url: impl Into<String>,
    ) -> ParseJob {
        let job = self
            .store
            .create(org_id, creator_id, provider, source_url);

        let store = Arc::clone(&self.store);
        let router = Arc::clone(&self.router);
        let job_id = job.id;
        tokio::spawn(async move {
            run_job(store, router, job_id).await;
        });

        job
    }

    /// Fetch the current record for `job_id`.
    pub fn get_job(&self, job_id: Uuid) -> Option<ParseJob> {
        self.store.get(job_id)
    }

    /// Every job belonging to `org_id`.
    pub fn list_jobs(&self, org_id: &str) -> Vec<ParseJob> {
        self.store.list_for_org(org_id)
    }

    /// Apply a review decision. Returns `None` if the job does not exist.
    /// Returns the job unchanged if it is not in a reviewable state
    /// ([`JobStatus::Succeeded`] or [`JobStatus::NeedsReview`]); this
    /// includes re-review of a job already driven to [`JobStatus::Failed`].
    pub fn review_job(&self, job_id: Uuid, decision: ReviewDecision) -> Option<ParseJob> {
        let job = self.store.get(job_id)?;

        if !job.status.is_reviewable() {
            return Some(job);
        }

        let mut job = job;
        match decision {
            ReviewDecision::Approved => {
                set_metadata_field(&mut job, "review", "approved");
                job.status = JobStatus::Succeeded;
            }
            ReviewDecision::Rejected => {
                set_metadata_field(&mut job, "review", "rejected");
                job.status = JobStatus::Failed;
            }
        }
        self.store.update(job.clone());
        Some(job)
    }
}

/// Insert `key: value` into `job.metadata`, preserving any other keys
/// already present rather than overwriting the whole map. `metadata` is
/// seeded as an empty object on job creation, but this coerces to one
/// defensively if it is ever anything else.
fn set_metadata_field(job: &mut ParseJob, key: &str, value: &str) {
    if !job.metadata.is_object() {
        job.metadata = json!({});
    }
    if let Some(map) = job.metadata.as_object_mut() {
        map.insert(key.to_owned(), json!(value));
    }
}

/// Background execution for job `job_id`: transition to running, invoke the
/// router, then apply the success or failure rule. Never propagates a
/// failure out of this task; every router failure is recorded via
/// [`JobStore::mark_failure`].
async fn run_job(store: Arc<JobStore>, router: Arc<ProviderRouter>, job_id: Uuid) {
    let Some(job) = store.get(job_id) else {
        return;
    };

    let job = store.mark_running(job);

    match router
        .parse_with(job.provider, &job.org_id, &job.source_url)
        .await
    {
        Ok(events) => {
            store.mark_success(job, events);
        }
        Err(error) => {
            store.mark_failure(job, error.to_string());
        }
    }
}
