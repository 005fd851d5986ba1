//! In-memory job persistence.
//!
//! `JobStore` is the sole owner of mutation to [`ParseJob`] records. All
//! operations serialize through a single mutex; readers receive snapshot
//! copies so callers can never observe (or corrupt) another caller's
//! in-progress mutation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::job::{JobStatus, NEEDS_REVIEW_CONFIDENCE_THRESHOLD, ParseJob, ParsedEvent, Provider};

/// Concurrent in-memory mapping from job identifier to [`ParseJob`].
///
/// # Examples
/// ```
/// use parsehub_backend::domain::job::Provider;
/// use parsehub_backend::domain::job_store::JobStore;
///
/// let store = JobStore::new();
/// let job = store.create("org-1", "user-1", Provider::Openai, "https://example.com/a.png");
/// assert_eq!(store.get(job.id).map(|j| j.id), Some(job.id));
/// ```
#[derive(Default)]
pub struct JobStore {
    jobs: Mutex<HashMap<Uuid, ParseJob>>,
}

impl JobStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ParseJob>> {
        match self.jobs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Allocate and persist a new job in [`JobStatus::Pending`].
    pub fn create(
        &self,
        org_id: impl Into<String>,
        creator_id: impl Into<String>,
        provider: Provider,
        source_url: impl Into<String>,
    ) -> ParseJob {
        let job = ParseJob::new(
            Uuid::new_v4(),
            org_id.into(),
            creator_id.into(),
            provider,
            source_url.into(),
            Utc::now(),
        );
        self.lock().insert(job.id, job.clone());
        job
    }

    /// Fetch the current record for `job_id`, if any.
    pub fn get(&self, job_id: Uuid) -> Option<ParseJob> {
        self.lock().get(&job_id).cloned()
    }

    /// Every stored job whose `org_id` matches, as a point-in-time snapshot.
    pub fn list_for_org(&self, org_id: &str) -> Vec<ParseJob> {
        self.lock()
            .values()
            .filter(|job| job.org_id == org_id)
            .cloned()
            .collect()
    }

    /// Replace the stored record for `job.id`.
    pub fn update(&self, job: ParseJob) {
        self.lock().insert(job.id, job);
    }

    /// Transition `job` to [`JobStatus::Running`] and persist it.
    pub fn mark_running(&self, mut job: ParseJob) -> ParseJob {
        job.status = JobStatus::Running;
        self.update(job.clone());
        job
    }

    /// Apply the success rule: attach `events`, then resolve to
    /// [`JobStatus::Succeeded`] or [`JobStatus::NeedsReview`] depending on
    /// whether any event fell below [`NEEDS_REVIEW_CONFIDENCE_THRESHOLD`].
    pub fn mark_success(&self, mut job: ParseJob, events: Vec<ParsedEvent>) -> ParseJob {
        let needs_review = events
            .iter()
            .any(|event| event.confidence < NEEDS_REVIEW_CONFIDENCE_THRESHOLD);
        job.events = events;
        job.status = if needs_review {
            JobStatus::NeedsReview
        } else {
            JobStatus::Succeeded
        };
        self.update(job.clone());
        job
    }

    /// Transition `job` to [`JobStatus::Failed`] with `error` attached.
    pub fn mark_failure(&self, mut job: ParseJob, error: impl Into<String>) -> ParseJob {
        job.status = JobStatus::Failed;
        job.error = Some(error.into());
        self.update(job.clone());
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_pending_status_and_unique_ids() {
        let store = JobStore::new();
        let a = store.create("org-1", "user-1", Provider::Openai, "https://example.com/a");
        let b = store.create("org-1", "user-1", Provider::Openai, "https://example.com/b");

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, JobStatus::Pending);
        assert!(a.events.is_empty());
    }

    #[test]
    fn list_for_org_returns_each_job_exactly_once() {
        let store = JobStore::new();
        for _ in 0..3 {
            store.create("org-1", "user-1", Provider::Openai, "https://example.com/a");
        }
        store.create("org-2", "user-2", Provider::Openai, "https://example.com/b");

        let org1 = store.list_for_org("org-1");
        assert_eq!(org1.len(), 3);
        assert!(org1.iter().all(|job| job.org_id == "org-1"));
    }

    #[test]
    fn mark_success_routes_low_confidence_to_needs_review() {
        let store = JobStore::new();
        let job = store.create("org-1", "user-1", Provider::Openai, "https://example.com/a");
        let low_confidence = ParsedEvent {
            title: "Auto Generated".to_owned(),
            weekday: 1,
            start: "09:00".to_owned(),
            end: "10:30".to_owned(),
            location: None,
            assignees: vec![],
            confidence: 0.4,
            tool_calls: vec![],
        };
        let updated = store.mark_success(job, vec![low_confidence]);
        assert_eq!(updated.status, JobStatus::NeedsReview);
    }

    #[test]
    fn mark_success_is_succeeded_when_all_confident() {
        let store = JobStore::new();
        let job = store.create("org-1", "user-1", Provider::Openai, "https://example.com/a");
        let confident = ParsedEvent {
            title: "Auto Generated".to_owned(),
            weekday: 1,
            start: "09:00".to_owned(),
            end: "10:30".to_owned(),
            location: None,
            assignees: vec![],
            confidence: 0.9,
            tool_calls: vec![],
        };
        let updated = store.mark_success(job, vec![confident]);
        assert_eq!(updated.status, JobStatus::Succeeded);
    }

    #[test]
    fn mark_failure_sets_error_and_status() {
        let store = JobStore::new();
        let job = store.create("org-1", "user-1", Provider::Openai, "https://example.com/a");
        let failed = store.mark_failure(job, "boom");
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
