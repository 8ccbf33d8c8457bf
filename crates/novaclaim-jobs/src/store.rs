//! In-memory store of analysis job records.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use novaclaim_core::{AnalysisJob, AnalysisResult, Error, JobStatus, Result};

/// Shared map of job id to job record.
///
/// Clones share the same records. Every write is a single read-modify-write
/// under the lock; a rejected write leaves the record untouched. Records are
/// never removed.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, AnalysisJob>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new QUEUED job.
    pub async fn create(&self, file_name: &str) -> AnalysisJob {
        let job = AnalysisJob::queued(Uuid::now_v7(), file_name);
        self.jobs.write().await.insert(job.id, job.clone());
        debug!(job_id = %job.id, file_name, "Job registered");
        job
    }

    /// Snapshot of a job, if known.
    pub async fn get(&self, id: Uuid) -> Option<AnalysisJob> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Move a job to a non-terminal stage.
    ///
    /// Use [`complete`](Self::complete) and [`fail`](Self::fail) for the
    /// terminal states.
    pub async fn advance(&self, id: Uuid, status: JobStatus) -> Result<AnalysisJob> {
        if status.is_terminal() {
            return Err(Error::Job(format!(
                "Cannot advance job {} to terminal status {}",
                id, status
            )));
        }
        self.update(id, |job| {
            check_transition(job, status)?;
            let progress = status.default_progress().unwrap_or(job.progress);
            if progress < job.progress {
                return Err(Error::Job(format!(
                    "Progress of job {} would decrease from {} to {}",
                    id, job.progress, progress
                )));
            }
            job.status = status;
            job.progress = progress;
            Ok(())
        })
        .await
    }

    /// Mark a job COMPLETED with its result.
    pub async fn complete(&self, id: Uuid, result: AnalysisResult) -> Result<AnalysisJob> {
        let result = Arc::new(result);
        self.update(id, |job| {
            check_transition(job, JobStatus::Completed)?;
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.result = Some(result);
            Ok(())
        })
        .await
    }

    /// Mark a job FAILED. Progress keeps its last value.
    pub async fn fail(&self, id: Uuid, error: impl Into<String>) -> Result<AnalysisJob> {
        let error = error.into();
        self.update(id, |job| {
            check_transition(job, JobStatus::Failed)?;
            job.status = JobStatus::Failed;
            job.error = Some(error);
            Ok(())
        })
        .await
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<AnalysisJob>
    where
        F: FnOnce(&mut AnalysisJob) -> Result<()>,
    {
        let mut jobs = self.jobs.write().await;
        let current = jobs
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Job {}", id)))?;

        // Apply to a copy so a rejected write leaves the stored record as-is.
        let mut updated = current.clone();
        apply(&mut updated)?;
        updated.updated_at = Utc::now();
        jobs.insert(id, updated.clone());
        Ok(updated)
    }
}

fn check_transition(job: &AnalysisJob, next: JobStatus) -> Result<()> {
    if job.status.is_terminal() {
        return Err(Error::Job(format!(
            "Job {} is already {}",
            job.id, job.status
        )));
    }
    if !job.status.can_transition_to(next) {
        return Err(Error::Job(format!(
            "Illegal transition for job {}: {} -> {}",
            job.id, job.status, next
        )));
    }
    Ok(())
}
