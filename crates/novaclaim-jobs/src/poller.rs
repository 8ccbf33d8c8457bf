//! Consumer-side status polling.
//!
//! The pipeline never pushes status; a poller reads the store on its own
//! interval and republishes snapshots on a `watch` channel. Stopping a poller
//! never affects the job itself.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use uuid::Uuid;

use novaclaim_core::AnalysisJob;

use crate::pipeline::AnalysisPipeline;

/// Starts polling loops for individual jobs.
pub struct JobPoller;

impl JobPoller {
    /// Poll `job_id` every `interval` until a terminal snapshot is seen.
    ///
    /// The first read happens immediately.
    pub fn start(pipeline: AnalysisPipeline, job_id: Uuid, interval: Duration) -> PollHandle {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let snapshot = pipeline.get_status(job_id).await;
                let terminal = snapshot.is_terminal();
                debug!(
                    subsystem = "jobs",
                    component = "poller",
                    %job_id,
                    status = %snapshot.status,
                    progress = snapshot.progress,
                    "Polled job status"
                );
                if tx.send(Some(snapshot)).is_err() || terminal {
                    break;
                }
            }
        });

        PollHandle { rx, task }
    }
}

/// Handle to a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    rx: watch::Receiver<Option<AnalysisJob>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Most recent snapshot, if any read has completed.
    pub fn latest(&self) -> Option<AnalysisJob> {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<AnalysisJob>> {
        self.rx.clone()
    }

    /// Stop polling. The job keeps running.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the loop has ended, by reaching a terminal state or by `stop`.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the terminal snapshot. `None` if polling was stopped first.
    pub async fn finished(&self) -> Option<AnalysisJob> {
        let mut rx = self.rx.clone();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(job) = current.filter(AnalysisJob::is_terminal) {
                return Some(job);
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone().filter(AnalysisJob::is_terminal);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
