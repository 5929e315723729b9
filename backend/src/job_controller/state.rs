//! Manages the state of long-running, asynchronous background jobs.
//!
//! Dispatching a template to a large recipient list takes far longer than a request
//! should, so `POST /api/dispatch/publish/{id}` only schedules the work and returns a job
//! id (see `services/dispatch/publish.rs`). Clients then poll
//! `GET /api/dispatch/status/{job_id}`.
//!
//! The main components are:
//! - `JobsState`: A clonable, thread-safe struct that holds the shared state of all jobs.
//!   It is injected into the Actix application state in `main.rs`.
//! - `JobUpdate`: A message struct used to communicate status changes from a background
//!   job back to the central state manager.
//! - `start_job_updater`: A long-running task that listens for `JobUpdate` messages
//!   on an MPSC channel and updates the shared `JobsState` accordingly.
//!
//! Finished jobs (completed or failed) stay queryable for the state's retention period and
//! are then removed.

use common::jobs::JobStatus;
use std::time::Duration;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the update channel between jobs and the updater task.
pub const UPDATE_CHANNEL_CAPACITY: usize = 100;

/// How long a finished job's status is kept.
pub const FINISHED_JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status. The scheduler inserts `Pending`; every later
    /// change arrives through `start_job_updater`.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Sender background jobs report through.
    pub tx: mpsc::Sender<JobUpdate>,

    retention: Duration,
}

impl JobsState {
    /// Creates the shared state and the receiver `start_job_updater` consumes.
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        Self::with_retention(FINISHED_JOB_RETENTION)
    }

    /// Like [`new`](Self::new), keeping finished jobs for `retention`.
    pub fn with_retention(retention: Duration) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
            retention,
        };
        (state, rx)
    }

    /// Latest known status of `job_id`.
    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Queues a status change for `job_id`.
    pub async fn report(&self, job_id: &str, status: JobStatus) {
        let update = JobUpdate {
            job_id: job_id.to_string(),
            status,
        };
        if let Err(e) = self.tx.send(update).await {
            log::error!("Job updater is gone, dropping update for {}: {}", job_id, e);
        }
    }

    /// Non-blocking variant of [`report`](Self::report) for progress ticks. A full channel
    /// drops the tick, since a later update supersedes it anyway.
    pub fn try_report(&self, job_id: &str, status: JobStatus) {
        let _ = self.tx.try_send(JobUpdate {
            job_id: job_id.to_string(),
            status,
        });
    }
}

/// Represents a status update for a specific background job.
#[derive(Debug)]
pub struct JobUpdate {
    /// The unique identifier of the job being updated.
    pub(crate) job_id: String,
    /// The new status of the job.
    pub(crate) status: JobStatus,
}

/// Starts the central job state updater task.
///
/// This function should be spawned as a long-running background task (as seen in `main.rs`).
/// It continuously listens for `JobUpdate` messages on the provided `rx` receiver and
/// stores each status under its job id. A finished status schedules the job's removal.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let finished = update.status.is_finished();
        state
            .jobs
            .write()
            .await
            .insert(update.job_id.clone(), update.status);
        if finished {
            schedule_eviction(&state, update.job_id);
        }
    }
}

fn schedule_eviction(state: &JobsState, job_id: String) {
    let jobs = Arc::clone(&state.jobs);
    let retention = state.retention;
    tokio::spawn(async move {
        tokio::time::sleep(retention).await;
        let mut jobs = jobs.write().await;
        if jobs.get(&job_id).is_some_and(JobStatus::is_finished) {
            jobs.remove(&job_id);
            log::debug!("Evicted finished job {}", job_id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updater_applies_reports_in_order() {
        let (state, rx) = JobsState::new();
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        state.report("job-1", JobStatus::Pending).await;
        state.try_report("job-1", JobStatus::InProgress(50));
        state.report("job-1", JobStatus::Failed("boom".into())).await;

        // poll until the updater has drained the channel
        for _ in 0..100 {
            if matches!(state.status("job-1").await, Some(JobStatus::Failed(_))) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(matches!(
            state.status("job-1").await,
            Some(JobStatus::Failed(msg)) if msg == "boom"
        ));
        assert!(state.status("job-2").await.is_none());
        updater.abort();
    }

    #[tokio::test]
    async fn finished_jobs_expire_after_retention() {
        let (state, rx) = JobsState::with_retention(Duration::from_millis(20));
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        state.report("running", JobStatus::InProgress(10)).await;
        state.report("done", JobStatus::Failed("boom".into())).await;
        for _ in 0..100 {
            if state.status("done").await.is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(state.status("done").await.is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(state.status("done").await.is_none());
        assert!(matches!(
            state.status("running").await,
            Some(JobStatus::InProgress(10))
        ));
        updater.abort();
    }
}
