//! HTTP handlers, grouped by resource. Each sub-module exposes a `configure_routes()`
//! that `main.rs` mounts.

pub mod dashboard;
pub mod dispatch;
pub mod images;
pub mod templates;

use crate::dispatch::Dispatcher;
use crate::error::StoreError;
use crate::render::images::UploadStore;
use crate::storage::Database;
use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use std::sync::Arc;

/// Shared services injected into every handler as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub dispatcher: Arc<Dispatcher>,
    pub uploads: UploadStore,
}

/// Runs `f` against a fresh connection on the blocking thread pool.
pub(crate) async fn with_connection<T, F>(database: &Database, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
{
    let database = database.clone();
    web::block(move || {
        let conn = database.open()?;
        f(&conn)
    })
    .await
    .map_err(|e| StoreError::Task(e.to_string()))?
}

/// Maps storage failures to responses: `404` for unknown ids, `409` for name clashes,
/// `503` otherwise.
pub(crate) fn store_error_response(error: &StoreError) -> HttpResponse {
    match error {
        StoreError::TemplateNotFound(_) => HttpResponse::NotFound().body(error.to_string()),
        StoreError::DuplicateName(_) => HttpResponse::Conflict().body(error.to_string()),
        _ => {
            log::error!("Storage error: {}", error);
            HttpResponse::ServiceUnavailable().body(error.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dispatch::recipients::mock::StaticDirectory;
    use crate::dispatch::transport::mock::MockTransport;
    use crate::job_controller::state::{start_job_updater, JobsState};
    use crate::render::images::{ImageResolver, ImageStrategy};
    use crate::render::RenderPipeline;
    use actix_web::rt;
    use common::jobs::JobStatus;
    use std::time::Duration;
    use tempfile::TempDir;

    /// App state over a fresh on-disk database and a recording transport.
    pub fn app_state(dir: &TempDir, transport: Arc<MockTransport>) -> AppState {
        let database = Database::new(dir.path().join("test.sqlite"));
        database.initialize().unwrap();
        let pipeline = RenderPipeline::new(ImageResolver::new(
            ImageStrategy::AbsoluteUrl,
            UploadStore::new(dir.path()),
            "http://localhost:3001",
        ));
        let directory = StaticDirectory::new(&[
            (1, "Ada", "ada@example.com", "admin"),
            (2, "Grace", "grace@example.com", "admin"),
        ]);
        AppState {
            database,
            dispatcher: Arc::new(Dispatcher::new(
                Arc::new(directory),
                transport,
                Arc::new(pipeline),
                "mailer@example.com",
                2,
            )),
            uploads: UploadStore::new(dir.path()),
        }
    }

    /// Job state with its updater running on the test runtime.
    pub fn jobs() -> JobsState {
        let (jobs, rx) = JobsState::new();
        rt::spawn(start_job_updater(jobs.clone(), rx));
        jobs
    }

    /// Polls until `job_id` is completed or failed.
    pub async fn wait_for_finish(jobs: &JobsState, job_id: &str) -> JobStatus {
        for _ in 0..200 {
            match jobs.status(job_id).await {
                Some(status @ (JobStatus::Completed(_) | JobStatus::Failed(_))) => return status,
                _ => rt::time::sleep(Duration::from_millis(10)).await,
            }
        }
        panic!("job {} did not finish", job_id);
    }
}
