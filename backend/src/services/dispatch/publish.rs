//! # Publish Service
//!
//! Backend logic for `POST /api/dispatch/publish/{template_id}`.
//!
//! ## Workflow
//!
//! 1.  **Publication**: the template's status is set to `published` and the record is
//!     reloaded, all on the blocking pool. Unknown ids answer `404`.
//! 2.  **Job Scheduling**: `schedule_dispatch_job`
//!     - creates a unique `job_id` and registers it as `Pending` in the shared `JobsState`,
//!     - spawns a Tokio task that runs the dispatcher,
//!     - returns the `job_id` immediately so the client can poll
//!       `GET /api/dispatch/status/{job_id}`.
//! 3.  **Background Processing**: while recipients are attempted the task reports
//!     `InProgress(percent)`. It ends with `Completed(summary)`, or `Failed(reason)` when
//!     the selectors resolve to nobody or the directory is unreachable.

use crate::dispatch::Dispatcher;
use crate::job_controller::state::JobsState;
use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::{progress_percent, JobStatus};
use common::model::template::{EmailTemplate, TemplateStatus};
use std::sync::Arc;
use uuid::Uuid;

pub async fn process(
    template_id: web::Path<i64>,
    state: web::Data<AppState>,
    jobs: web::Data<JobsState>,
) -> impl Responder {
    let id = template_id.into_inner();
    let published = with_connection(&state.database, move |conn| {
        templates::set_status(conn, id, TemplateStatus::Published)?;
        templates::get(conn, id)
    })
    .await;

    let template = match published {
        Ok(template) => template,
        Err(e) => return store_error_response(&e),
    };

    let job_id = schedule_dispatch_job(
        jobs.get_ref().clone(),
        Arc::clone(&state.dispatcher),
        template,
    )
    .await;
    HttpResponse::Accepted().json(serde_json::json!({ "job_id": job_id }))
}

/// Registers a new job and starts dispatching `template` in the background.
///
/// # Returns
/// The new job's id.
pub(crate) async fn schedule_dispatch_job(
    jobs: JobsState,
    dispatcher: Arc<Dispatcher>,
    template: EmailTemplate,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    jobs.jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let job_id_for_task = job_id.clone();
    tokio::spawn(async move {
        let progress_jobs = jobs.clone();
        let progress_id = job_id_for_task.clone();
        let result = dispatcher
            .dispatch_with_progress(&template, move |done, total| {
                progress_jobs.try_report(
                    &progress_id,
                    JobStatus::InProgress(progress_percent(done, total)),
                );
            })
            .await;

        let status = match result {
            Ok(summary) => JobStatus::Completed(summary),
            Err(e) => {
                log::error!(
                    "Dispatch job {} for '{}' failed: {}",
                    job_id_for_task,
                    template.template_name,
                    e
                );
                JobStatus::Failed(e.to_string())
            }
        };
        jobs.report(&job_id_for_task, status).await;
    });

    job_id
}
