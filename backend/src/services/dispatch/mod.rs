//! # Dispatch Service Module
//!
//! Endpoints under `/api/dispatch`:
//!
//! - `POST /publish/{template_id}`: marks the template published and schedules a
//!   background dispatch job. Responds with `{ "job_id": ... }` at once.
//! - `GET /status/{job_id}`: the job's current `JobStatus`; once completed it carries the
//!   full delivery summary.
//! - `POST /test`: sends one `[TEST]` copy synchronously and reports the result.

pub(crate) mod publish;
mod status;
mod test_send;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dispatch";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/publish/{template_id}", post().to(publish::process))
        .route("/status/{job_id}", get().to(status::process))
        .route("/test", post().to(test_send::process))
}
