//! # Dashboard Module
//!
//! Summary counts for the landing page: users per role and templates per status.

mod stats;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dashboard";

/// *   **`GET /stats`**: `stats::process`. Responds with a `DashboardStats`.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/stats", get().to(stats::process))
}
