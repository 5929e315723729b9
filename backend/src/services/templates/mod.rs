//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of templates.
//! It acts as a router, directing incoming HTTP requests under the `/api/templates`
//! path to the appropriate handler logic defined in its sub-modules.
//!
//! ## Sub-modules:
//! - `list`: Lists stored templates without their bodies.
//! - `get`: Loads one template together with its component tree.
//! - `save`: Compiles the editor's tree and creates or updates a template.
//! - `preview`: Renders an unsaved tree as a standalone preview page.
//! - `delete`: Removes a template.

mod delete;
mod get;
mod list;
mod preview;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET ""`**: `list::process`. Summaries of all templates, newest first.
/// *   **`POST /save`**: `save::process`. Expects a `SaveTemplateRequest`; compiles the
///     component tree into `email_body`/`email_css` and inserts or updates the record.
/// *   **`POST /preview`**: `preview::process`. Expects a `PreviewRequest` and answers with
///     an HTML page for the requested viewport.
/// *   **`GET /{template_id}`**: `get::process`. The stored record plus its parsed tree.
/// *   **`DELETE /{template_id}`**: `delete::process`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/preview", post().to(preview::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
}
