//! # Image Library Module
//!
//! Read-only listing of the upload store for the editor's image picker. The files
//! themselves are served statically under `/uploads` (see `main.rs`).

mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/images";

/// *   **`GET ""`**: `list::process`. Image files in the upload store, newest first.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}
