//! # Template Retrieval Service
//!
//! Backend logic for the `GET /api/templates/{template_id}` endpoint.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the numeric `template_id` from the path.
//! 2.  **Database Query**: the record is read from `email_template_drafts` on the blocking
//!     pool.
//! 3.  **Body Interpretation**: the stored `body` is parsed into a component tree. Legacy
//!     records holding raw HTML come back as a single text node, so the editor can always
//!     open the result.
//! 4.  **HTTP Response**: `200 OK` with the record and its `components`, `404 Not Found` for
//!     an unknown id, `503 Service Unavailable` for database errors.

use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};
use common::model::component::Component;
use common::model::template::EmailTemplate;
use serde::Serialize;

/// A stored template together with the tree its body describes.
#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: EmailTemplate,
    pub components: Vec<Component>,
}

pub async fn process(template_id: web::Path<i64>, state: web::Data<AppState>) -> impl Responder {
    let id = template_id.into_inner();
    match with_connection(&state.database, move |conn| templates::get(conn, id)).await {
        Ok(template) => {
            let components = template.components();
            HttpResponse::Ok().json(TemplateDetail {
                template,
                components,
            })
        }
        Err(e) => store_error_response(&e),
    }
}
