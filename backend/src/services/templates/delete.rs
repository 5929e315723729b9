use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};

/// `DELETE /api/templates/{template_id}`
pub async fn process(template_id: web::Path<i64>, state: web::Data<AppState>) -> impl Responder {
    let id = template_id.into_inner();
    match with_connection(&state.database, move |conn| templates::delete(conn, id)).await {
        Ok(()) => {
            log::info!("Template {} deleted", id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => store_error_response(&e),
    }
}
