use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/templates`
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match with_connection(&state.database, |conn| templates::list(conn)).await {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => store_error_response(&e),
    }
}
