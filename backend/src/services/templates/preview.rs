use crate::compiler::preview_document;
use actix_web::{web, HttpResponse, Responder};
use common::requests::PreviewRequest;

/// `POST /api/templates/preview`: the unsaved tree as a standalone HTML page.
pub async fn process(payload: web::Json<PreviewRequest>) -> impl Responder {
    let request = payload.into_inner();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(preview_document(&request.components, request.viewport))
}
