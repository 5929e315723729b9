use crate::services::AppState;
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/images`
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let uploads = state.uploads.clone();
    match web::block(move || uploads.list_images()).await {
        Ok(Ok(images)) => {
            log::debug!("Found {} images", images.len());
            HttpResponse::Ok().json(images)
        }
        Ok(Err(e)) => {
            log::error!("Error reading uploads directory: {}", e);
            HttpResponse::InternalServerError().body("Failed to read images directory")
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
