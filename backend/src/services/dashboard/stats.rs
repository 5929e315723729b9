use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::dashboard;
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/dashboard/stats`
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    match with_connection(&state.database, |conn| dashboard::stats(conn)).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => store_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::transport::mock::MockTransport;
    use crate::services::test_support::{app_state, jobs};
    use crate::services::{dashboard, templates};
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn counts_saved_templates() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(&dir, Arc::new(MockTransport::new()))))
                .app_data(web::Data::new(jobs()))
                .service(templates::configure_routes())
                .service(dashboard::configure_routes()),
        )
        .await;

        let save = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(json!({
                "template_name": "Weekly",
                "created_by": "Grace",
                "subject": "s",
                "components": []
            }))
            .to_request();
        assert!(test::call_service(&app, save).await.status().is_success());

        let req = test::TestRequest::get().uri("/api/dashboard/stats").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["total_templates"], 1);
        assert_eq!(stats["templates_by_status"]["draft"], 1);
        assert_eq!(stats["total_users"], 0);
    }
}
