//! `POST /api/dispatch/test`: one synchronous test send.
//!
//! The message comes either from a stored template (`template_id`) or from the editor's
//! unsaved state (`subject` plus `components`), so authors can check a draft before
//! saving it. Delivery errors are reported to the caller instead of being collected.

use crate::error::DispatchError;
use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::{EmailTemplate, TemplateStatus};
use common::requests::TestEmailRequest;

pub async fn process(
    payload: web::Json<TestEmailRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let request = payload.into_inner();
    let template = match load_template(&state, &request).await {
        Ok(template) => template,
        Err(response) => return response,
    };

    match state
        .dispatcher
        .send_test(&template, &request.test_email)
        .await
    {
        Ok(receipt) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Test email sent successfully",
            "result": receipt
        })),
        Err(DispatchError::NoValidRecipients) => {
            HttpResponse::BadRequest().body("A test email address is required")
        }
        Err(e) => {
            log::error!("Test email to {} failed: {}", request.test_email, e);
            HttpResponse::InternalServerError().body(format!("Failed to send test email: {}", e))
        }
    }
}

async fn load_template(
    state: &AppState,
    request: &TestEmailRequest,
) -> Result<EmailTemplate, HttpResponse> {
    if let Some(id) = request.template_id {
        return with_connection(&state.database, move |conn| templates::get(conn, id))
            .await
            .map_err(|e| store_error_response(&e));
    }

    let Some(components) = &request.components else {
        return Err(HttpResponse::BadRequest()
            .body("Either template_id or components must be provided"));
    };
    let body = serde_json::to_string(components)
        .map_err(|e| HttpResponse::BadRequest().body(e.to_string()))?;

    Ok(EmailTemplate {
        id: None,
        template_name: "Unsaved draft".to_string(),
        created_by: request.created_by.clone().unwrap_or_default(),
        subject: request.subject.clone().unwrap_or_default(),
        body,
        email_body: None,
        email_css: None,
        recipients: Vec::new(),
        status: TemplateStatus::Draft,
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use crate::dispatch::transport::mock::MockTransport;
    use crate::services::dispatch::configure_routes;
    use crate::services::test_support::app_state;
    use actix_web::{test, web, App};
    use common::editor::blocks::BlockKind;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn sends_unsaved_draft_with_test_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(MockTransport::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(&dir, transport.clone())))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/dispatch/test")
            .set_json(json!({
                "test_email": "qa@example.com",
                "subject": "Hello {{name}}",
                "components": [BlockKind::Text.instantiate()],
                "created_by": "Grace"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["recipient"], "qa@example.com");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "[TEST] Hello Test User");
    }

    #[actix_web::test]
    async fn reports_failures_to_the_caller() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(MockTransport::failing_for(&["qa@example.com"]));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(&dir, transport)))
                .service(configure_routes()),
        )
        .await;

        let failing = test::TestRequest::post()
            .uri("/api/dispatch/test")
            .set_json(json!({ "test_email": "qa@example.com", "components": [] }))
            .to_request();
        assert_eq!(test::call_service(&app, failing).await.status(), 500);

        let no_source = test::TestRequest::post()
            .uri("/api/dispatch/test")
            .set_json(json!({ "test_email": "qa@example.com" }))
            .to_request();
        assert_eq!(test::call_service(&app, no_source).await.status(), 400);

        let blank = test::TestRequest::post()
            .uri("/api/dispatch/test")
            .set_json(json!({ "test_email": " ", "components": [] }))
            .to_request();
        assert_eq!(test::call_service(&app, blank).await.status(), 400);
    }
}
