//! # Template Save Service
//!
//! Backend logic for `POST /api/templates/save`.
//!
//! The editor sends its live component tree. The tree is compiled here, so the stored
//! `email_body` and `email_css` always match the stored `body`; the dispatcher mails the
//! compiled columns without recompiling. A request without `id` creates a template, a
//! request with `id` replaces that template's columns.
//!
//! Saving with status `published` also schedules a dispatch job, exactly like
//! `POST /api/dispatch/publish/{id}`; its `job_id` is included in the response.

use crate::compiler::CompiledMarkup;
use crate::error::StoreError;
use crate::job_controller::state::JobsState;
use crate::services::dispatch::publish::schedule_dispatch_job;
use crate::services::{store_error_response, with_connection, AppState};
use crate::storage::templates;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::{EmailTemplate, TemplateStatus};
use common::requests::SaveTemplateRequest;
use std::sync::Arc;

pub async fn process(
    payload: web::Json<SaveTemplateRequest>,
    state: web::Data<AppState>,
    jobs: web::Data<JobsState>,
) -> impl Responder {
    let request = payload.into_inner();
    if request.template_name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Template name must not be empty");
    }

    let id = request.id;
    let template = match build_template(request) {
        Ok(template) => template,
        Err(e) => return store_error_response(&e),
    };

    let to_dispatch = (template.status == TemplateStatus::Published).then(|| template.clone());
    let id = match save_template(&state, id, template).await {
        Ok(id) => id,
        Err(e) => return store_error_response(&e),
    };

    let mut body = serde_json::json!({
        "id": id,
        "message": "Template saved successfully"
    });
    if let Some(mut template) = to_dispatch {
        template.id = Some(id);
        let job_id = schedule_dispatch_job(
            jobs.get_ref().clone(),
            Arc::clone(&state.dispatcher),
            template,
        )
        .await;
        log::info!("Template {} saved as published, dispatch job {}", id, job_id);
        body["job_id"] = serde_json::Value::String(job_id);
    }
    HttpResponse::Ok().json(body)
}

/// Compiles the requested tree into a storable record.
pub fn build_template(request: SaveTemplateRequest) -> Result<EmailTemplate, StoreError> {
    let compiled = CompiledMarkup::compile(&request.components);
    Ok(EmailTemplate {
        id: request.id,
        template_name: request.template_name.trim().to_string(),
        created_by: request.created_by,
        subject: request.subject,
        body: serde_json::to_string(&request.components)?,
        email_body: Some(compiled.wrapped_html()),
        email_css: Some(compiled.css),
        recipients: request.recipients,
        status: request.status,
        created_at: None,
        updated_at: None,
    })
}

async fn save_template(
    state: &AppState,
    id: Option<i64>,
    template: EmailTemplate,
) -> Result<i64, StoreError> {
    with_connection(&state.database, move |conn| match id {
        Some(id) => templates::update(conn, id, &template).map(|_| id),
        None => templates::insert(conn, &template),
    })
    .await
}

#[cfg(test)]
mod tests {
    use crate::dispatch::transport::mock::MockTransport;
    use crate::services::templates::configure_routes;
    use crate::services::test_support::{app_state, jobs, wait_for_finish};
    use actix_web::{test, web, App};
    use common::editor::blocks::BlockKind;
    use common::jobs::JobStatus;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn save_then_get_returns_tree_and_compiled_markup() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(&dir, Arc::new(MockTransport::new()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(jobs()))
                .service(configure_routes()),
        )
        .await;

        let text = BlockKind::Text.instantiate();
        let save = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(json!({
                "template_name": "Welcome",
                "created_by": "Grace",
                "subject": "Hi {{name}}",
                "components": [text],
                "recipients": ["admin"]
            }))
            .to_request();
        let saved: Value = test::call_and_read_body_json(&app, save).await;
        let id = saved["id"].as_i64().unwrap();

        let get = test::TestRequest::get()
            .uri(&format!("/api/templates/{}", id))
            .to_request();
        let detail: Value = test::call_and_read_body_json(&app, get).await;
        assert_eq!(detail["template_name"], "Welcome");
        assert_eq!(detail["status"], "draft");
        assert_eq!(detail["components"][0]["id"], text.id.as_str());
        let email_body = detail["email_body"].as_str().unwrap();
        assert!(email_body.starts_with("<div class=\"email-container\">"));
        assert!(email_body.contains(&format!("id=\"{}\"", text.id)));
        assert!(saved.get("job_id").is_none());
    }

    #[actix_web::test]
    async fn saving_as_published_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(MockTransport::new());
        let jobs = jobs();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(&dir, transport.clone())))
                .app_data(web::Data::new(jobs.clone()))
                .service(configure_routes()),
        )
        .await;

        let save = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(json!({
                "template_name": "Announcement",
                "created_by": "Grace",
                "subject": "Hi {{name}}",
                "components": [BlockKind::Text.instantiate()],
                "recipients": ["admin"],
                "status": "published"
            }))
            .to_request();
        let saved: Value = test::call_and_read_body_json(&app, save).await;
        let job_id = saved["job_id"].as_str().unwrap();

        match wait_for_finish(&jobs, job_id).await {
            JobStatus::Completed(summary) => {
                assert_eq!(summary.template_name, "Announcement");
                assert_eq!(summary.sent, 2);
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(transport.sent().len(), 2);
    }

    #[actix_web::test]
    async fn rejects_blank_names_and_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(&dir, Arc::new(MockTransport::new()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(jobs()))
                .service(configure_routes()),
        )
        .await;

        let blank = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(json!({
                "template_name": "  ",
                "created_by": "Grace",
                "subject": "s",
                "components": []
            }))
            .to_request();
        assert_eq!(test::call_service(&app, blank).await.status(), 400);

        let missing = test::TestRequest::get().uri("/api/templates/42").to_request();
        assert_eq!(test::call_service(&app, missing).await.status(), 404);

        let update_missing = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(json!({
                "id": 42,
                "template_name": "Ghost",
                "created_by": "Grace",
                "subject": "s",
                "components": []
            }))
            .to_request();
        assert_eq!(test::call_service(&app, update_missing).await.status(), 404);
    }
}
