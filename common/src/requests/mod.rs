use crate::model::component::Component;
use crate::model::recipient::RecipientSelector;
use crate::model::template::TemplateStatus;
use serde::{Deserialize, Serialize};

/// Payload of `POST /api/templates/save`.
///
/// The server compiles `components` into the stored markup and CSS. Without `id` a new
/// template is created.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub template_name: String,
    pub created_by: String,
    pub subject: String,
    pub components: Vec<Component>,
    #[serde(default)]
    pub recipients: Vec<RecipientSelector>,
    #[serde(default)]
    pub status: TemplateStatus,
}

/// Viewport used when rendering an editor preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewViewport {
    #[default]
    Desktop,
    Mobile,
}

/// Payload of `POST /api/templates/preview`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewRequest {
    pub components: Vec<Component>,
    #[serde(default)]
    pub viewport: PreviewViewport,
}

/// Payload of `POST /api/dispatch/test`.
///
/// Either an existing template is referenced by `template_id`, or the unsaved editor
/// state is sent inline through `subject` and `components`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestEmailRequest {
    pub test_email: String,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub components: Option<Vec<Component>>,
    #[serde(default)]
    pub created_by: Option<String>,
}
