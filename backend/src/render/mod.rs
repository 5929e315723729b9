//! # Email Render Pipeline
//!
//! Produces the final, recipient-specific message from stored template markup.
//!
//! ## Stages
//!
//! 1.  **Sanitize** (`sanitize`): editor-only attributes and whitespace runs are removed.
//! 2.  **Images** (`images`): `/uploads/...` references are rewritten with the configured
//!     strategy, yielding inline attachments for the content-id strategy.
//! 3.  **Variables** (`variables`): `{{name}}`-style expressions in the body and subject are
//!     replaced with the recipient's values.
//! 4.  **Document** (`document`): the body is wrapped in the email shell and its CSS is
//!     inlined.
//!
//! Rendering is synchronous and CPU-bound; the dispatcher runs it on the blocking pool.

pub mod document;
pub mod images;
pub mod sanitize;
pub mod variables;

use crate::error::RenderError;
use images::{CidAttachment, ImageResolver};
use variables::VariableRenderer;

pub use variables::RecipientData;

/// Stored markup and metadata a message is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSource {
    pub subject: String,
    /// Compiled body markup, as persisted in a template's `email_body`.
    pub html: String,
    pub css: Option<String>,
}

/// A message personalised for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub attachments: Vec<CidAttachment>,
}

pub struct RenderPipeline {
    images: ImageResolver,
    variables: VariableRenderer,
}

impl RenderPipeline {
    pub fn new(images: ImageResolver) -> Self {
        Self {
            images,
            variables: VariableRenderer::new(),
        }
    }

    /// Renders `source` for one recipient.
    pub fn render(
        &self,
        source: &MessageSource,
        data: &RecipientData,
    ) -> Result<RenderedEmail, RenderError> {
        let cleaned = sanitize::clean_html_for_email(&source.html);
        let resolved = self.images.resolve(&cleaned);
        let body = self.variables.render_html(&resolved.html, data)?;
        let subject = self.variables.render_text(&source.subject, data)?;
        let html = document::build_email_document(&body, source.css.as_deref());

        Ok(RenderedEmail {
            subject,
            html,
            attachments: resolved.attachments,
        })
    }
}
