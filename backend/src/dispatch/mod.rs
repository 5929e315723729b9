//! # Dispatch Orchestrator
//!
//! Sends one template to everyone its recipient selectors resolve to.
//!
//! ## Workflow
//!
//! 1.  **Resolve** (`recipients`): selectors are expanded through the [`UserDirectory`]
//!     and deduplicated. No recipients at all is the only fatal outcome.
//! 2.  **Render**: each recipient gets a personalised copy from the [`RenderPipeline`],
//!     run on the blocking pool.
//! 3.  **Send** (`transport`, `smtp`): the copy goes to the [`MailTransport`]. Up to
//!     `concurrency` recipients are in flight at once; results keep recipient order.
//! 4.  **Report**: every recipient ends up in the [`DispatchSummary`] as sent or failed.
//!     One recipient's failure never stops the others.

pub mod recipients;
pub mod smtp;
pub mod transport;

use crate::compiler::CompiledMarkup;
use crate::error::{DispatchError, RenderError};
use crate::render::{MessageSource, RecipientData, RenderPipeline};
use common::model::delivery::{DeliveryStatus, DispatchSummary, RecipientOutcome};
use common::model::recipient::Recipient;
use common::model::template::EmailTemplate;
use futures_util::stream::{self, StreamExt};
use recipients::{resolve_recipients, UserDirectory};
use serde::Serialize;
use std::sync::Arc;
use transport::{MailTransport, OutgoingEmail};

/// Subject prefix of test sends.
pub const TEST_SUBJECT_PREFIX: &str = "[TEST] ";

/// Result of a successful test send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSendReceipt {
    pub message_id: String,
    pub recipient: String,
    pub status: &'static str,
}

pub struct Dispatcher {
    directory: Arc<dyn UserDirectory>,
    transport: Arc<dyn MailTransport>,
    pipeline: Arc<RenderPipeline>,
    from_address: String,
    concurrency: usize,
}

impl Dispatcher {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        transport: Arc<dyn MailTransport>,
        pipeline: Arc<RenderPipeline>,
        from_address: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            directory,
            transport,
            pipeline,
            from_address: from_address.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Sends `template` to all of its recipients.
    ///
    /// # Returns
    /// - `Ok(DispatchSummary)` once every recipient has been attempted, even if all failed.
    /// - `Err(DispatchError::NoValidRecipients)` when the selectors resolve to nobody; nothing
    ///   is sent in that case.
    pub async fn dispatch(&self, template: &EmailTemplate) -> Result<DispatchSummary, DispatchError> {
        self.dispatch_with_progress(template, |_, _| {}).await
    }

    /// Like [`dispatch`](Self::dispatch), calling `progress(done, total)` after each
    /// recipient has been attempted.
    pub async fn dispatch_with_progress<P>(
        &self,
        template: &EmailTemplate,
        progress: P,
    ) -> Result<DispatchSummary, DispatchError>
    where
        P: Fn(usize, usize),
    {
        let recipients = resolve_recipients(self.directory.as_ref(), &template.recipients).await?;
        log::info!(
            "Sending template '{}' to {} recipients",
            template.template_name,
            recipients.len()
        );

        let source = Arc::new(message_source(template));
        let sender = sender_name(template);

        let total = recipients.len();
        let pending: Vec<_> = recipients
            .into_iter()
            .map(|recipient| self.deliver_to(Arc::clone(&source), sender.clone(), recipient))
            .collect();
        let mut deliveries = stream::iter(pending).buffered(self.concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(outcome) = deliveries.next().await {
            results.push(outcome);
            progress(results.len(), total);
        }

        let summary = DispatchSummary::new(template.template_name.clone(), results);
        log::info!(
            "Template '{}' dispatch completed: {} sent, {} failed",
            summary.template_name,
            summary.sent,
            summary.failed
        );
        Ok(summary)
    }

    /// Sends a single test copy of `template` to `address` with placeholder recipient data.
    /// Any failure is returned to the caller.
    pub async fn send_test(
        &self,
        template: &EmailTemplate,
        address: &str,
    ) -> Result<TestSendReceipt, DispatchError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DispatchError::NoValidRecipients);
        }
        log::info!("Sending test email for '{}' to {}", template.template_name, address);

        let data = test_recipient_data(address);
        let recipient = Recipient {
            name: data.name.clone(),
            email: address.to_string(),
            role: data.role.clone(),
        };
        let message_id = self
            .deliver(
                Arc::new(message_source(template)),
                sender_name(template),
                recipient,
                data,
                TEST_SUBJECT_PREFIX,
            )
            .await?;

        Ok(TestSendReceipt {
            message_id,
            recipient: address.to_string(),
            status: "sent",
        })
    }

    async fn deliver_to(
        &self,
        source: Arc<MessageSource>,
        sender: Option<String>,
        recipient: Recipient,
    ) -> RecipientOutcome {
        let data = RecipientData::new(&recipient.name, &recipient.email, &recipient.role);
        let status = match self
            .deliver(source, sender, recipient.clone(), data, "")
            .await
        {
            Ok(message_id) => {
                log::info!("Email sent to {} ({})", recipient.name, recipient.email);
                DeliveryStatus::Sent { message_id }
            }
            Err(e) => {
                log::error!(
                    "Failed to send email to {} ({}): {}",
                    recipient.name,
                    recipient.email,
                    e
                );
                DeliveryStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        RecipientOutcome {
            email: recipient.email,
            name: recipient.name,
            role: recipient.role,
            status,
        }
    }

    async fn deliver(
        &self,
        source: Arc<MessageSource>,
        sender: Option<String>,
        recipient: Recipient,
        data: RecipientData,
        subject_prefix: &str,
    ) -> Result<String, DispatchError> {
        let pipeline = Arc::clone(&self.pipeline);
        let rendered = tokio::task::spawn_blocking(move || pipeline.render(&source, &data))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        let email = OutgoingEmail {
            from_name: sender,
            from_address: self.from_address.clone(),
            to_name: recipient.name,
            to_address: recipient.email,
            subject: format!("{}{}", subject_prefix, rendered.subject),
            html: rendered.html,
            attachments: rendered.attachments,
        };
        Ok(self.transport.send(email).await?)
    }
}

/// The stored compiled markup, or a fresh compilation of the body when none is stored.
pub fn message_source(template: &EmailTemplate) -> MessageSource {
    match &template.email_body {
        Some(html) if !html.trim().is_empty() => MessageSource {
            subject: template.subject.clone(),
            html: html.clone(),
            css: template.email_css.clone(),
        },
        _ => {
            let compiled = CompiledMarkup::compile(&template.components());
            MessageSource {
                subject: template.subject.clone(),
                html: compiled.wrapped_html(),
                css: Some(compiled.css),
            }
        }
    }
}

/// Placeholder values used by test sends.
pub fn test_recipient_data(address: &str) -> RecipientData {
    RecipientData::new("Test User", address, "Test Role").with("company", "Workflow Platform")
}

fn sender_name(template: &EmailTemplate) -> Option<String> {
    let name = template.created_by.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::recipients::mock::StaticDirectory;
    use super::transport::mock::MockTransport;
    use super::*;
    use crate::render::images::{ImageResolver, ImageStrategy, UploadStore};
    use common::model::component::{create_node, AttributeMap, ComponentType, StyleMap};
    use common::model::recipient::RecipientSelector;
    use common::model::template::TemplateStatus;
    use pretty_assertions::assert_eq;

    fn template(recipients: Vec<RecipientSelector>) -> EmailTemplate {
        let tree = vec![create_node(
            ComponentType::Text,
            "Hi {{name}} from {{company}}",
            StyleMap::new(),
            AttributeMap::new(),
            None,
        )];
        EmailTemplate {
            id: Some(1),
            template_name: "Welcome".into(),
            created_by: "Grace".into(),
            subject: "Hello {{name}}".into(),
            body: serde_json::to_string(&tree).unwrap(),
            email_body: None,
            email_css: None,
            recipients,
            status: TemplateStatus::Published,
            created_at: None,
            updated_at: None,
        }
    }

    fn dispatcher(transport: Arc<MockTransport>) -> Dispatcher {
        let directory = StaticDirectory::new(&[
            (1, "Ada", "ada@example.com", "staff"),
            (2, "Grace", "grace@example.com", "staff"),
            (3, "Linus", "linus@example.com", "staff"),
        ]);
        let uploads = std::env::temp_dir();
        let pipeline = RenderPipeline::new(ImageResolver::new(
            ImageStrategy::AbsoluteUrl,
            UploadStore::new(uploads),
            "http://localhost:3001",
        ));
        Dispatcher::new(
            Arc::new(directory),
            transport,
            Arc::new(pipeline),
            "mailer@example.com",
            2,
        )
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let transport = Arc::new(MockTransport::failing_for(&["grace@example.com"]));
        let summary = dispatcher(transport.clone())
            .dispatch(&template(vec![RecipientSelector::Role("staff".into())]))
            .await
            .unwrap();

        assert_eq!(summary.template_name, "Welcome");
        assert_eq!(summary.total_recipients, 3);
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        let order: Vec<&str> = summary.results.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(order, vec!["ada@example.com", "grace@example.com", "linus@example.com"]);
        assert!(matches!(
            &summary.results[1].status,
            DeliveryStatus::Failed { error } if error.contains("550")
        ));

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        let ada = sent.iter().find(|e| e.to_address == "ada@example.com").unwrap();
        assert_eq!(ada.subject, "Hello Ada");
        assert_eq!(ada.from_name.as_deref(), Some("Grace"));
        assert!(ada.html.contains("Hi Ada from "));
    }

    #[tokio::test]
    async fn render_errors_fail_each_recipient_without_stopping() {
        let transport = Arc::new(MockTransport::new());
        let mut broken = template(vec![RecipientSelector::Role("staff".into())]);
        broken.email_body = Some("{{#each}}".into());

        let summary = dispatcher(transport.clone()).dispatch(&broken).await.unwrap();

        assert_eq!(summary.total_recipients, 3);
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.failed, 3);
        assert!(summary
            .results
            .iter()
            .all(|r| matches!(r.status, DeliveryStatus::Failed { .. })));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn zero_recipients_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let result = dispatcher(transport.clone())
            .dispatch(&template(vec![RecipientSelector::Role("nobody".into())]))
            .await;
        assert!(matches!(result, Err(DispatchError::NoValidRecipients)));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_uses_placeholder_data_and_prefix() {
        let transport = Arc::new(MockTransport::new());
        let receipt = dispatcher(transport.clone())
            .send_test(&template(Vec::new()), "qa@example.com")
            .await
            .unwrap();

        assert_eq!(receipt.recipient, "qa@example.com");
        assert_eq!(receipt.status, "sent");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "[TEST] Hello Test User");
        assert!(sent[0].html.contains("Hi Test User from Workflow Platform"));
    }

    #[tokio::test]
    async fn test_send_surfaces_transport_errors() {
        let transport = Arc::new(MockTransport::failing_for(&["qa@example.com"]));
        let result = dispatcher(transport)
            .send_test(&template(Vec::new()), "qa@example.com")
            .await;
        assert!(matches!(result, Err(DispatchError::Transport(_))));
    }

    #[test]
    fn legacy_bodies_are_compiled_on_the_fly() {
        let mut legacy = template(Vec::new());
        legacy.body = "<p>Old newsletter</p>".into();
        let source = message_source(&legacy);
        assert!(source.html.starts_with("<div class=\"email-container\">"));
        assert!(source.html.contains("<p>Old newsletter</p>"));
        assert!(source.css.is_some());

        legacy.email_body = Some("<div>stored</div>".into());
        assert_eq!(message_source(&legacy).html, "<div>stored</div>");
    }
}
