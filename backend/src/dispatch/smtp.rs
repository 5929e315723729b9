//! SMTP delivery through `lettre`.
//!
//! Messages without attachments are sent as a single `text/html` part. Messages with
//! content-id attachments become `multipart/related`: the HTML part first, then one
//! inline part per attachment, each carrying the `Content-ID` the markup refers to.

use super::transport::{MailTransport, OutgoingEmail};
use crate::config::SmtpConfig;
use crate::error::TransportError;
use crate::render::images::CidAttachment;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds a STARTTLS relay transport. Credentials are used when both are set.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| TransportError::Build(format!("SMTP relay {}: {}", config.host, e)))?
            .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => {
                log::warn!("SMTP credentials not configured, sending unauthenticated");
                builder
            }
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String, TransportError> {
        let (message, message_id) = build_message(&email).await?;
        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        Ok(message_id)
    }
}

/// Builds the MIME message for `email` and returns it with its `Message-ID`.
async fn build_message(email: &OutgoingEmail) -> Result<(Message, String), TransportError> {
    let from_address = parse_address(&email.from_address)?;
    let to_address = parse_address(&email.to_address)?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), from_address.domain());

    let builder = Message::builder()
        .from(Mailbox::new(email.from_name.clone(), from_address))
        .to(Mailbox::new(non_empty(&email.to_name), to_address))
        .subject(email.subject.clone())
        .message_id(Some(message_id.clone()));

    let html = SinglePart::html(email.html.clone());
    let built = if email.attachments.is_empty() {
        builder.singlepart(html)
    } else {
        let mut body = MultiPart::related().singlepart(html);
        for attachment in &email.attachments {
            body = body.singlepart(inline_part(attachment).await?);
        }
        builder.multipart(body)
    };
    let message = built.map_err(|e| TransportError::Build(e.to_string()))?;

    Ok((message, message_id))
}

async fn inline_part(attachment: &CidAttachment) -> Result<SinglePart, TransportError> {
    let bytes = tokio::fs::read(&attachment.path)
        .await
        .map_err(|source| TransportError::Attachment {
            path: attachment.path.display().to_string(),
            source,
        })?;
    let mime = mime_guess::from_path(&attachment.filename).first_or_octet_stream();
    let content_type = ContentType::parse(mime.as_ref())
        .map_err(|e| TransportError::Build(format!("{}: {}", attachment.filename, e)))?;
    Ok(Attachment::new_inline(attachment.cid.clone()).body(bytes, content_type))
}

fn parse_address(raw: &str) -> Result<Address, TransportError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| TransportError::Address {
            address: raw.to_string(),
            reason: e.to_string(),
        })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
