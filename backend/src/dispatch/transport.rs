//! The seam between the dispatcher and the outside mail system.
//!
//! The dispatcher hands fully rendered [`OutgoingEmail`] values to a [`MailTransport`].
//! Production uses [`SmtpMailer`](super::smtp::SmtpMailer); tests inject an in-memory
//! transport.

use crate::error::TransportError;
use crate::render::images::CidAttachment;
use async_trait::async_trait;

/// One rendered message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Display name shown as the sender, typically the template author.
    pub from_name: Option<String>,
    pub from_address: String,
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub html: String,
    /// Inline parts referenced from `html` as `cid:<id>`.
    pub attachments: Vec<CidAttachment>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers `email` and returns the message id assigned to it.
    async fn send(&self, email: OutgoingEmail) -> Result<String, TransportError>;
}
