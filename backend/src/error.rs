//! Error types of the mail server.
//!
//! Structural no-ops in the editor, missing upload files and CSS inlining failures are
//! recovered where they happen and never show up here.

use thiserror::Error;

/// Failure while personalising a message for one recipient.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template variable error: {0}")]
    Variables(#[from] handlebars::RenderError),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Failure handing one message to the mail transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Could not build message: {0}")]
    Build(String),

    #[error("Could not read attachment '{path}': {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SMTP error: {0}")]
    Send(String),
}

/// Failure querying the user directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Directory task failed: {0}")]
    Task(String),
}

/// Failures that abort a whole dispatch. Per-recipient failures are reported in the
/// delivery summary instead.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No valid recipients found for the selected roles")]
    NoValidRecipients,

    #[error("Recipient lookup failed: {0}")]
    Directory(#[from] DirectoryError),

    /// Only a single-recipient test send surfaces this directly.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Only a single-recipient test send surfaces this directly.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Template storage failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template not found: {0}")]
    TemplateNotFound(i64),

    #[error("A template with the name \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Invalid environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
