//! Per-recipient delivery outcomes and the summary of a dispatch.

use serde::{Deserialize, Serialize};

/// Delivery result of a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent { message_id: String },
    Failed { error: String },
}

/// Serialized as `{email, name, role, status, message_id | error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientOutcome {
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

impl RecipientOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self.status, DeliveryStatus::Sent { .. })
    }
}

/// Aggregate report of one dispatch. `sent + failed == total_recipients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub template_name: String,
    pub total_recipients: usize,
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<RecipientOutcome>,
}

impl DispatchSummary {
    /// Builds the summary, deriving the counts from `results`.
    pub fn new(template_name: impl Into<String>, results: Vec<RecipientOutcome>) -> Self {
        let sent = results.iter().filter(|r| r.is_sent()).count();
        Self {
            template_name: template_name.into(),
            total_recipients: results.len(),
            sent,
            failed: results.len() - sent,
            results,
        }
    }
}
