use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Selects the template pair for a batch of outreach emails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmailContext {
    Single,
    Mass,
    Targeted,
    TrumpDonation,
    /// Any unrecognized tag; treated like `single`
    #[serde(other)]
    Other,
}

/// Body of `POST /api/send-email`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub context: Option<EmailContext>,
    pub candidate_name: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub recipient_email: Vec<String>,
    pub sender_name: Option<String>,
    #[serde(default)]
    pub send_again: bool,
    #[serde(default)]
    pub prevent_repeat: bool,
}

/// Suppression record: one per address, `contacted_at` is the latest contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactedEmail {
    pub address: String,
    pub contacted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Error,
}

/// Per-recipient result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub recipient: String,
    pub status: SendStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SendOutcome {
    pub fn sent(recipient: &str, detail: Option<String>) -> Self {
        Self {
            recipient: recipient.to_string(),
            status: SendStatus::Sent,
            detail,
        }
    }

    pub fn error(recipient: &str, detail: String) -> Self {
        Self {
            recipient: recipient.to_string(),
            status: SendStatus::Error,
            detail: Some(detail),
        }
    }

    pub fn is_sent(&self) -> bool {
        self.status == SendStatus::Sent
    }
}
