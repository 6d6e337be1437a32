//! Email dispatch models

use serde::{Deserialize, Serialize};

use crate::models::attendee::Attendee;

/// The recipient details needed to render and send one QR email.
///
/// Clients may post attendees that are not (yet) in the roster, so the store
/// identifier is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRecipient {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    pub qr_code: String,
}

impl From<&Attendee> for QrRecipient {
    fn from(attendee: &Attendee) -> Self {
        Self {
            id: Some(attendee.id),
            email: attendee.email.clone(),
            name: attendee.name.clone(),
            qr_code: attendee.qr_code.clone(),
        }
    }
}

/// Outcome of a single QR email send attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<i64>,
    pub email: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counters for a bulk send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

/// Full result of a bulk send: the summary plus one entry per recipient,
/// in submission order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDispatchOutcome {
    pub summary: DispatchSummary,
    pub results: Vec<DispatchResult>,
}
