//! Attendee model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A registered event participant with check-in and notification state.
///
/// The check-in timestamp is present exactly when `checked_in` is set, and
/// both flags only ever transition from false to true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub organization: Option<String>,
    pub qr_code: String,
    pub checked_in: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttendeeRequest {
    pub email: String,
    pub name: String,
    pub organization: Option<String>,
    pub qr_code: String,
}

/// A validated import row, before a QR token has been assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub email: String,
    pub name: String,
    pub organization: Option<String>,
}

/// Roster counters computed from the in-memory directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeStats {
    pub total: usize,
    pub checked_in: usize,
    pub emails_sent: usize,
}
