//! Relay route handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::models::attendee::{Attendee, AttendeeStats};
use crate::models::dispatch::QrRecipient;
use crate::services::checkin::CheckInOutcome;
use crate::services::scan::resolve_identifier;
use crate::utils::csv as csv_util;
use crate::utils::errors::BadgeBuddyError;
use crate::utils::logging::{log_dispatch_summary, log_scan_event};

use super::AppState;

/// Wire attendee as posted by clients. Fields are checked by the handlers so
/// missing data comes back as 400 rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeePayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
}

impl AttendeePayload {
    /// Convert to a recipient when all required fields are present
    fn into_recipient(self) -> Option<QrRecipient> {
        let email = self.email.filter(|s| !s.trim().is_empty())?;
        let name = self.name.filter(|s| !s.trim().is_empty())?;
        let qr_code = self.qr_code.filter(|s| !s.trim().is_empty())?;

        Some(QrRecipient {
            id: self.id,
            email,
            name,
            qr_code,
        })
    }

    /// Convert without field checks; the dispatcher reports missing fields
    /// as a per-recipient failure
    fn into_unchecked_recipient(self) -> QrRecipient {
        QrRecipient {
            id: self.id,
            email: self.email.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            qr_code: self.qr_code.unwrap_or_default(),
        }
    }
}

/// Body for the single email endpoint
#[derive(Debug, Deserialize)]
pub struct SendQrEmailRequest {
    #[serde(default)]
    pub attendee: Option<AttendeePayload>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// Body for the bulk email endpoint
#[derive(Debug, Deserialize)]
pub struct SendBulkEmailsRequest {
    #[serde(default)]
    pub attendees: Option<Vec<AttendeePayload>>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// Body for the scanner endpoint
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub payload: String,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK", "message": "Email service is running" }))
}

pub async fn send_qr_email(
    State(state): State<AppState>,
    Json(request): Json<SendQrEmailRequest>,
) -> Result<Response, BadgeBuddyError> {
    let origin = request.origin.unwrap_or_default();

    let Some(recipient) = request.attendee.and_then(AttendeePayload::into_recipient) else {
        return Ok(bad_request("Missing required attendee fields (email, name, qrCode)"));
    };

    let receipt = state.services.mailer.send_qr_email(&recipient, &origin).await?;
    record_confirmed_send(&state, &recipient).await;

    Ok(Json(json!({ "success": true, "data": receipt })).into_response())
}

pub async fn send_bulk_emails(
    State(state): State<AppState>,
    Json(request): Json<SendBulkEmailsRequest>,
) -> Result<Response, BadgeBuddyError> {
    let payloads = request.attendees.unwrap_or_default();
    if payloads.is_empty() {
        return Ok(bad_request("Attendees array is required and cannot be empty"));
    }

    let origin = request.origin.unwrap_or_default();
    let recipients: Vec<QrRecipient> = payloads
        .into_iter()
        .map(AttendeePayload::into_unchecked_recipient)
        .collect();

    let outcome = state
        .services
        .mailer
        .send_bulk(&recipients, &origin, |completed, total| {
            debug!(completed = completed, total = total, "Bulk dispatch progress");
        })
        .await;

    // Only confirmed deliveries get the sent flag; failed recipients stay
    // eligible for a retry
    for (recipient, result) in recipients.iter().zip(outcome.results.iter()) {
        if result.success {
            record_confirmed_send(&state, recipient).await;
        }
    }

    log_dispatch_summary(
        outcome.summary.successful,
        outcome.summary.failed,
        outcome.summary.total,
    );

    Ok(Json(json!({
        "success": true,
        "summary": outcome.summary,
        "results": outcome.results,
    }))
    .into_response())
}

pub async fn import_attendees(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, BadgeBuddyError> {
    let rows = csv_util::parse_rows(body.as_bytes())?;
    let outcome = state.services.import.import(rows).await?;

    Ok(Json(json!({
        "success": true,
        "insertedCount": outcome.inserted.len(),
        "rejectedRows": outcome.rejected,
        "attendees": outcome.inserted,
    }))
    .into_response())
}

pub async fn list_attendees(State(state): State<AppState>) -> Json<Vec<Attendee>> {
    Json(state.services.directory.list().await)
}

pub async fn stats(State(state): State<AppState>) -> Json<AttendeeStats> {
    Json(state.services.directory.stats().await)
}

pub async fn export_attendees(
    State(state): State<AppState>,
) -> Result<Response, BadgeBuddyError> {
    let attendees = state.services.directory.list().await;
    let report = csv_util::export_attendees(&attendees)?;

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        report,
    )
        .into_response())
}

pub async fn check_in(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, BadgeBuddyError> {
    let outcome = state.services.checkin.check_in(&identifier).await?;
    log_scan_event(
        &identifier,
        if outcome.is_newly_checked_in() { "checked_in" } else { "already_checked_in" },
    );

    Ok(Json(check_in_body(&outcome)).into_response())
}

pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, BadgeBuddyError> {
    let identifier = resolve_identifier(&request.payload)?;
    let outcome = state.services.checkin.check_in(&identifier).await?;
    log_scan_event(
        &identifier,
        if outcome.is_newly_checked_in() { "checked_in" } else { "already_checked_in" },
    );

    Ok(Json(check_in_body(&outcome)).into_response())
}

fn check_in_body(outcome: &CheckInOutcome) -> serde_json::Value {
    let (status, message) = if outcome.is_newly_checked_in() {
        ("checked_in", "Check-In Successful!")
    } else {
        ("already_checked_in", "Already Checked In")
    };

    json!({
        "success": true,
        "status": status,
        "message": message,
        "attendee": outcome.attendee(),
    })
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Record the email-sent flag for a confirmed delivery, when the recipient
/// resolves to a roster entry
async fn record_confirmed_send(state: &AppState, recipient: &QrRecipient) {
    let directory = &state.services.directory;

    let mut resolved = None;
    if let Some(id) = recipient.id {
        resolved = directory.find(&id.to_string()).await;
    }
    if resolved.is_none() {
        resolved = directory.find(&recipient.qr_code).await;
    }

    match resolved {
        Some(attendee) if !attendee.email_sent => {
            if let Err(e) = directory.mark_email_sent(attendee.id).await {
                warn!(attendee_id = attendee.id, error = %e, "Failed to record email sent flag");
            }
        }
        Some(_) => {}
        None => {
            debug!(email = %recipient.email, "Sent recipient not present in roster");
        }
    }
}
