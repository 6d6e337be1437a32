//! CSV import service implementation
//!
//! Validates raw rows, assigns each accepted row a fresh QR token and writes
//! the batch to the store. Rows whose email already exists are skipped by the
//! store rather than overwritten, and do not appear in the returned set.

use std::sync::OnceLock;
use regex::Regex;
use tracing::{info, warn};

use crate::models::attendee::{Attendee, CreateAttendeeRequest, ImportRow};
use crate::services::directory::AttendeeDirectory;
use crate::utils::csv::RawRow;
use crate::utils::errors::{BadgeBuddyError, Result};
use crate::utils::helpers::generate_qr_token;

/// Outcome of an import batch
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Attendees actually inserted by this batch; duplicates of existing
    /// emails are dropped by the store and do not appear here
    pub inserted: Vec<Attendee>,
    /// Number of rows rejected during validation
    pub rejected: usize,
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Validate a single raw row.
///
/// A row is rejected when email or name is missing or empty, or when the
/// email does not look like an address. Organization is optional.
pub fn validate_row(row: &RawRow) -> Option<ImportRow> {
    let email = row.get("email").map(|s| s.trim()).unwrap_or_default();
    let name = row.get("name").map(|s| s.trim()).unwrap_or_default();

    if email.is_empty() || name.is_empty() {
        return None;
    }

    if !email_regex().is_match(email) {
        return None;
    }

    let organization = row
        .get("organization")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Some(ImportRow {
        email: email.to_string(),
        name: name.to_string(),
        organization,
    })
}

/// Assign each validated row a fresh QR token
fn to_create_requests(rows: Vec<ImportRow>) -> Vec<CreateAttendeeRequest> {
    rows.into_iter()
        .map(|row| CreateAttendeeRequest {
            email: row.email,
            name: row.name,
            organization: row.organization,
            qr_code: generate_qr_token(),
        })
        .collect()
}

/// Import service for attendee batches
#[derive(Clone)]
pub struct ImportService {
    directory: AttendeeDirectory,
}

impl ImportService {
    /// Create a new ImportService instance
    pub fn new(directory: AttendeeDirectory) -> Self {
        Self { directory }
    }

    /// Import a batch of raw rows.
    ///
    /// Invalid rows are dropped individually; a failure of the underlying
    /// batch write aborts the whole import and leaves the roster unchanged.
    pub async fn import(&self, rows: Vec<RawRow>) -> Result<ImportOutcome> {
        let total = rows.len();
        let mut accepted = Vec::new();
        let mut rejected = 0usize;

        for row in &rows {
            match validate_row(row) {
                Some(valid) => accepted.push(valid),
                None => {
                    rejected += 1;
                    warn!(
                        email = row.get("email").map(String::as_str).unwrap_or(""),
                        "Rejected import row"
                    );
                }
            }
        }

        let requests = to_create_requests(accepted);
        let inserted = self
            .directory
            .insert_batch(&requests)
            .await
            .map_err(|e| BadgeBuddyError::Import(e.to_string()))?;

        info!(
            total = total,
            inserted = inserted.len(),
            skipped = requests.len() - inserted.len(),
            rejected = rejected,
            "Import batch processed"
        );

        Ok(ImportOutcome { inserted, rejected })
    }
}
