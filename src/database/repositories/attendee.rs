//! Attendee repository implementation
//!
//! Every state transition on attendee rows goes through here. The check-in
//! update only matches rows that are still pending, so duplicate scans racing
//! each other resolve to a single recorded timestamp.

use sqlx::PgPool;
use chrono::{DateTime, Utc};

use crate::models::attendee::{Attendee, CreateAttendeeRequest};
use crate::utils::errors::BadgeBuddyError;

#[derive(Debug, Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a batch of attendees, silently skipping emails that already exist.
    ///
    /// Returns only the rows that were actually inserted. Conflicting rows are
    /// dropped inside the statement and never overwrite an existing attendee,
    /// so there is no per-row partial failure mode.
    pub async fn insert_batch(&self, requests: &[CreateAttendeeRequest]) -> Result<Vec<Attendee>, BadgeBuddyError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let emails: Vec<String> = requests.iter().map(|r| r.email.clone()).collect();
        let names: Vec<String> = requests.iter().map(|r| r.name.clone()).collect();
        let organizations: Vec<Option<String>> = requests.iter().map(|r| r.organization.clone()).collect();
        let qr_codes: Vec<String> = requests.iter().map(|r| r.qr_code.clone()).collect();

        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            INSERT INTO attendees (email, name, organization, qr_code, checked_in, email_sent, created_at, updated_at)
            SELECT t.email, t.name, t.organization, t.qr_code, FALSE, FALSE, $5, $5
            FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[]) AS t(email, name, organization, qr_code)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at
            "#
        )
        .bind(&emails)
        .bind(&names)
        .bind(&organizations)
        .bind(&qr_codes)
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    /// Find attendee by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>, BadgeBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at FROM attendees WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Find attendee by QR token
    pub async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Attendee>, BadgeBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at FROM attendees WHERE qr_code = $1"
        )
        .bind(qr_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// List all attendees, newest first
    pub async fn list_all(&self) -> Result<Vec<Attendee>, BadgeBuddyError> {
        let attendees = sqlx::query_as::<_, Attendee>(
            "SELECT id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at FROM attendees ORDER BY created_at DESC, id DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    /// Mark an attendee checked in, if they are still pending.
    ///
    /// Returns `None` when zero rows matched, meaning a concurrent scan won
    /// the update first; the recorded timestamp is never overwritten.
    pub async fn check_in(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Attendee>, BadgeBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            UPDATE attendees
            SET checked_in = TRUE, check_in_time = $2, updated_at = $2
            WHERE id = $1 AND checked_in = FALSE
            RETURNING id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Mark the QR email as sent for an attendee
    pub async fn mark_email_sent(&self, id: i64) -> Result<Attendee, BadgeBuddyError> {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            UPDATE attendees
            SET email_sent = TRUE, updated_at = $2
            WHERE id = $1
            RETURNING id, email, name, organization, qr_code, checked_in, check_in_time, email_sent, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        attendee.ok_or_else(|| BadgeBuddyError::AttendeeNotFound {
            identifier: id.to_string(),
        })
    }
}
