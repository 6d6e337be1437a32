//! Check-in service implementation
//!
//! Processes scans at the door. An attendee moves from pending to checked in
//! exactly once; repeated scans of the same code report "already checked in"
//! instead of erroring or double-counting. The pending-only store update is
//! what decides races between near-simultaneous duplicate scans.

use chrono::Utc;
use tracing::{debug, info};

use crate::database::repositories::AttendeeRepository;
use crate::models::attendee::Attendee;
use crate::services::directory::AttendeeDirectory;
use crate::utils::errors::{BadgeBuddyError, Result};

/// Result of processing a scan
#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    /// The attendee was pending and has just been checked in
    NewlyCheckedIn(Attendee),
    /// The attendee was checked in before this scan
    AlreadyCheckedIn(Attendee),
}

impl CheckInOutcome {
    pub fn attendee(&self) -> &Attendee {
        match self {
            CheckInOutcome::NewlyCheckedIn(attendee) => attendee,
            CheckInOutcome::AlreadyCheckedIn(attendee) => attendee,
        }
    }

    pub fn is_newly_checked_in(&self) -> bool {
        matches!(self, CheckInOutcome::NewlyCheckedIn(_))
    }
}

/// Check-in service for scan processing
#[derive(Clone)]
pub struct CheckInService {
    repository: AttendeeRepository,
    directory: AttendeeDirectory,
}

impl CheckInService {
    /// Create a new CheckInService instance
    pub fn new(repository: AttendeeRepository, directory: AttendeeDirectory) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Check in the attendee matching a scanned identifier.
    ///
    /// Safe to call repeatedly with the same identifier: only the first call
    /// records a timestamp, later calls report the attendee as already
    /// checked in. Unknown identifiers fail so the caller can render an
    /// invalid-code outcome.
    pub async fn check_in(&self, identifier: &str) -> Result<CheckInOutcome> {
        let attendee = self.directory.find(identifier).await.ok_or_else(|| {
            BadgeBuddyError::AttendeeNotFound {
                identifier: identifier.to_string(),
            }
        })?;

        if attendee.checked_in {
            debug!(attendee_id = attendee.id, "Attendee already checked in");
            return Ok(CheckInOutcome::AlreadyCheckedIn(attendee));
        }

        match self.repository.check_in(attendee.id, Utc::now()).await? {
            Some(updated) => {
                self.directory.apply(updated.clone()).await;
                info!(attendee_id = updated.id, email = %updated.email, "Attendee checked in");
                Ok(CheckInOutcome::NewlyCheckedIn(updated))
            }
            None => {
                // Zero rows matched: a concurrent scan won the pending-only
                // update. Re-read the winner's row and report it as done.
                let current = self
                    .repository
                    .find_by_id(attendee.id)
                    .await?
                    .ok_or_else(|| BadgeBuddyError::AttendeeNotFound {
                        identifier: identifier.to_string(),
                    })?;

                self.directory.apply(current.clone()).await;
                debug!(attendee_id = current.id, "Check-in raced a duplicate scan");
                Ok(CheckInOutcome::AlreadyCheckedIn(current))
            }
        }
    }
}
