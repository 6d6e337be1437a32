//! Services module
//!
//! This module contains business logic services

pub mod checkin;
pub mod directory;
pub mod import;
pub mod mailer;
pub mod scan;

// Re-export commonly used services
pub use checkin::{CheckInOutcome, CheckInService};
pub use directory::AttendeeDirectory;
pub use import::{ImportOutcome, ImportService};
pub use mailer::{MailerService, SendReceipt};
pub use scan::resolve_identifier;

use crate::config::Settings;
use crate::database::repositories::AttendeeRepository;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub directory: AttendeeDirectory,
    pub import: ImportService,
    pub checkin: CheckInService,
    pub mailer: MailerService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(repository: AttendeeRepository, settings: Settings) -> Result<Self> {
        let directory = AttendeeDirectory::new(repository.clone());
        let import = ImportService::new(directory.clone());
        let checkin = CheckInService::new(repository, directory.clone());
        let mailer = MailerService::new(settings.mailer)?;

        Ok(Self {
            directory,
            import,
            checkin,
            mailer,
        })
    }
}
