//! BadgeBuddy event check-in service
//!
//! A service for running event check-in with QR codes: attendees are imported
//! from CSV, each receives a unique QR code by email, and staff scan those
//! codes at the door to mark attendance. This library provides modular
//! components for the attendee roster, CSV import, check-in processing, and
//! email dispatch.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod relay;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BadgeBuddyError, Result};

// Re-export main components for easy access
pub use database::AttendeeRepository;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
