//! Error handling for BadgeBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for BadgeBuddy application
#[derive(Error, Debug)]
pub enum BadgeBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Email delivery error: {0}")]
    Mail(#[from] MailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Attendee not found: {identifier}")]
    AttendeeNotFound { identifier: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid scan payload: {0}")]
    Decode(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Email delivery specific errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Email API request failed: {0}")]
    RequestFailed(String),

    #[error("Email API rejected the message (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Missing required attendee fields (email, name, qrCode)")]
    MissingFields,
}

/// Result type alias for BadgeBuddy operations
pub type Result<T> = std::result::Result<T, BadgeBuddyError>;

/// Result type alias for email delivery operations
pub type MailResult<T> = std::result::Result<T, MailError>;

impl BadgeBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BadgeBuddyError::Database(_) => false,
            BadgeBuddyError::Migration(_) => false,
            BadgeBuddyError::Mail(_) => true,
            BadgeBuddyError::Config(_) => false,
            BadgeBuddyError::AttendeeNotFound { .. } => false,
            BadgeBuddyError::Validation(_) => false,
            BadgeBuddyError::Decode(_) => false,
            BadgeBuddyError::Import(_) => false,
            BadgeBuddyError::Http(_) => true,
            BadgeBuddyError::Serialization(_) => false,
            BadgeBuddyError::Csv(_) => false,
            BadgeBuddyError::Io(_) => true,
            BadgeBuddyError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BadgeBuddyError::Database(_) => ErrorSeverity::Critical,
            BadgeBuddyError::Migration(_) => ErrorSeverity::Critical,
            BadgeBuddyError::Config(_) => ErrorSeverity::Critical,
            BadgeBuddyError::Mail(_) => ErrorSeverity::Warning,
            BadgeBuddyError::Validation(_) => ErrorSeverity::Info,
            BadgeBuddyError::Decode(_) => ErrorSeverity::Info,
            BadgeBuddyError::AttendeeNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
