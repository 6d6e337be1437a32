//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BadgeBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_mailer_config(&settings.mailer)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP relay configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(BadgeBuddyError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(BadgeBuddyError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BadgeBuddyError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(BadgeBuddyError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(BadgeBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate email delivery API configuration
fn validate_mailer_config(config: &super::MailerConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(BadgeBuddyError::Config(
            "Email API URL is required".to_string()
        ));
    }

    if config.api_key.is_empty() {
        return Err(BadgeBuddyError::Config(
            "Email API key is required".to_string()
        ));
    }

    if config.sender.is_empty() || !config.sender.contains('@') {
        return Err(BadgeBuddyError::Config(
            "Sender must be a valid email address".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(BadgeBuddyError::Config(
            "Email API timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BadgeBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BadgeBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.mailer.api_key = "re_test_key".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut settings = valid_settings();
        settings.mailer.api_key = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_empty_database_url_fails() {
        let mut settings = valid_settings();
        settings.database.url = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_fails() {
        let mut settings = valid_settings();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_min_connections_above_max_fails() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }
}
