//! QR email dispatch service
//!
//! Renders the check-in email and submits it to the external delivery API
//! over HTTP. Sending is separated from state: a successful send returns a
//! receipt and the caller decides when to record the email-sent flag. Bulk
//! sends run sequentially so the delivery API is never flooded and progress
//! reporting stays deterministic.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use urlencoding::encode;

use crate::config::MailerConfig;
use crate::models::dispatch::{BulkDispatchOutcome, DispatchResult, DispatchSummary, QrRecipient};
use crate::utils::errors::{BadgeBuddyError, MailError, Result};

const EMAIL_SUBJECT: &str = "Your QR Code for Event Check-In";

/// Delay between consecutive sends in a bulk dispatch
const BULK_SEND_PAUSE: Duration = Duration::from_millis(50);

/// Outbound payload for the delivery API
#[derive(Debug, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: String,
}

/// Delivery API acknowledgement
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendReceipt {
    pub id: Option<String>,
}

/// Email dispatch service for QR check-in codes
#[derive(Clone)]
pub struct MailerService {
    client: Client,
    config: MailerConfig,
}

impl MailerService {
    /// Create a new MailerService instance
    pub fn new(config: MailerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("BadgeBuddy/1.0")
            .build()
            .map_err(BadgeBuddyError::Http)?;

        Ok(Self { client, config })
    }

    /// Build the check-in link embedded in the QR code
    pub fn check_in_link(origin: &str, qr_code: &str) -> String {
        format!("{}/scan/{}", origin.trim_end_matches('/'), qr_code)
    }

    /// Build the rendered QR image URL for a check-in link
    pub fn qr_image_url(link: &str) -> String {
        format!(
            "https://api.qrserver.com/v1/create-qr-code/?data={}&size=300x300",
            encode(link)
        )
    }

    /// Render the fixed check-in email template
    fn render_email(name: &str, link: &str, image_url: &str) -> String {
        format!(
            r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #2563eb; margin-bottom: 24px;">Event Check-In QR Code</h1>
  <p style="margin-bottom: 16px;">Hello {name},</p>
  <p style="margin-bottom: 24px;">Thank you for registering for our event. Below is your personal QR code for check-in:</p>
  <div style="text-align: center; margin-bottom: 24px;">
    <a href="{link}">
      <img src="{image_url}" alt="QR Code" style="width: 300px; height: 300px;" />
    </a>
  </div>
  <p style="margin-bottom: 16px;">You can:</p>
  <ul style="margin-bottom: 24px;">
    <li>Show this email on your phone</li>
    <li>Take a screenshot of the QR code</li>
    <li>Print this email</li>
  </ul>
  <p style="color: #4b5563; font-size: 14px;">If you have any questions, please contact the event organizer.</p>
</div>"#
        )
    }

    /// Send the QR check-in email to a single recipient.
    ///
    /// A successful return means the delivery API accepted the message; the
    /// email-sent flag is recorded by the caller, not here.
    pub async fn send_qr_email(&self, recipient: &QrRecipient, origin: &str) -> Result<SendReceipt> {
        if recipient.email.trim().is_empty()
            || recipient.name.trim().is_empty()
            || recipient.qr_code.trim().is_empty()
        {
            return Err(MailError::MissingFields.into());
        }

        let link = Self::check_in_link(origin, &recipient.qr_code);
        let image_url = Self::qr_image_url(&link);
        let html = Self::render_email(&recipient.name, &link, &image_url);

        debug!(email = %recipient.email, "Submitting QR email to delivery API");

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(&OutboundEmail {
                from: &self.config.sender,
                to: vec![recipient.email.as_str()],
                subject: EMAIL_SUBJECT,
                html,
            })
            .send()
            .await
            .map_err(|e| MailError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            error!(email = %recipient.email, status = status.as_u16(), "Delivery API rejected QR email");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let receipt = response
            .json::<SendReceipt>()
            .await
            .map_err(|e| MailError::RequestFailed(format!("invalid delivery API response: {e}")))?;

        info!(email = %recipient.email, "QR email sent");
        Ok(receipt)
    }

    /// Send QR emails to a list of recipients, one at a time.
    ///
    /// One recipient's failure never aborts the batch: every recipient gets
    /// an entry in the results, in submission order, and the summary counts
    /// both outcomes. `on_progress` is invoked after each recipient completes.
    pub async fn send_bulk<F>(
        &self,
        recipients: &[QrRecipient],
        origin: &str,
        mut on_progress: F,
    ) -> BulkDispatchOutcome
    where
        F: FnMut(usize, usize),
    {
        let total = recipients.len();
        info!(count = total, "Starting bulk QR email dispatch");

        let mut results = Vec::with_capacity(total);
        let mut successful = 0usize;
        let mut failed = 0usize;

        for (index, recipient) in recipients.iter().enumerate() {
            match self.send_qr_email(recipient, origin).await {
                Ok(_) => {
                    successful += 1;
                    results.push(DispatchResult {
                        attendee_id: recipient.id,
                        email: recipient.email.clone(),
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    warn!(email = %recipient.email, error = %e, "Failed to send QR email");
                    results.push(DispatchResult {
                        attendee_id: recipient.id,
                        email: recipient.email.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }

            on_progress(index + 1, total);

            // Small delay between messages to avoid rate limiting
            if index + 1 < total {
                tokio::time::sleep(BULK_SEND_PAUSE).await;
            }
        }

        info!(
            total = total,
            successful = successful,
            failed = failed,
            "Bulk QR email dispatch completed"
        );

        BulkDispatchOutcome {
            summary: DispatchSummary {
                successful,
                failed,
                total,
            },
            results,
        }
    }
}
