//! Integration tests for QR email dispatch against a mock delivery API

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serial_test::serial;
use wiremock::MockServer;

use BadgeBuddy::services::MailerService;
use BadgeBuddy::utils::errors::{BadgeBuddyError, MailError};

const ORIGIN: &str = "https://event.example.com";

#[tokio::test]
#[serial]
async fn single_send_returns_receipt_on_success() {
    let server = MockServer::start().await;
    mock_accept_all(&server).await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let receipt = mailer
        .send_qr_email(&recipient(1, "ada@example.com", "Ada", "tok-1"), ORIGIN)
        .await
        .expect("send should succeed");

    assert_eq!(receipt.id.as_deref(), Some("email_123"));
}

#[tokio::test]
#[serial]
async fn single_send_surfaces_api_rejection() {
    let server = MockServer::start().await;
    mock_reject_all(&server, 500).await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let result = mailer
        .send_qr_email(&recipient(1, "ada@example.com", "Ada", "tok-1"), ORIGIN)
        .await;

    assert_matches!(
        result,
        Err(BadgeBuddyError::Mail(MailError::Rejected { status: 500, .. }))
    );
}

#[tokio::test]
#[serial]
async fn missing_fields_fail_before_hitting_the_api() {
    let server = MockServer::start().await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let mut incomplete = recipient(1, "ada@example.com", "Ada", "tok-1");
    incomplete.qr_code = String::new();

    let result = mailer.send_qr_email(&incomplete, ORIGIN).await;

    assert_matches!(result, Err(BadgeBuddyError::Mail(MailError::MissingFields)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
#[serial]
async fn bulk_send_aggregates_mixed_outcomes() {
    let server = MockServer::start().await;
    mock_reject_recipient(&server, "bob@example.com").await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let recipients = vec![
        recipient(1, "ada@example.com", "Ada", "tok-1"),
        recipient(2, "bob@example.com", "Bob", "tok-2"),
        recipient(3, "eve@example.com", "Eve", "tok-3"),
    ];

    let mut progress = Vec::new();
    let outcome = mailer
        .send_bulk(&recipients, ORIGIN, |completed, total| {
            progress.push((completed, total));
        })
        .await;

    assert_eq!(outcome.summary.successful, 2);
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.total, 3);

    // One recipient failing never aborts the batch; results keep submission order
    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.results[0].success);
    assert!(!outcome.results[1].success);
    assert_eq!(outcome.results[1].email, "bob@example.com");
    assert!(outcome.results[1].error.as_deref().is_some_and(|e| !e.is_empty()));
    assert!(outcome.results[2].success);

    // Progress fires after every recipient, in order
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
#[serial]
async fn bulk_send_reports_malformed_recipients_per_item() {
    let server = MockServer::start().await;
    mock_accept_all(&server).await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let mut broken = recipient(2, "", "Bob", "tok-2");
    broken.email = String::new();
    let recipients = vec![recipient(1, "ada@example.com", "Ada", "tok-1"), broken];

    let outcome = mailer.send_bulk(&recipients, ORIGIN, |_, _| {}).await;

    assert_eq!(outcome.summary.successful, 1);
    assert_eq!(outcome.summary.failed, 1);
    assert!(!outcome.results[1].success);
}

#[tokio::test]
#[serial]
async fn bulk_send_of_empty_list_is_a_no_op() {
    let server = MockServer::start().await;
    mock_accept_all(&server).await;
    let mailer = MailerService::new(mailer_config(&server.uri())).expect("mailer");

    let outcome = mailer.send_bulk(&[], ORIGIN, |_, _| {}).await;

    assert_eq!(outcome.summary.successful, 0);
    assert_eq!(outcome.summary.failed, 0);
    assert_eq!(outcome.summary.total, 0);
    assert!(outcome.results.is_empty());
}
