//! Shared helpers for integration tests

#![allow(dead_code)]

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use BadgeBuddy::config::MailerConfig;
use BadgeBuddy::models::attendee::Attendee;
use BadgeBuddy::models::dispatch::QrRecipient;

/// Build a mailer config pointing at a mock delivery API
pub fn mailer_config(api_url: &str) -> MailerConfig {
    MailerConfig {
        api_url: api_url.to_string(),
        api_key: "test-key".to_string(),
        sender: "events@example.com".to_string(),
        timeout_seconds: 5,
    }
}

/// Build a test recipient
pub fn recipient(id: i64, email: &str, name: &str, qr_code: &str) -> QrRecipient {
    QrRecipient {
        id: Some(id),
        email: email.to_string(),
        name: name.to_string(),
        qr_code: qr_code.to_string(),
    }
}

/// Build a test attendee record
pub fn attendee(id: i64, email: &str, qr_code: &str, checked_in: bool) -> Attendee {
    let now = Utc::now();
    Attendee {
        id,
        email: email.to_string(),
        name: format!("Attendee {id}"),
        organization: None,
        qr_code: qr_code.to_string(),
        checked_in,
        check_in_time: checked_in.then_some(now),
        email_sent: false,
        created_at: now,
        updated_at: now,
    }
}

/// Matcher for requests whose body does NOT mention the given text
struct BodyLacks(String);

impl Match for BodyLacks {
    fn matches(&self, request: &Request) -> bool {
        !String::from_utf8_lossy(&request.body).contains(&self.0)
    }
}

/// Mock a delivery API that accepts every message
pub async fn mock_accept_all(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "email_123" })))
        .mount(server)
        .await;
}

/// Mock a delivery API that rejects every message
pub async fn mock_reject_all(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": "delivery failed" })))
        .mount(server)
        .await;
}

/// Mock a delivery API that rejects messages addressed to one recipient and
/// accepts everything else
pub async fn mock_reject_recipient(server: &MockServer, email: &str) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(wiremock::matchers::body_string_contains(email))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "delivery failed" })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(BodyLacks(email.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "email_123" })))
        .mount(server)
        .await;
}
