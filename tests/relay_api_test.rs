//! Integration tests for the relay HTTP surface
//!
//! These drive the router in-process. Handlers that only touch the roster
//! cache or fail validation never reach the store, so a lazily-connected
//! pool is sufficient.

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use serial_test::serial;
use tower::ServiceExt;

use BadgeBuddy::config::Settings;
use BadgeBuddy::database::AttendeeRepository;
use BadgeBuddy::relay;
use BadgeBuddy::services::ServiceFactory;

fn test_services() -> Arc<ServiceFactory> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/badgebuddy_test")
        .expect("lazy pool");
    let repository = AttendeeRepository::new(pool);

    let mut settings = Settings::default();
    settings.mailer.api_key = "test-key".to_string();

    Arc::new(ServiceFactory::new(repository, settings).expect("services"))
}

fn test_router() -> axum::Router {
    relay::build_router(test_services())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
#[serial]
async fn health_reports_ok() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Email service is running");
}

#[tokio::test]
#[serial]
async fn send_qr_email_requires_attendee_fields() {
    let request = json_request(
        "/api/send-qr-email",
        json!({
            "attendee": { "email": "ada@example.com", "name": "Ada" },
            "origin": "https://event.example.com",
        }),
    );

    let response = test_router().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("Missing required attendee fields")));
}

#[tokio::test]
#[serial]
async fn send_bulk_emails_rejects_empty_batch() {
    let request = json_request(
        "/api/send-bulk-emails",
        json!({ "attendees": [], "origin": "https://event.example.com" }),
    );

    let response = test_router().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("cannot be empty")));
}

#[tokio::test]
#[serial]
async fn scan_rejects_malformed_payloads() {
    let request = json_request("/api/scan", json!({ "payload": "not a url" }));

    let response = test_router().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[serial]
async fn check_in_with_unknown_identifier_is_not_found() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/check-in/no-such-token")
        .body(Body::empty())
        .expect("request");

    let response = test_router().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[serial]
async fn check_in_reports_already_checked_in_from_the_roster() {
    let services = test_services();
    services
        .directory
        .apply(helpers::attendee(7, "ada@example.com", "tok-7", true))
        .await;
    let router = relay::build_router(services);

    let request = Request::builder()
        .method("POST")
        .uri("/api/check-in/tok-7")
        .body(Body::empty())
        .expect("request");

    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "already_checked_in");
    assert_eq!(body["message"], "Already Checked In");
    assert_eq!(body["attendee"]["qrCode"], "tok-7");
}

#[tokio::test]
#[serial]
async fn stats_on_empty_roster_are_zero() {
    let response = test_router()
        .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "total": 0, "checkedIn": 0, "emailsSent": 0 }));
}

#[tokio::test]
#[serial]
async fn export_returns_csv_report_headers() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/api/attendees/export")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/csv")));

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let report = String::from_utf8_lossy(&bytes);
    assert!(report.starts_with("Name,Email,Organization,Check-in Status,Check-in Time,Email Sent"));
}
