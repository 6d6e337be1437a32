//! HTTP relay surface
//!
//! Serves the email relay endpoints plus the roster, import and check-in API
//! consumed by the front desk. Handlers translate service results into the
//! JSON envelope clients expect.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::services::ServiceFactory;
use crate::utils::errors::{BadgeBuddyError, Result};

pub mod routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceFactory>,
}

/// Build the relay router
pub fn build_router(services: Arc<ServiceFactory>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/send-qr-email", post(routes::send_qr_email))
        .route("/api/send-bulk-emails", post(routes::send_bulk_emails))
        .route("/api/import", post(routes::import_attendees))
        .route("/api/attendees", get(routes::list_attendees))
        .route("/api/attendees/export", get(routes::export_attendees))
        .route("/api/stats", get(routes::stats))
        .route("/api/check-in/:identifier", post(routes::check_in))
        .route("/api/scan", post(routes::scan))
        .layer(cors)
        .with_state(AppState { services })
}

/// Bind and serve until shutdown
pub async fn serve(router: Router, host: &str, port: u16) -> Result<()> {
    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Relay listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

impl IntoResponse for BadgeBuddyError {
    fn into_response(self) -> Response {
        let status = match &self {
            BadgeBuddyError::Validation(_)
            | BadgeBuddyError::Decode(_)
            | BadgeBuddyError::Csv(_) => StatusCode::BAD_REQUEST,
            BadgeBuddyError::AttendeeNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}
