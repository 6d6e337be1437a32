//! BadgeBuddy event check-in service
//!
//! Main application entry point

use std::sync::Arc;
use tracing::info;

use BadgeBuddy::{
    config::Settings,
    database::{connection, repositories::AttendeeRepository},
    relay,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting BadgeBuddy check-in service...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool = connection::create_pool(&settings.database).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let repository = AttendeeRepository::new(pool);
    let services = Arc::new(ServiceFactory::new(repository, settings.clone())?);

    // Prime the attendee roster before accepting traffic
    let loaded = services.directory.reload().await?;
    info!(attendees = loaded, "Attendee roster primed");

    // Serve the relay API
    let router = relay::build_router(services);
    relay::serve(router, &settings.server.host, settings.server.port).await?;

    info!("BadgeBuddy has been shut down.");

    Ok(())
}
