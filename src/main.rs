// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use crate::application::alignment_service::AlignmentService;
use crate::application::dashboard_service::DashboardService;
use crate::application::report_service::ReportService;
use crate::application::session_service::SessionService;
use crate::domain::precision::PrecisionScorer;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::logging::init_tracing;
use crate::infrastructure::sqlite_repository::SqliteRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config()?;
    init_tracing(config.logging.json);

    // Create repository (infrastructure layer)
    let repository = Arc::new(
        SqliteRepository::open(&config.database.path)
            .with_context(|| format!("opening database at {}", config.database.path))?,
    );

    // Create services (application layer)
    let scorer = PrecisionScorer::new(config.precision.tolerances());
    let alignment_service = AlignmentService::new(scorer);
    let session_service = SessionService::new(repository.clone());
    let report_service = ReportService::new(repository.clone(), scorer);
    let dashboard_service = DashboardService::new(
        repository,
        scorer,
        config.dashboard.window_days,
        config.dashboard.recent_limit,
    );

    // Create application state
    let state = Arc::new(AppState {
        alignment_service,
        session_service,
        report_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_addr))?;
    tracing::info!(%addr, "starting rimface-alignment service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
