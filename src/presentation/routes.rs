// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    calculate_session, compute_alignment, create_report, create_session, dashboard_stats, get_report,
    health_check, list_reports, recent_reports, save_indicators, save_physical,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/alignment/compute", post(compute_alignment))
        .route("/api/rim-face/session", post(create_session))
        .route("/api/rim-face/session/:id/physical", put(save_physical))
        .route("/api/rim-face/session/:id/indicators", put(save_indicators))
        .route("/api/rim-face/session/:id/calculate", post(calculate_session))
        .route("/api/reports", post(create_report).get(list_reports))
        .route("/api/reports/:id", get(get_report))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/dashboard/recent", get(recent_reports))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
