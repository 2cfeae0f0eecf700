//! Route definitions for the crowd insights server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/dashboard", dashboard_routes())
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/scope", post(handlers::select_scope))
        .route("/refresh", post(handlers::refresh))
        .route("/insights", get(handlers::get_insights))
        .route("/forecast", get(handlers::get_forecast))
}
