//! HTTP handlers for the dashboard endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shared::{DashboardInsights, ForecastInsights, Scope};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::dashboard::DashboardStatus;
use crate::AppState;

/// Current scope and phase
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardStatus> {
    Json(state.dashboard.current().status())
}

/// Body for a scope change. `"All"` selects the unscoped view.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectScopeInput {
    #[validate(length(min = 1, max = 100))]
    pub district: String,
}

/// Switch the dashboard to another district
pub async fn select_scope(
    State(state): State<AppState>,
    Json(input): Json<SelectScopeInput>,
) -> AppResult<StatusCode> {
    input.validate().map_err(|e| AppError::Validation {
        field: "district".to_string(),
        message: e.to_string(),
    })?;

    state.dashboard.select_scope(Scope::parse(&input.district)).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Reload the current scope
pub async fn refresh(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.dashboard.refresh().await?;
    Ok(StatusCode::ACCEPTED)
}

/// Derived analytics for the ready dataset
pub async fn get_insights(State(state): State<AppState>) -> AppResult<Json<DashboardInsights>> {
    let insights = state.dashboard.current().insights()?;
    Ok(Json(insights))
}

/// Forecast batch with recommendations
pub async fn get_forecast(State(state): State<AppState>) -> AppResult<Json<ForecastInsights>> {
    let forecast = state.dashboard.current().forecast()?;
    Ok(Json(forecast))
}
