//! Seven-day forecast orchestration against the inference endpoint
//!
//! One batch checks model readiness, resolves the district and its weekday
//! pattern, then issues one prediction per day concurrently. A failed day is
//! captured as a failure-tagged result and never affects the other days.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use futures::future::join_all;
use shared::{PredictionRequest, PredictionResult, Scope};

use crate::config::ForecastConfig;
use crate::external::CrowdApi;
use crate::services::health::{HealthGate, ReadyState};
use crate::services::pattern::{resolve_district, PatternProvider};

/// Days per forecast batch, starting today
pub const FORECAST_DAYS: usize = 7;

/// Forecast orchestrator
#[derive(Clone)]
pub struct ForecastService {
    api: Arc<dyn CrowdApi>,
    health: HealthGate,
    patterns: PatternProvider,
    fallback_district: String,
}

impl ForecastService {
    pub fn new(api: Arc<dyn CrowdApi>, config: &ForecastConfig) -> Self {
        Self {
            health: HealthGate::new(api.clone()),
            patterns: PatternProvider::new(api.clone()),
            api,
            fallback_district: config.fallback_district.clone(),
        }
    }

    /// Forecast starting from the local current date
    pub async fn generate_forecast(
        &self,
        scope: &Scope,
        known_districts: &[String],
    ) -> Vec<PredictionResult> {
        self.generate_forecast_from(scope, known_districts, Local::now().date_naive())
            .await
    }

    /// Forecast for `today` and the six following days.
    ///
    /// Empty when the model is not ready; otherwise exactly
    /// [`FORECAST_DAYS`] results where index `i` is `today + i` days.
    pub async fn generate_forecast_from(
        &self,
        scope: &Scope,
        known_districts: &[String],
        today: NaiveDate,
    ) -> Vec<PredictionResult> {
        if let ReadyState::NotReady { reason } = self.health.check_ready().await {
            tracing::info!("Skipping forecast for {}: {}", scope, reason);
            return Vec::new();
        }

        let district = resolve_district(scope, known_districts, &self.fallback_district);
        tracing::info!("Generating {}-day forecast for {}", FORECAST_DAYS, district);

        let patterns = self.patterns.get_pattern(&district).await;

        let requests: Vec<(NaiveDate, PredictionRequest)> = (0..FORECAST_DAYS as i64)
            .map(|offset| {
                let date = today + Duration::days(offset);
                (date, PredictionRequest::for_date(date, &district, &patterns))
            })
            .collect();

        // join_all keeps input order whatever order the calls finish in
        let results = join_all(
            requests
                .iter()
                .map(|(date, request)| self.predict_day(*date, request)),
        )
        .await;

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            "Forecast for {} complete: {}/{} days predicted",
            district,
            succeeded,
            results.len()
        );

        results
    }

    async fn predict_day(&self, date: NaiveDate, request: &PredictionRequest) -> PredictionResult {
        match self.api.predict(request).await {
            Ok(response) => {
                let result = PredictionResult::from_response(date, response);
                if let PredictionResult::Failure(failure) = &result {
                    tracing::warn!("Prediction for {} rejected: {}", failure.day, failure.error);
                }
                result
            }
            Err(e) => {
                tracing::warn!("Prediction request failed for {}: {}", request.day_of_week, e);
                PredictionResult::failure(date, e.to_string())
            }
        }
    }
}
