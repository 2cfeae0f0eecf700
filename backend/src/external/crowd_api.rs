//! Statistics and inference backend client
//!
//! Client for the service that serves historical visit statistics and the
//! crowd-level classification model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{
    Analytics, DistrictAverages, DistrictList, PredictionRequest, PredictionResponse, Scope,
    Statistics, Trends,
};

use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub model_loaded: bool,
    pub feature_count: Option<u64>,
    pub data_loaded: Option<bool>,
    pub data_records: Option<u64>,
}

/// Operations the dashboard needs from the backend
#[async_trait]
pub trait CrowdApi: Send + Sync {
    async fn health(&self) -> AppResult<HealthStatus>;

    async fn statistics(&self, scope: &Scope) -> AppResult<Statistics>;

    async fn analytics(&self, scope: &Scope) -> AppResult<Analytics>;

    async fn trends(&self, scope: &Scope) -> AppResult<Trends>;

    async fn districts(&self) -> AppResult<Vec<String>>;

    async fn district_averages(&self, district: &str) -> AppResult<DistrictAverages>;

    /// Backend-reported prediction failures come back as `Ok` with
    /// `success: false`; only transport and parse failures are `Err`.
    async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResponse>;
}

/// reqwest implementation of [`CrowdApi`]
#[derive(Clone)]
pub struct CrowdApiClient {
    base_url: Url,
    http_client: Client,
}

impl CrowdApiClient {
    /// Create a new backend client
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid backend URL {}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "Backend URL {} cannot be used as a base",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create a client from the backend section of the configuration
    pub fn from_config(config: &BackendConfig) -> AppResult<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Build an endpoint URL. Each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, scope: Option<&Scope>) -> AppResult<T> {
        let mut request = self.http_client.get(url.clone());
        if let Some(scope) = scope {
            request = request.query(&[("district", scope.as_query())]);
        }

        tracing::debug!("GET {}", url);
        let response = request
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::BackendResponse(format!(
                "{} returned {}: {}",
                url.path(),
                status,
                body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::BackendResponse(format!("Failed to parse {} response: {}", url.path(), e))
        })
    }
}

/// Connection failures and timeouts mean the backend is down; anything else
/// is a failed request.
fn request_error(url: &Url, error: reqwest::Error) -> AppError {
    if error.is_connect() || error.is_timeout() {
        AppError::BackendUnavailable(format!("{}: {}", url.path(), error))
    } else {
        AppError::BackendRequest(format!("{}: {}", url.path(), error))
    }
}

#[async_trait]
impl CrowdApi for CrowdApiClient {
    async fn health(&self) -> AppResult<HealthStatus> {
        self.get_json(self.endpoint(&["api", "health"]), None).await
    }

    async fn statistics(&self, scope: &Scope) -> AppResult<Statistics> {
        self.get_json(self.endpoint(&["api", "statistics"]), Some(scope))
            .await
    }

    async fn analytics(&self, scope: &Scope) -> AppResult<Analytics> {
        self.get_json(self.endpoint(&["api", "analytics"]), Some(scope))
            .await
    }

    async fn trends(&self, scope: &Scope) -> AppResult<Trends> {
        self.get_json(self.endpoint(&["api", "trends"]), Some(scope))
            .await
    }

    async fn districts(&self) -> AppResult<Vec<String>> {
        let list: DistrictList = self.get_json(self.endpoint(&["api", "districts"]), None).await?;
        Ok(list.districts)
    }

    async fn district_averages(&self, district: &str) -> AppResult<DistrictAverages> {
        self.get_json(
            self.endpoint(&["api", "district-averages", district]),
            None,
        )
        .await
    }

    async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResponse> {
        let url = self.endpoint(&["api", "predict"]);

        let response = self
            .http_client
            .post(url.clone())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        // Validation and model errors arrive as non-2xx with a JSON body
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::BackendRequest(format!("Failed to read prediction: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            AppError::BackendResponse(format!(
                "API returned {} with unparsable prediction: {}",
                status, e
            ))
        })
    }
}
