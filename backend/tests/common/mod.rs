//! Shared test fixtures: an in-memory [`CrowdApi`] with call counters and
//! failure injection.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crowd_insights_backend::config::{
    BackendConfig, Config, DashboardConfig, ForecastConfig, ServerConfig,
};
use crowd_insights_backend::external::{CrowdApi, HealthStatus};
use crowd_insights_backend::{AppError, AppResult};
use shared::{
    Analytics, CrowdDistribution, CrowdLevel, DayPatternTable, DistrictAverages, DistrictStat,
    PredictionRequest, PredictionResponse, Probabilities, Scope, Statistics, Trends,
};
use tokio::sync::{Barrier, Notify};

pub const DISTRICTS: [&str; 3] = ["Anantapur", "Guntur", "Krishna"];

/// Fake statistics backend
pub struct FakeApi {
    pub model_loaded: AtomicBool,
    pub health_fails: AtomicBool,
    pub districts: Mutex<Vec<String>>,
    /// Averages per district; a missing district answers with an error
    pub averages: Mutex<HashMap<String, DayPatternTable>>,
    /// Weekdays whose prediction request fails in transport
    pub failing_days: Mutex<HashSet<String>>,
    /// Weekdays the backend answers with `success: false`
    pub rejected_days: Mutex<HashSet<String>>,
    /// Per-weekday delay before answering a prediction
    pub predict_delays: Mutex<HashMap<String, u64>>,
    /// Snapshot kind ("statistics", "analytics", "trends", "districts") that fails
    pub failing_snapshot: Mutex<Option<&'static str>>,
    /// Statistics requests for these scopes wait until notified
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
    /// Every prediction waits here; completes only if all are in flight together
    pub predict_barrier: Mutex<Option<Arc<Barrier>>>,
    /// Every snapshot request waits here
    pub snapshot_barrier: Mutex<Option<Arc<Barrier>>>,
    pub predict_requests: Mutex<Vec<PredictionRequest>>,
    pub health_calls: AtomicUsize,
    pub statistics_calls: AtomicUsize,
    pub analytics_calls: AtomicUsize,
    pub trends_calls: AtomicUsize,
    pub district_calls: AtomicUsize,
    pub averages_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            model_loaded: AtomicBool::new(true),
            health_fails: AtomicBool::new(false),
            districts: Mutex::new(DISTRICTS.iter().map(|d| d.to_string()).collect()),
            averages: Mutex::new(HashMap::new()),
            failing_days: Mutex::new(HashSet::new()),
            rejected_days: Mutex::new(HashSet::new()),
            predict_delays: Mutex::new(HashMap::new()),
            failing_snapshot: Mutex::new(None),
            gates: Mutex::new(HashMap::new()),
            predict_barrier: Mutex::new(None),
            snapshot_barrier: Mutex::new(None),
            predict_requests: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
            statistics_calls: AtomicUsize::new(0),
            analytics_calls: AtomicUsize::new(0),
            trends_calls: AtomicUsize::new(0),
            district_calls: AtomicUsize::new(0),
            averages_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model_loaded(self, loaded: bool) -> Self {
        self.model_loaded.store(loaded, Ordering::SeqCst);
        self
    }

    pub fn with_averages(self, district: &str, table: DayPatternTable) -> Self {
        self.averages
            .lock()
            .unwrap()
            .insert(district.to_string(), table);
        self
    }

    pub fn with_failing_day(self, day: &str) -> Self {
        self.failing_days.lock().unwrap().insert(day.to_string());
        self
    }

    pub fn with_rejected_day(self, day: &str) -> Self {
        self.rejected_days.lock().unwrap().insert(day.to_string());
        self
    }

    pub fn with_predict_delay(self, day: &str, millis: u64) -> Self {
        self.predict_delays
            .lock()
            .unwrap()
            .insert(day.to_string(), millis);
        self
    }

    pub fn with_failing_snapshot(self, kind: &'static str) -> Self {
        *self.failing_snapshot.lock().unwrap() = Some(kind);
        self
    }

    /// Predictions only return once `calls` of them are waiting at once
    pub fn with_predict_barrier(self, calls: usize) -> Self {
        *self.predict_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(calls)));
        self
    }

    /// Snapshot requests only return once `calls` of them are waiting at once
    pub fn with_snapshot_barrier(self, calls: usize) -> Self {
        *self.snapshot_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(calls)));
        self
    }

    /// Hold statistics requests for `district` until the returned notifier fires
    pub fn gate(&self, district: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(district.to_string(), notify.clone());
        notify
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn recorded_requests(&self) -> Vec<PredictionRequest> {
        self.predict_requests.lock().unwrap().clone()
    }

    async fn snapshot_arrival(&self) {
        let barrier = self.snapshot_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
    }

    fn snapshot_result(&self, kind: &str) -> AppResult<()> {
        if *self.failing_snapshot.lock().unwrap() == Some(kind) {
            return Err(AppError::BackendResponse(format!("/api/{} returned 500", kind)));
        }
        Ok(())
    }
}

#[async_trait]
impl CrowdApi for FakeApi {
    async fn health(&self) -> AppResult<HealthStatus> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.health_fails.load(Ordering::SeqCst) {
            return Err(AppError::BackendUnavailable("connection refused".to_string()));
        }
        Ok(HealthStatus {
            status: Some("healthy".to_string()),
            model_loaded: self.model_loaded.load(Ordering::SeqCst),
            ..Default::default()
        })
    }

    async fn statistics(&self, scope: &Scope) -> AppResult<Statistics> {
        self.statistics_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(scope.as_query()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.snapshot_arrival().await;
        self.snapshot_result("statistics")?;
        Ok(Statistics {
            total_records: 500,
            crowd_distribution: CrowdDistribution {
                high: 100,
                medium: 150,
                low: 250,
            },
            district: scope.as_query().to_string(),
            ..Default::default()
        })
    }

    async fn analytics(&self, scope: &Scope) -> AppResult<Analytics> {
        self.analytics_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot_arrival().await;
        self.snapshot_result("analytics")?;
        Ok(Analytics {
            district_stats: vec![
                DistrictStat::new("Anantapur", 300.0, 200.0),
                DistrictStat::new("Guntur", 150.0, 50.0),
            ],
            total_biometric: 450,
            total_enrolment: 250,
            district: scope.as_query().to_string(),
            ..Default::default()
        })
    }

    async fn trends(&self, scope: &Scope) -> AppResult<Trends> {
        self.trends_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot_arrival().await;
        self.snapshot_result("trends")?;
        Ok(Trends {
            district: scope.as_query().to_string(),
            total_records: 700,
            ..Default::default()
        })
    }

    async fn districts(&self) -> AppResult<Vec<String>> {
        self.district_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot_arrival().await;
        self.snapshot_result("districts")?;
        Ok(self.districts.lock().unwrap().clone())
    }

    async fn district_averages(&self, district: &str) -> AppResult<DistrictAverages> {
        self.averages_calls.fetch_add(1, Ordering::SeqCst);
        let table = self.averages.lock().unwrap().get(district).cloned();
        match table {
            Some(table) => Ok(DistrictAverages {
                district: Some(district.to_string()),
                averages: Some(table),
                data_available: Some(true),
                records_analyzed: Some(42),
            }),
            None => Err(AppError::BackendResponse(format!(
                "/api/district-averages/{} returned 404",
                district
            ))),
        }
    }

    async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResponse> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.predict_requests.lock().unwrap().push(request.clone());

        let day = request.day_of_week.as_str();
        let delay = self.predict_delays.lock().unwrap().get(day).copied();
        if let Some(millis) = delay {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        let barrier = self.predict_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        if self.failing_days.lock().unwrap().contains(day) {
            return Err(AppError::BackendRequest("connection reset".to_string()));
        }
        if self.rejected_days.lock().unwrap().contains(day) {
            return Ok(PredictionResponse {
                success: false,
                error: Some("Missing feature values".to_string()),
                ..Default::default()
            });
        }

        Ok(PredictionResponse {
            success: true,
            prediction: Some(CrowdLevel::Low),
            probabilities: Some(Probabilities::new(0.8, 0.15, 0.05)),
            confidence: Some(0.8),
            district_in_training: Some(true),
            ..Default::default()
        })
    }
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        backend: BackendConfig::default(),
        forecast: ForecastConfig::default(),
        dashboard: DashboardConfig::default(),
    }
}

/// Fail the test instead of hanging when a state never arrives
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("timed out waiting for dashboard state")
}
