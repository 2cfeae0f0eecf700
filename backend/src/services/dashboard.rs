//! Per-scope dashboard state machine
//!
//! A single controller task owns the dashboard state. Callers change it only
//! by sending [`DashboardCommand`]s through a [`DashboardHandle`] and observe it
//! through a watch channel. Each scope change starts a new batch tagged with a
//! generation number; batches that complete after a newer scope change are
//! discarded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{DashboardInsights, ForecastInsights, PredictionResult, Scope, SnapshotSet};
use tokio::sync::{mpsc, watch};

use crate::config::{DashboardConfig, ForecastConfig};
use crate::error::{AppError, AppResult};
use crate::external::CrowdApi;
use crate::services::forecast::ForecastService;
use crate::services::snapshot::SnapshotService;

/// Commands accepted by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Switch scope, discarding current data
    SelectScope(Scope),
    /// Reload the current scope
    Refresh,
}

/// Data held while the dashboard is ready
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub snapshots: SnapshotSet,
    pub forecast: Vec<PredictionResult>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum DashboardPhase {
    Idle,
    Fetching,
    Ready(DashboardData),
    Failed { reason: String },
}

impl DashboardPhase {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardPhase::Idle => "idle",
            DashboardPhase::Fetching => "fetching",
            DashboardPhase::Ready(_) => "ready",
            DashboardPhase::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub scope: Scope,
    /// Incremented on every scope change or refresh
    pub generation: u64,
    pub phase: DashboardPhase,
    /// Last known district list, kept across scope changes
    pub districts: Vec<String>,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            scope: Scope::All,
            generation: 0,
            phase: DashboardPhase::Idle,
            districts: Vec::new(),
        }
    }

    pub fn data(&self) -> Option<&DashboardData> {
        match &self.phase {
            DashboardPhase::Ready(data) => Some(data),
            _ => None,
        }
    }

    fn ready_data(&self) -> AppResult<&DashboardData> {
        match &self.phase {
            DashboardPhase::Ready(data) => Ok(data),
            DashboardPhase::Failed { reason } => Err(AppError::NotReady(format!(
                "last fetch for {} failed: {}",
                self.scope, reason
            ))),
            phase => Err(AppError::NotReady(format!(
                "dashboard for {} is {}",
                self.scope,
                phase.name()
            ))),
        }
    }

    /// Every derived metric for the ready dataset
    pub fn insights(&self) -> AppResult<DashboardInsights> {
        let data = self.ready_data()?;
        Ok(DashboardInsights::project(
            &self.scope,
            &data.snapshots,
            &data.forecast,
        ))
    }

    /// Forecast view of the ready dataset
    pub fn forecast(&self) -> AppResult<ForecastInsights> {
        let data = self.ready_data()?;
        Ok(ForecastInsights::project(&data.forecast))
    }

    pub fn status(&self) -> DashboardStatus {
        let data = self.data();
        DashboardStatus {
            scope: self.scope.clone(),
            generation: self.generation,
            phase: self.phase.name(),
            districts: self.districts.clone(),
            total_records: data.map(|d| d.snapshots.total_records()),
            predicted_days: data.map(|d| d.forecast.iter().filter(|r| r.is_success()).count()),
            fetched_at: data.map(|d| d.fetched_at),
            error: match &self.phase {
                DashboardPhase::Failed { reason } => Some(reason.clone()),
                _ => None,
            },
        }
    }
}

/// Summary of the dashboard state for polling clients
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    pub scope: Scope,
    pub generation: u64,
    pub phase: &'static str,
    pub districts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_days: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Cloneable access to a running controller
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<DashboardCommand>,
    state: watch::Receiver<DashboardState>,
}

impl DashboardHandle {
    pub async fn send(&self, command: DashboardCommand) -> AppResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AppError::Internal("dashboard controller stopped".to_string()))
    }

    pub async fn select_scope(&self, scope: Scope) -> AppResult<()> {
        self.send(DashboardCommand::SelectScope(scope)).await
    }

    pub async fn refresh(&self) -> AppResult<()> {
        self.send(DashboardCommand::Refresh).await
    }

    /// Snapshot of the current state
    pub fn current(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Wait until the state satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&DashboardState) -> bool,
    ) -> AppResult<DashboardState> {
        let mut state = self.state.clone();
        let result = state.wait_for(predicate).await.map(|s| s.clone());
        result.map_err(|_| AppError::Internal("dashboard controller stopped".to_string()))
    }
}

struct BatchLoad {
    snapshots: SnapshotSet,
    districts: Option<Vec<String>>,
    forecast: Vec<PredictionResult>,
}

struct BatchCompletion {
    generation: u64,
    scope: Scope,
    outcome: AppResult<BatchLoad>,
}

/// Owns the dashboard state and runs fetch batches
pub struct DashboardController {
    snapshots: SnapshotService,
    forecast: ForecastService,
    state: DashboardState,
    state_tx: watch::Sender<DashboardState>,
    commands: mpsc::Receiver<DashboardCommand>,
    completions_tx: mpsc::UnboundedSender<BatchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<BatchCompletion>,
}

impl DashboardController {
    /// Start the controller task in the `Idle` phase
    pub fn spawn(
        api: Arc<dyn CrowdApi>,
        forecast: &ForecastConfig,
        config: &DashboardConfig,
    ) -> DashboardHandle {
        let (commands_tx, commands) = mpsc::channel(config.command_buffer.max(1));
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let state = DashboardState::new();
        let (state_tx, state_rx) = watch::channel(state.clone());

        let controller = Self {
            snapshots: SnapshotService::new(api.clone()),
            forecast: ForecastService::new(api, forecast),
            state,
            state_tx,
            commands,
            completions_tx,
            completions_rx,
        };
        tokio::spawn(controller.run());

        DashboardHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(DashboardCommand::SelectScope(scope)) => self.begin_batch(scope),
                    Some(DashboardCommand::Refresh) => {
                        let scope = self.state.scope.clone();
                        self.begin_batch(scope);
                    }
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => self.complete_batch(completion),
            }
        }
        tracing::info!("Dashboard controller stopped");
    }

    fn begin_batch(&mut self, scope: Scope) {
        self.state.generation += 1;
        self.state.scope = scope.clone();
        self.state.phase = DashboardPhase::Fetching;
        self.publish();

        let generation = self.state.generation;
        let include_districts = scope.is_all() || self.state.districts.is_empty();
        let known_districts = self.state.districts.clone();
        let snapshots = self.snapshots.clone();
        let forecast = self.forecast.clone();
        let completions = self.completions_tx.clone();

        tracing::info!("Starting batch {} for {}", generation, scope);
        tokio::spawn(async move {
            let outcome = load_batch(
                &snapshots,
                &forecast,
                &scope,
                include_districts,
                known_districts,
            )
            .await;
            // Receiver lives as long as the controller
            let _ = completions.send(BatchCompletion {
                generation,
                scope,
                outcome,
            });
        });
    }

    fn complete_batch(&mut self, completion: BatchCompletion) {
        if completion.generation != self.state.generation {
            tracing::debug!(
                "Discarding stale batch {} for {} (current {} for {})",
                completion.generation,
                completion.scope,
                self.state.generation,
                self.state.scope
            );
            return;
        }

        match completion.outcome {
            Ok(load) => {
                if let Some(districts) = load.districts {
                    self.state.districts = districts;
                }
                tracing::info!("Batch {} for {} ready", completion.generation, completion.scope);
                self.state.phase = DashboardPhase::Ready(DashboardData {
                    snapshots: load.snapshots,
                    forecast: load.forecast,
                    fetched_at: Utc::now(),
                });
            }
            Err(e) => {
                tracing::error!("Batch {} for {} failed: {}", completion.generation, completion.scope, e);
                self.state.phase = DashboardPhase::Failed {
                    reason: e.to_string(),
                };
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

/// Snapshots first, then the forecast for the same scope
async fn load_batch(
    snapshots: &SnapshotService,
    forecast: &ForecastService,
    scope: &Scope,
    include_districts: bool,
    known_districts: Vec<String>,
) -> AppResult<BatchLoad> {
    let fetched = snapshots.fetch_all(scope, include_districts).await?;
    let districts = fetched.districts.as_deref().unwrap_or(known_districts.as_slice());
    let predictions = forecast.generate_forecast(scope, districts).await;

    Ok(BatchLoad {
        snapshots: fetched.snapshots,
        districts: fetched.districts,
        forecast: predictions,
    })
}
