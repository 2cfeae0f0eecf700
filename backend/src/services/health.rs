//! Inference model readiness check run before every forecast batch

use std::sync::Arc;

use serde::Serialize;

use crate::external::CrowdApi;

/// Whether the inference endpoint can serve predictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadyState {
    Ready,
    NotReady { reason: String },
}

impl ReadyState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadyState::Ready)
    }
}

#[derive(Clone)]
pub struct HealthGate {
    api: Arc<dyn CrowdApi>,
}

impl HealthGate {
    pub fn new(api: Arc<dyn CrowdApi>) -> Self {
        Self { api }
    }

    /// Ready only when the backend answers and reports the model as loaded
    pub async fn check_ready(&self) -> ReadyState {
        match self.api.health().await {
            Ok(health) if health.model_loaded => ReadyState::Ready,
            Ok(_) => {
                tracing::warn!("Inference model not loaded on backend");
                ReadyState::NotReady {
                    reason: "model not loaded".to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", e);
                ReadyState::NotReady {
                    reason: e.to_string(),
                }
            }
        }
    }
}
