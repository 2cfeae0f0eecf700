//! External API integrations

pub mod crowd_api;

pub use crowd_api::{CrowdApi, CrowdApiClient, HealthStatus};
