//! Business logic services for the crowd insights platform

pub mod dashboard;
pub mod forecast;
pub mod health;
pub mod pattern;
pub mod snapshot;

pub use dashboard::{DashboardCommand, DashboardController, DashboardHandle, DashboardState};
pub use forecast::{ForecastService, FORECAST_DAYS};
pub use health::{HealthGate, ReadyState};
pub use pattern::{resolve_district, PatternProvider};
pub use snapshot::{FetchedSnapshots, SnapshotService};
