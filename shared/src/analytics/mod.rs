//! Derived analytics over fetched snapshots and forecast batches
//!
//! Everything here is pure and synchronous: no I/O, no shared state. Missing
//! inputs produce empty series, zeroes or `None` rather than errors.

pub mod forecast;
pub mod kpis;
pub mod summary;
pub mod trends;

pub use forecast::*;
pub use kpis::*;
pub use summary::*;
pub use trends::*;

use serde::{Deserialize, Serialize};

use crate::models::{OptimalDayRecommendation, PredictionResult, SnapshotSet};
use crate::types::Scope;

/// Every derived metric for one ready dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardInsights {
    pub scope: Scope,
    pub total_records: u64,
    pub kpis: Kpis,
    pub summary: Option<StatisticalSummary>,
    pub correlation: Vec<CorrelationPoint>,
    pub growth: Vec<GrowthPoint>,
    pub crowd_share: CrowdShare,
    pub service_distribution: ServiceDistribution,
    pub weekly_pattern: Vec<WeeklyPatternPoint>,
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    pub monthly_crowd: Vec<MonthlyCrowdPoint>,
    pub day_wise: Vec<DayComparison>,
    pub district_comparison: Vec<DistrictBar>,
    pub district_performance: Vec<DistrictBar>,
    pub peak_month: Option<u32>,
    pub peak_day: Option<String>,
    pub forecast: ForecastInsights,
}

/// Forecast-derived view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastInsights {
    pub results: Vec<PredictionResult>,
    pub recommendations: Vec<OptimalDayRecommendation>,
    pub congestion: Vec<CongestionPoint>,
    pub has_training_warnings: bool,
}

impl ForecastInsights {
    pub fn project(results: &[PredictionResult]) -> Self {
        Self {
            results: results.to_vec(),
            recommendations: select_optimal_days(results),
            congestion: congestion_series(results),
            has_training_warnings: has_training_warnings(results),
        }
    }
}

impl DashboardInsights {
    pub fn project(scope: &Scope, snapshots: &SnapshotSet, forecast: &[PredictionResult]) -> Self {
        let analytics = &snapshots.analytics;
        let stats = &analytics.district_stats;

        Self {
            scope: scope.clone(),
            total_records: snapshots.total_records(),
            kpis: compute_kpis(analytics),
            summary: district_activity_summary(stats),
            correlation: correlation_series(stats),
            growth: growth_analysis(&analytics.monthly_crowd),
            crowd_share: crowd_share(&snapshots.statistics.crowd_distribution),
            service_distribution: service_distribution(analytics),
            weekly_pattern: weekly_pattern(&snapshots.trends),
            monthly_trend: monthly_trend(&snapshots.trends),
            monthly_crowd: monthly_crowd_breakdown(&analytics.monthly_crowd),
            day_wise: day_wise_comparison(analytics),
            district_comparison: district_comparison(stats, scope, COMPARISON_LIMIT),
            district_performance: district_comparison(stats, scope, PERFORMANCE_LIMIT),
            peak_month: analytics.peak_month,
            peak_day: analytics.peak_day.clone(),
            forecast: ForecastInsights::project(forecast),
        }
    }
}
