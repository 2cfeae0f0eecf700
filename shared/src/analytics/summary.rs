//! Distribution statistics over per-district activity

use serde::{Deserialize, Serialize};

use crate::models::DistrictStat;

/// Districts plotted in the biometric/enrolment scatter
pub const CORRELATION_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatisticalSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    /// Population variance
    pub variance: f64,
    pub std_dev: f64,
}

/// Summarize a sample. `None` for an empty sample.
///
/// The median is the element at index `n / 2` of the sorted sample; for even
/// `n` this is the upper of the two central values, not their average.
pub fn summarize(values: &[f64]) -> Option<StatisticalSummary> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = sorted[sorted.len() / 2];
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Some(StatisticalSummary {
        count: values.len(),
        mean,
        median,
        max,
        min,
        variance,
        std_dev: variance.sqrt(),
    })
}

/// Summary of `biometric + enrolment` across districts
pub fn district_activity_summary(stats: &[DistrictStat]) -> Option<StatisticalSummary> {
    let activities: Vec<f64> = stats.iter().map(DistrictStat::total).collect();
    summarize(&activities)
}

/// One paired sample for the correlation chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationPoint {
    pub district: String,
    pub biometric: f64,
    pub enrolment: f64,
}

pub fn correlation_series(stats: &[DistrictStat]) -> Vec<CorrelationPoint> {
    stats
        .iter()
        .take(CORRELATION_LIMIT)
        .map(|stat| CorrelationPoint {
            district: stat.district.clone(),
            biometric: stat.total_biometric,
            enrolment: stat.total_enrolment,
        })
        .collect()
}
