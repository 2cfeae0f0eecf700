//! Aggregate snapshots served by the statistics backend
//!
//! Every field defaults when absent so that a partially populated payload
//! still deserializes into a usable (if empty) snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::CrowdLevel;
use crate::types::DateRange;

/// Record counts per crowd level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CrowdDistribution {
    #[serde(rename = "High")]
    pub high: u64,
    #[serde(rename = "Medium")]
    pub medium: u64,
    #[serde(rename = "Low")]
    pub low: u64,
}

impl CrowdDistribution {
    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

/// `GET /api/statistics`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Statistics {
    pub total_records: u64,
    pub crowd_distribution: CrowdDistribution,
    pub avg_biometric: f64,
    pub avg_enrolment: f64,
    pub districts: Vec<String>,
    pub date_range: Option<DateRange>,
    pub total_biometric: u64,
    pub total_enrolment: u64,
    pub district: String,
}

/// Per-district activity totals
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DistrictStat {
    pub district: String,
    pub total_enrolment: f64,
    pub total_biometric: f64,
}

impl DistrictStat {
    pub fn new(district: impl Into<String>, total_biometric: f64, total_enrolment: f64) -> Self {
        Self {
            district: district.into(),
            total_enrolment,
            total_biometric,
        }
    }

    pub fn total(&self) -> f64 {
        self.total_biometric + self.total_enrolment
    }
}

/// Average activity for one weekday
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DayActivity {
    pub total_enrolment: f64,
    pub total_biometric: f64,
}

/// Record count for a (month, crowd level) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCrowd {
    pub month: u32,
    pub crowd_level: CrowdLevel,
    pub count: u64,
}

/// `GET /api/analytics`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Analytics {
    pub district_stats: Vec<DistrictStat>,
    pub day_analysis: HashMap<String, DayActivity>,
    pub monthly_crowd: Vec<MonthlyCrowd>,
    pub total_enrolment: u64,
    pub total_biometric: u64,
    pub peak_month: Option<u32>,
    pub peak_day: Option<String>,
    pub district: String,
}

/// Activity summed over one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MonthlyTrend {
    pub month: u32,
    pub year: i32,
    pub year_month: Option<String>,
    pub total_biometric: f64,
    pub total_enrolment: f64,
}

/// `GET /api/trends`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Trends {
    pub monthly: Vec<MonthlyTrend>,
    pub by_day: HashMap<String, f64>,
    pub district: String,
    pub total_records: u64,
}

/// `GET /api/districts`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DistrictList {
    pub districts: Vec<String>,
}

/// The three scope-dependent snapshots, always replaced together
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SnapshotSet {
    pub statistics: Statistics,
    pub analytics: Analytics,
    pub trends: Trends,
}

impl SnapshotSet {
    /// Record count shown in the dashboard header
    pub fn total_records(&self) -> u64 {
        if self.trends.total_records > 0 {
            self.trends.total_records
        } else {
            self.statistics.total_records
        }
    }
}
