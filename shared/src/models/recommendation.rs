//! Visit recommendations derived from a forecast batch

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crowd label shown to visitors, ordered by severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrowdLabel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

impl CrowdLabel {
    /// Suggested visiting window for this crowd label
    pub fn time_window(&self) -> &'static str {
        match self {
            CrowdLabel::VeryLow | CrowdLabel::Low => "10-11 AM",
            CrowdLabel::Medium => "11 AM-12 PM",
            CrowdLabel::High => "2-3 PM",
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, CrowdLabel::VeryLow | CrowdLabel::Low)
    }

    /// Rank used when no day is optimal (lower is better)
    pub fn severity(&self) -> u8 {
        match self {
            CrowdLabel::VeryLow => 0,
            CrowdLabel::Low => 1,
            CrowdLabel::Medium => 2,
            CrowdLabel::High => 3,
        }
    }
}

impl std::fmt::Display for CrowdLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrowdLabel::VeryLow => write!(f, "Very Low"),
            CrowdLabel::Low => write!(f, "Low"),
            CrowdLabel::Medium => write!(f, "Medium"),
            CrowdLabel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown crowd label: {0}")]
pub struct UnknownCrowdLabel(pub String);

impl std::str::FromStr for CrowdLabel {
    type Err = UnknownCrowdLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Very Low" => Ok(CrowdLabel::VeryLow),
            "Low" => Ok(CrowdLabel::Low),
            "Medium" => Ok(CrowdLabel::Medium),
            "High" => Ok(CrowdLabel::High),
            other => Err(UnknownCrowdLabel(other.to_string())),
        }
    }
}

/// A recommended day to visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimalDayRecommendation {
    pub day: String,
    pub date: NaiveDate,
    pub crowd_label: CrowdLabel,
    pub recommended_time_window: String,
    pub confidence_percent: u32,
    pub is_optimal: bool,
}
