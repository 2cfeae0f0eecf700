//! Inference endpoint request/response models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{weekday_name, DayPattern, DayPatternTable};

/// Crowd level predicted by the model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrowdLevel::Low => write!(f, "Low"),
            CrowdLevel::Medium => write!(f, "Medium"),
            CrowdLevel::High => write!(f, "High"),
        }
    }
}

/// Class probabilities. Need not sum to exactly 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Probabilities {
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Medium")]
    pub medium: f64,
    #[serde(rename = "High")]
    pub high: f64,
}

impl Probabilities {
    pub fn new(low: f64, medium: f64, high: f64) -> Self {
        Self { low, medium, high }
    }

    pub fn max(&self) -> f64 {
        self.low.max(self.medium).max(self.high)
    }
}

/// `POST /api/predict` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRequest {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_week: String,
    pub district: String,
    #[serde(flatten)]
    pub pattern: DayPattern,
}

impl PredictionRequest {
    /// Merge the date fields with the pattern row for that date's weekday
    pub fn for_date(date: NaiveDate, district: &str, patterns: &DayPatternTable) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: weekday_name(date.weekday()).to_string(),
            district: district.to_string(),
            pattern: patterns.row(date.weekday()),
        }
    }
}

/// Raw `POST /api/predict` response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction: Option<CrowdLevel>,
    pub probabilities: Option<Probabilities>,
    pub confidence: Option<f64>,
    pub warning: Option<String>,
    pub district_in_training: Option<bool>,
    pub error: Option<String>,
}

/// A successful day forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionSuccess {
    pub date: NaiveDate,
    pub day: String,
    pub prediction: CrowdLevel,
    pub probabilities: Probabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_in_training: Option<bool>,
}

/// A day whose prediction could not be obtained
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionFailure {
    pub date: NaiveDate,
    pub day: String,
    pub error: String,
}

/// Outcome for one forecast day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionResult {
    Success(PredictionSuccess),
    Failure(PredictionFailure),
}

impl PredictionResult {
    pub fn failure(date: NaiveDate, error: impl Into<String>) -> Self {
        PredictionResult::Failure(PredictionFailure {
            date,
            day: weekday_name(date.weekday()).to_string(),
            error: error.into(),
        })
    }

    /// Interpret a backend response for the given date
    pub fn from_response(date: NaiveDate, response: PredictionResponse) -> Self {
        if !response.success {
            let error = response
                .error
                .unwrap_or_else(|| "prediction failed".to_string());
            return Self::failure(date, error);
        }

        match (response.prediction, response.probabilities) {
            (Some(prediction), Some(probabilities)) => {
                PredictionResult::Success(PredictionSuccess {
                    date,
                    day: weekday_name(date.weekday()).to_string(),
                    prediction,
                    probabilities,
                    warning: response.warning,
                    district_in_training: response.district_in_training,
                })
            }
            _ => Self::failure(date, "incomplete prediction response"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    pub fn as_success(&self) -> Option<&PredictionSuccess> {
        match self {
            PredictionResult::Success(success) => Some(success),
            PredictionResult::Failure(_) => None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            PredictionResult::Success(s) => s.date,
            PredictionResult::Failure(f) => f.date,
        }
    }

    pub fn day(&self) -> &str {
        match self {
            PredictionResult::Success(s) => &s.day,
            PredictionResult::Failure(f) => &f.day,
        }
    }
}
