//! Visit recommendations and chart series derived from a forecast batch

use serde::{Deserialize, Serialize};

use crate::models::{
    CrowdLabel, CrowdLevel, OptimalDayRecommendation, PredictionResult, PredictionSuccess,
    Probabilities,
};

/// Recommendations returned per batch
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Low-crowd probability above which a day counts as "Very Low"
pub const VERY_LOW_THRESHOLD: f64 = 0.70;

/// Congestion score used for days without a prediction
pub const UNKNOWN_CONGESTION: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayClassification {
    pub label: CrowdLabel,
    /// Probability backing the label, in [0, 1]
    pub confidence: f64,
}

impl DayClassification {
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round().max(0.0) as u32
    }
}

/// Label a day from its class probabilities.
///
/// Low wins only when strictly greater than both others; otherwise Medium wins
/// when strictly greater than High; every remaining tie resolves to High.
pub fn classify_probabilities(p: &Probabilities) -> DayClassification {
    if p.low > p.medium && p.low > p.high {
        let label = if p.low > VERY_LOW_THRESHOLD {
            CrowdLabel::VeryLow
        } else {
            CrowdLabel::Low
        };
        DayClassification {
            label,
            confidence: p.low,
        }
    } else if p.medium > p.high {
        DayClassification {
            label: CrowdLabel::Medium,
            confidence: p.medium,
        }
    } else {
        DayClassification {
            label: CrowdLabel::High,
            confidence: p.high,
        }
    }
}

pub fn recommend_day(prediction: &PredictionSuccess) -> OptimalDayRecommendation {
    let classification = classify_probabilities(&prediction.probabilities);
    OptimalDayRecommendation {
        day: prediction.day.clone(),
        date: prediction.date,
        crowd_label: classification.label,
        recommended_time_window: classification.label.time_window().to_string(),
        confidence_percent: classification.confidence_percent(),
        is_optimal: classification.label.is_optimal(),
    }
}

/// Pick the days to recommend from a forecast batch.
///
/// Up to four optimal days in date order. When none of the successful days is
/// optimal, the four least crowded days by severity instead (ties keep date
/// order). Empty only when every prediction failed.
pub fn select_optimal_days(results: &[PredictionResult]) -> Vec<OptimalDayRecommendation> {
    let mut days: Vec<OptimalDayRecommendation> = results
        .iter()
        .filter_map(PredictionResult::as_success)
        .map(recommend_day)
        .collect();

    if days.iter().any(|d| d.is_optimal) {
        return days
            .into_iter()
            .filter(|d| d.is_optimal)
            .take(MAX_RECOMMENDATIONS)
            .collect();
    }

    days.sort_by_key(|d| d.crowd_label.severity());
    days.truncate(MAX_RECOMMENDATIONS);
    days
}

/// True when any successful day was predicted from general patterns
pub fn has_training_warnings(results: &[PredictionResult]) -> bool {
    results
        .iter()
        .filter_map(PredictionResult::as_success)
        .any(|p| p.warning.is_some() || p.district_in_training == Some(false))
}

/// Point colour band in the congestion chart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CongestionBand {
    High,
    Elevated,
    Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CongestionPoint {
    pub label: String,
    pub score: u32,
    pub band: CongestionBand,
}

fn forecast_day_label(offset: usize) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => format!("Day {}", n + 1),
    }
}

/// Congestion score in [0, 100] for one day
pub fn congestion_score(result: &PredictionResult) -> u32 {
    let Some(prediction) = result.as_success() else {
        return UNKNOWN_CONGESTION;
    };

    let base = match prediction.prediction {
        CrowdLevel::High => 85.0,
        CrowdLevel::Medium => 55.0,
        CrowdLevel::Low => 25.0,
    };
    let variance = (prediction.probabilities.max() - 0.5) * 20.0;
    (base + variance).clamp(0.0, 100.0).round() as u32
}

/// Congestion line for the 7-day chart, one point per result in offset order
pub fn congestion_series(results: &[PredictionResult]) -> Vec<CongestionPoint> {
    results
        .iter()
        .enumerate()
        .map(|(offset, result)| {
            let score = congestion_score(result);
            let band = if score > 80 {
                CongestionBand::High
            } else if score > 60 {
                CongestionBand::Elevated
            } else {
                CongestionBand::Normal
            };
            CongestionPoint {
                label: forecast_day_label(offset),
                score,
                band,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn success(offset: i64, prediction: CrowdLevel, p: Probabilities) -> PredictionResult {
        let date = start() + Duration::days(offset);
        PredictionResult::Success(PredictionSuccess {
            date,
            day: crate::models::weekday_name(date.weekday()).to_string(),
            prediction,
            probabilities: p,
            warning: None,
            district_in_training: Some(true),
        })
    }

    fn failure(offset: i64) -> PredictionResult {
        PredictionResult::failure(start() + Duration::days(offset), "connection refused")
    }

    #[test]
    fn test_very_low_classification() {
        let classification = classify_probabilities(&Probabilities::new(0.75, 0.15, 0.10));
        assert_eq!(classification.label, CrowdLabel::VeryLow);
        assert_eq!(classification.confidence_percent(), 75);
        assert_eq!(classification.label.time_window(), "10-11 AM");
        assert!(classification.label.is_optimal());
    }

    #[test]
    fn test_low_medium_high_classification() {
        let low = classify_probabilities(&Probabilities::new(0.70, 0.20, 0.10));
        assert_eq!(low.label, CrowdLabel::Low);

        let medium = classify_probabilities(&Probabilities::new(0.2, 0.5, 0.3));
        assert_eq!(medium.label, CrowdLabel::Medium);
        assert_eq!(medium.label.time_window(), "11 AM-12 PM");
        assert_eq!(medium.confidence_percent(), 50);

        let high = classify_probabilities(&Probabilities::new(0.1, 0.3, 0.6));
        assert_eq!(high.label, CrowdLabel::High);
        assert_eq!(high.label.time_window(), "2-3 PM");
        assert!(!high.label.is_optimal());
    }

    #[test]
    fn test_ties_resolve_upwards() {
        // Low tied with Medium: Low does not win
        let tied = classify_probabilities(&Probabilities::new(0.4, 0.4, 0.2));
        assert_eq!(tied.label, CrowdLabel::Medium);

        // Medium tied with High: High wins
        let tied = classify_probabilities(&Probabilities::new(0.2, 0.4, 0.4));
        assert_eq!(tied.label, CrowdLabel::High);
        assert_eq!(tied.confidence, 0.4);
    }

    #[test]
    fn test_selects_first_four_optimal_days_in_order() {
        let low = Probabilities::new(0.6, 0.3, 0.1);
        let high = Probabilities::new(0.1, 0.2, 0.7);
        let results: Vec<PredictionResult> = (0..7)
            .map(|i| {
                if i == 1 {
                    success(i, CrowdLevel::High, high)
                } else {
                    success(i, CrowdLevel::Low, low)
                }
            })
            .collect();

        let picked = select_optimal_days(&results);
        assert_eq!(picked.len(), MAX_RECOMMENDATIONS);
        let offsets: Vec<i64> = picked
            .iter()
            .map(|r| (r.date - start()).num_days())
            .collect();
        assert_eq!(offsets, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_falls_back_to_least_severe_days() {
        let medium = Probabilities::new(0.2, 0.5, 0.3);
        let high = Probabilities::new(0.1, 0.2, 0.7);
        let results = vec![
            success(0, CrowdLevel::High, high),
            success(1, CrowdLevel::Medium, medium),
            success(2, CrowdLevel::High, high),
            success(3, CrowdLevel::Medium, medium),
            success(4, CrowdLevel::High, high),
            success(5, CrowdLevel::High, high),
            success(6, CrowdLevel::Medium, medium),
        ];

        let picked = select_optimal_days(&results);
        let summary: Vec<(i64, CrowdLabel)> = picked
            .iter()
            .map(|r| ((r.date - start()).num_days(), r.crowd_label))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, CrowdLabel::Medium),
                (3, CrowdLabel::Medium),
                (6, CrowdLabel::Medium),
                (0, CrowdLabel::High),
            ]
        );
        assert!(picked.iter().all(|r| !r.is_optimal));
    }

    #[test]
    fn test_selection_skips_failures() {
        let results = vec![
            failure(0),
            success(1, CrowdLevel::High, Probabilities::new(0.1, 0.2, 0.7)),
            failure(2),
        ];
        let picked = select_optimal_days(&results);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].day, "Saturday");

        let all_failed: Vec<PredictionResult> = (0..7).map(failure).collect();
        assert!(select_optimal_days(&all_failed).is_empty());
    }

    #[test]
    fn test_congestion_series() {
        let results = vec![
            success(0, CrowdLevel::High, Probabilities::new(0.0, 0.1, 0.9)),
            failure(1),
            success(2, CrowdLevel::Medium, Probabilities::new(0.2, 0.6, 0.2)),
            success(3, CrowdLevel::Low, Probabilities::new(0.5, 0.3, 0.2)),
        ];

        let series = congestion_series(&results);
        assert_eq!(series[0].label, "Today");
        assert_eq!(series[0].score, 93);
        assert_eq!(series[0].band, CongestionBand::High);
        assert_eq!(series[1].label, "Tomorrow");
        assert_eq!(series[1].score, UNKNOWN_CONGESTION);
        assert_eq!(series[2].label, "Day 3");
        assert_eq!(series[2].score, 57);
        assert_eq!(series[2].band, CongestionBand::Normal);
        assert_eq!(series[3].score, 25);
    }

    #[test]
    fn test_training_warnings() {
        let mut results = vec![success(0, CrowdLevel::Low, Probabilities::new(0.8, 0.1, 0.1))];
        assert!(!has_training_warnings(&results));

        if let PredictionResult::Success(s) = &mut results[0] {
            s.district_in_training = Some(false);
        }
        assert!(has_training_warnings(&results));
    }
}
