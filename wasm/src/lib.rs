//! WebAssembly module for Crowd Insights
//!
//! Provides client-side computation for:
//! - Forecast day classification and visiting windows
//! - Growth rates and statistical summaries for charts
//! - Optimal visiting day selection

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::analytics;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("crowd-insights wasm loaded"));
}

/// Crowd label ("Very Low", "Low", "Medium", "High") for a day's class probabilities
#[wasm_bindgen]
pub fn classify_forecast_day(low: f64, medium: f64, high: f64) -> String {
    let classification = analytics::classify_probabilities(&Probabilities::new(low, medium, high));
    classification.label.to_string()
}

/// Suggested visiting window for a crowd label, empty for an unknown label
#[wasm_bindgen]
pub fn crowd_time_window(label: &str) -> String {
    label
        .parse::<CrowdLabel>()
        .map(|l| l.time_window().to_string())
        .unwrap_or_default()
}

/// Biometric share of total activity in percent, one decimal
#[wasm_bindgen]
pub fn compute_biometric_ratio(biometric: f64, enrolment: f64) -> f64 {
    if !(biometric >= 0.0 && enrolment >= 0.0) {
        return 0.0;
    }
    // `as` saturates out-of-range values at u64::MAX
    analytics::biometric_ratio(biometric.round() as u64, enrolment.round() as u64)
        .to_f64()
        .unwrap_or(0.0)
}

/// Month-over-month growth for a JSON array of monthly totals
#[wasm_bindgen]
pub fn compute_growth_rates(totals_json: &str) -> Result<String, JsValue> {
    growth_rates_json(totals_json).map_err(|e| JsValue::from_str(&e))
}

/// Statistical summary of a JSON array of numbers, `null` when empty
#[wasm_bindgen]
pub fn compute_statistical_summary(values_json: &str) -> Result<String, JsValue> {
    statistical_summary_json(values_json).map_err(|e| JsValue::from_str(&e))
}

/// Recommended days for a JSON array of forecast results
#[wasm_bindgen]
pub fn select_optimal_days(results_json: &str) -> Result<String, JsValue> {
    optimal_days_json(results_json).map_err(|e| JsValue::from_str(&e))
}

fn growth_rates_json(totals_json: &str) -> Result<String, String> {
    let totals: Vec<u64> = serde_json::from_str(totals_json)
        .map_err(|e| format!("Invalid totals JSON: {}", e))?;

    let rates: Vec<f64> = analytics::growth_rates(&totals)
        .iter()
        .map(|rate| rate.to_f64().unwrap_or(0.0))
        .collect();
    serde_json::to_string(&rates).map_err(|e| e.to_string())
}

fn statistical_summary_json(values_json: &str) -> Result<String, String> {
    let values: Vec<f64> = serde_json::from_str(values_json)
        .map_err(|e| format!("Invalid values JSON: {}", e))?;

    serde_json::to_string(&analytics::summarize(&values)).map_err(|e| e.to_string())
}

fn optimal_days_json(results_json: &str) -> Result<String, String> {
    let results: Vec<PredictionResult> = serde_json::from_str(results_json)
        .map_err(|e| format!("Invalid forecast JSON: {}", e))?;

    serde_json::to_string(&analytics::select_optimal_days(&results)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_forecast_day() {
        assert_eq!(classify_forecast_day(0.8, 0.15, 0.05), "Very Low");
        assert_eq!(classify_forecast_day(0.5, 0.3, 0.2), "Low");
        assert_eq!(classify_forecast_day(0.2, 0.5, 0.3), "Medium");
        assert_eq!(classify_forecast_day(0.4, 0.4, 0.2), "Medium");
        assert_eq!(classify_forecast_day(0.3, 0.3, 0.3), "High");
    }

    #[test]
    fn test_crowd_time_window() {
        assert_eq!(crowd_time_window("Very Low"), "10-11 AM");
        assert_eq!(crowd_time_window("Medium"), "11 AM-12 PM");
        assert_eq!(crowd_time_window("High"), "2-3 PM");
        assert_eq!(crowd_time_window("Unknown"), "");
    }

    #[test]
    fn test_biometric_ratio() {
        assert!((compute_biometric_ratio(600.0, 400.0) - 60.0).abs() < 0.001);
        assert!((compute_biometric_ratio(1.0, 2.0) - 33.3).abs() < 0.001);
        assert_eq!(compute_biometric_ratio(0.0, 0.0), 0.0);
        assert_eq!(compute_biometric_ratio(-5.0, 10.0), 0.0);
        assert_eq!(compute_biometric_ratio(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_biometric_ratio_rounds_and_saturates() {
        // 1.6 and 2.4 round to 2 and 2, not truncate to 1 and 2
        assert!((compute_biometric_ratio(1.6, 2.4) - 50.0).abs() < 0.001);
        assert!((compute_biometric_ratio(1e20, 1.0) - 100.0).abs() < 0.001);
        assert!((compute_biometric_ratio(1e20, 1e20) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_growth_rates_json() {
        let rates: Vec<f64> =
            serde_json::from_str(&growth_rates_json("[100, 150, 0, 20]").unwrap()).unwrap();
        assert_eq!(rates, vec![0.0, 50.0, -100.0, 0.0]);
        assert!(growth_rates_json("not json").is_err());
    }

    #[test]
    fn test_statistical_summary_json() {
        assert_eq!(statistical_summary_json("[]").unwrap(), "null");

        let summary: serde_json::Value =
            serde_json::from_str(&statistical_summary_json("[1, 2, 3, 4]").unwrap()).unwrap();
        assert_eq!(summary["count"], 4);
        assert_eq!(summary["median"], 3.0);
        assert_eq!(summary["mean"], 2.5);
    }

    #[test]
    fn test_optimal_days_json() {
        let results = r#"[
            {"status": "success", "date": "2026-10-15", "day": "Thursday", "prediction": "High",
             "probabilities": {"Low": 0.1, "Medium": 0.2, "High": 0.7}},
            {"status": "success", "date": "2026-10-16", "day": "Friday", "prediction": "Low",
             "probabilities": {"Low": 0.6, "Medium": 0.3, "High": 0.1}},
            {"status": "failure", "date": "2026-10-17", "day": "Saturday", "error": "timeout"}
        ]"#;

        let selected: serde_json::Value =
            serde_json::from_str(&optimal_days_json(results).unwrap()).unwrap();
        let selected = selected.as_array().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["day"], "Friday");
        assert_eq!(selected[0]["crowdLabel"], "Low");
        assert_eq!(selected[0]["isOptimal"], true);
    }
}
