//! Time series and per-district breakdowns

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::kpis::round_one_decimal;
use crate::models::{Analytics, CrowdLevel, DistrictStat, MonthlyCrowd, Trends, WEEKDAYS};
use crate::types::Scope;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Districts in the trends comparison chart
pub const COMPARISON_LIMIT: usize = 10;

/// Districts in the performance ranking
pub const PERFORMANCE_LIMIT: usize = 8;

/// Three-letter month name for a 1-based month, empty when out of range
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("")
}

/// First two words of a district name
pub fn short_district_label(district: &str) -> String {
    district.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Growth
// ============================================================================

/// Month-over-month growth in percent, one decimal.
///
/// The first month is always 0. A month following a zero total is also 0.
pub fn growth_rates(totals: &[u64]) -> Vec<Decimal> {
    totals
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            if idx == 0 {
                return Decimal::ZERO;
            }
            let previous = totals[idx - 1];
            if previous == 0 {
                return Decimal::ZERO;
            }
            let previous = Decimal::from(previous);
            let change = (Decimal::from(value) - previous) / previous * Decimal::ONE_HUNDRED;
            round_one_decimal(change)
        })
        .collect()
}

/// Records summed per month, months ascending
pub fn monthly_totals(monthly_crowd: &[MonthlyCrowd]) -> Vec<(u32, u64)> {
    let mut totals: BTreeMap<u32, u64> = BTreeMap::new();
    for entry in monthly_crowd {
        *totals.entry(entry.month).or_default() += entry.count;
    }
    totals.into_iter().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthPoint {
    pub month: u32,
    pub label: String,
    pub total: u64,
    pub rate: Decimal,
}

pub fn growth_analysis(monthly_crowd: &[MonthlyCrowd]) -> Vec<GrowthPoint> {
    let totals = monthly_totals(monthly_crowd);
    let values: Vec<u64> = totals.iter().map(|(_, total)| *total).collect();
    let rates = growth_rates(&values);

    totals
        .into_iter()
        .zip(rates)
        .map(|((month, total), rate)| GrowthPoint {
            month,
            label: month_label(month).to_string(),
            total,
            rate,
        })
        .collect()
}

// ============================================================================
// Monthly series
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCrowdPoint {
    pub month: u32,
    pub label: String,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Crowd level counts per month, months ascending
pub fn monthly_crowd_breakdown(monthly_crowd: &[MonthlyCrowd]) -> Vec<MonthlyCrowdPoint> {
    let mut months: BTreeMap<u32, MonthlyCrowdPoint> = BTreeMap::new();
    for entry in monthly_crowd {
        let point = months.entry(entry.month).or_insert_with(|| MonthlyCrowdPoint {
            month: entry.month,
            label: month_label(entry.month).to_string(),
            high: 0,
            medium: 0,
            low: 0,
        });
        match entry.crowd_level {
            CrowdLevel::High => point.high += entry.count,
            CrowdLevel::Medium => point.medium += entry.count,
            CrowdLevel::Low => point.low += entry.count,
        }
    }
    months.into_values().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyTrendPoint {
    pub label: String,
    pub biometric: u64,
    pub enrolment: u64,
}

/// Monthly activity in chronological order
pub fn monthly_trend(trends: &Trends) -> Vec<MonthlyTrendPoint> {
    let mut monthly: Vec<_> = trends.monthly.iter().collect();
    monthly.sort_by_key(|m| (m.year, m.month));

    monthly
        .into_iter()
        .map(|m| MonthlyTrendPoint {
            label: m
                .year_month
                .clone()
                .unwrap_or_else(|| format!("{} {}", month_label(m.month), m.year)),
            biometric: m.total_biometric.round() as u64,
            enrolment: m.total_enrolment.round() as u64,
        })
        .collect()
}

// ============================================================================
// Weekly series
// ============================================================================

/// Relative activity band within a week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityBand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyPatternPoint {
    pub day: String,
    pub value: u64,
    pub band: ActivityBand,
}

/// Activity by weekday, Monday first, banded against the busiest day
pub fn weekly_pattern(trends: &Trends) -> Vec<WeeklyPatternPoint> {
    let values: Vec<u64> = WEEKDAYS
        .iter()
        .map(|day| trends.by_day.get(*day).copied().unwrap_or(0.0).round() as u64)
        .collect();
    let peak = values.iter().copied().max().unwrap_or(0) as f64;

    WEEKDAYS
        .iter()
        .zip(values)
        .map(|(day, value)| {
            let band = if value as f64 > peak * 0.8 {
                ActivityBand::High
            } else if value as f64 > peak * 0.6 {
                ActivityBand::Medium
            } else {
                ActivityBand::Low
            };
            WeeklyPatternPoint {
                day: day.to_string(),
                value,
                band,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayComparison {
    pub day: String,
    pub biometric: f64,
    pub enrolment: f64,
}

/// Average biometric/enrolment per weekday, Monday first
pub fn day_wise_comparison(analytics: &Analytics) -> Vec<DayComparison> {
    WEEKDAYS
        .iter()
        .map(|day| {
            let activity = analytics.day_analysis.get(*day).copied().unwrap_or_default();
            DayComparison {
                day: day.to_string(),
                biometric: activity.total_biometric,
                enrolment: activity.total_enrolment,
            }
        })
        .collect()
}

// ============================================================================
// District breakdowns
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictBar {
    pub district: String,
    pub label: String,
    pub biometric: f64,
    pub enrolment: f64,
    pub total: f64,
}

impl From<&DistrictStat> for DistrictBar {
    fn from(stat: &DistrictStat) -> Self {
        Self {
            district: stat.district.clone(),
            label: short_district_label(&stat.district),
            biometric: stat.total_biometric,
            enrolment: stat.total_enrolment,
            total: stat.total(),
        }
    }
}

/// The selected district alone, or the first `limit` districts when unscoped
pub fn district_comparison(stats: &[DistrictStat], scope: &Scope, limit: usize) -> Vec<DistrictBar> {
    match scope.district() {
        Some(name) => stats
            .iter()
            .find(|stat| stat.district == name)
            .map(DistrictBar::from)
            .into_iter()
            .collect(),
        None => stats.iter().take(limit).map(DistrictBar::from).collect(),
    }
}
