//! Headline KPIs and share breakdowns

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{Analytics, CrowdDistribution};

/// Round to one decimal place, halves away from zero
pub fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Headline numbers for the analytics view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    pub total_activity: u64,
    /// Percentage of activity that was biometric updates, one decimal
    pub biometric_ratio: Decimal,
    pub avg_per_district: u64,
    pub active_districts: usize,
}

/// Biometric share of total activity in percent. Zero when there is no activity.
pub fn biometric_ratio(total_biometric: u64, total_enrolment: u64) -> Decimal {
    let biometric = Decimal::from(total_biometric);
    let total = biometric + Decimal::from(total_enrolment);
    if total.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = biometric / total * Decimal::ONE_HUNDRED;
    round_one_decimal(ratio)
}

pub fn compute_kpis(analytics: &Analytics) -> Kpis {
    let total_activity = analytics
        .total_biometric
        .saturating_add(analytics.total_enrolment);
    let active_districts = analytics.district_stats.len();
    let avg_per_district = if active_districts == 0 {
        0
    } else {
        (total_activity as f64 / active_districts as f64).round() as u64
    };

    Kpis {
        total_activity,
        biometric_ratio: biometric_ratio(analytics.total_biometric, analytics.total_enrolment),
        avg_per_district,
        active_districts,
    }
}

/// Biometric vs enrolment split
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDistribution {
    pub biometric: u64,
    pub enrolment: u64,
}

pub fn service_distribution(analytics: &Analytics) -> ServiceDistribution {
    ServiceDistribution {
        biometric: analytics.total_biometric,
        enrolment: analytics.total_enrolment,
    }
}

/// Crowd levels as whole percentages of all classified records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CrowdShare {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

pub fn crowd_share(distribution: &CrowdDistribution) -> CrowdShare {
    let total = distribution.total();
    if total == 0 {
        return CrowdShare::default();
    }
    let percent = |count: u64| (count as f64 / total as f64 * 100.0).round() as u32;

    CrowdShare {
        high: percent(distribution.high),
        medium: percent(distribution.medium),
        low: percent(distribution.low),
    }
}
