//! Day-of-week activity patterns used as model input features

use std::collections::HashMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekday names in presentation order
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English name of a weekday, as the backend expects it
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize]
}

/// Five demographic activity counters for one weekday
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DayPattern {
    pub age_0_5: u32,
    pub age_5_17: u32,
    pub age_18_plus: u32,
    pub bio_age_5_17: u32,
    pub bio_age_18_plus: u32,
}

impl DayPattern {
    pub const fn new(
        age_0_5: u32,
        age_5_17: u32,
        age_18_plus: u32,
        bio_age_5_17: u32,
        bio_age_18_plus: u32,
    ) -> Self {
        Self {
            age_0_5,
            age_5_17,
            age_18_plus,
            bio_age_5_17,
            bio_age_18_plus,
        }
    }

    /// Built-in row used when no district-specific pattern is available
    pub fn default_for(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::new(1, 3, 8, 5, 12),
            Weekday::Tue => Self::new(2, 4, 10, 6, 14),
            Weekday::Wed => Self::new(1, 2, 6, 4, 9),
            Weekday::Thu => Self::new(2, 5, 12, 8, 16),
            Weekday::Fri => Self::new(2, 4, 11, 7, 15),
            Weekday::Sat => Self::new(2, 5, 13, 9, 17),
            Weekday::Sun => Self::new(0, 1, 3, 2, 5),
        }
    }
}

/// Weekday name to pattern row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DayPatternTable(HashMap<String, DayPattern>);

impl DayPatternTable {
    pub fn from_rows(rows: HashMap<String, DayPattern>) -> Self {
        Self(rows)
    }

    /// Row for a weekday. A table fetched from the backend may omit days;
    /// those fall back to the built-in row.
    pub fn row(&self, day: Weekday) -> DayPattern {
        self.0
            .get(weekday_name(day))
            .copied()
            .unwrap_or_else(|| DayPattern::default_for(day))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DayPatternTable {
    fn default() -> Self {
        let rows = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|day| (weekday_name(day).to_string(), DayPattern::default_for(day)))
        .collect();
        Self(rows)
    }
}

/// `GET /api/district-averages/<district>`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DistrictAverages {
    pub district: Option<String>,
    pub averages: Option<DayPatternTable>,
    pub data_available: Option<bool>,
    pub records_analyzed: Option<u64>,
}
