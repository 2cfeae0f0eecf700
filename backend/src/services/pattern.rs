//! Day-of-week pattern lookup with a built-in fallback table

use std::sync::Arc;

use shared::{DayPatternTable, Scope};

use crate::external::CrowdApi;

/// District used for pattern lookup and every prediction request.
///
/// A named scope is used as-is. The unscoped view uses the first known
/// district, or `fallback` when no district list has been fetched.
pub fn resolve_district(scope: &Scope, known_districts: &[String], fallback: &str) -> String {
    match scope.district() {
        Some(name) => name.to_string(),
        None => known_districts
            .first()
            .cloned()
            .unwrap_or_else(|| fallback.to_string()),
    }
}

#[derive(Clone)]
pub struct PatternProvider {
    api: Arc<dyn CrowdApi>,
}

impl PatternProvider {
    pub fn new(api: Arc<dyn CrowdApi>) -> Self {
        Self { api }
    }

    /// District-specific pattern table, or the built-in table when the
    /// district's averages cannot be fetched. Never fails.
    pub async fn get_pattern(&self, district: &str) -> DayPatternTable {
        match self.api.district_averages(district).await {
            Ok(response) => match response.averages {
                Some(table) => {
                    tracing::debug!(
                        "Using district-specific averages for {} ({} days)",
                        district,
                        table.len()
                    );
                    table
                }
                None => {
                    tracing::warn!("No averages returned for {}, using defaults", district);
                    DayPatternTable::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Could not fetch averages for {}, using defaults: {}",
                    district,
                    e
                );
                DayPatternTable::default()
            }
        }
    }
}
