//! Concurrent retrieval of the scope-dependent snapshots

use std::sync::Arc;

use shared::{Scope, SnapshotSet};

use crate::error::AppResult;
use crate::external::CrowdApi;

/// Result of one snapshot fetch
#[derive(Debug, Clone)]
pub struct FetchedSnapshots {
    pub snapshots: SnapshotSet,
    /// Present only when the district list was requested
    pub districts: Option<Vec<String>>,
}

/// Snapshot fetcher
#[derive(Clone)]
pub struct SnapshotService {
    api: Arc<dyn CrowdApi>,
}

impl SnapshotService {
    pub fn new(api: Arc<dyn CrowdApi>) -> Self {
        Self { api }
    }

    /// Fetch statistics, analytics and trends (and optionally the district
    /// list) concurrently. Every request settles before the result is
    /// decided; any single failure fails the whole fetch.
    pub async fn fetch_all(
        &self,
        scope: &Scope,
        include_districts: bool,
    ) -> AppResult<FetchedSnapshots> {
        let districts = async {
            if include_districts {
                self.api.districts().await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (statistics, analytics, trends, districts) = tokio::join!(
            self.api.statistics(scope),
            self.api.analytics(scope),
            self.api.trends(scope),
            districts,
        );

        let failures = [
            ("statistics", statistics.as_ref().err()),
            ("analytics", analytics.as_ref().err()),
            ("trends", trends.as_ref().err()),
            ("districts", districts.as_ref().err()),
        ];
        for (kind, error) in failures {
            if let Some(e) = error {
                tracing::error!("Failed to fetch {} for {}: {}", kind, scope, e);
            }
        }

        Ok(FetchedSnapshots {
            snapshots: SnapshotSet {
                statistics: statistics?,
                analytics: analytics?,
                trends: trends?,
            },
            districts: districts?,
        })
    }
}
