//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Sentinel used by the statistics backend for the unscoped view
pub const ALL_DISTRICTS: &str = "All";

/// District filter applied to every data view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every district aggregated together
    #[default]
    All,
    /// A single named district
    District(String),
}

impl Scope {
    /// Parse a scope from user input. Empty input and the `All` sentinel both
    /// select the unscoped view.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_DISTRICTS {
            Scope::All
        } else {
            Scope::District(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn district(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::District(name) => Some(name),
        }
    }

    /// Value sent as the `district` query parameter
    pub fn as_query(&self) -> &str {
        match self {
            Scope::All => ALL_DISTRICTS,
            Scope::District(name) => name,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

impl Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Scope::parse(&value))
    }
}

/// Date range covered by a statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}
