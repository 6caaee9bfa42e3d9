//! Reports produced by the schema provisioning routine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tables the application needs, in creation order.
pub const REQUIRED_TABLES: [&str; 5] = ["profiles", "custom_templates", "invitations", "guests", "rsvps"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Applied,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StepOutcome {
    pub name: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Result of a setup or reset run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetupReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepOutcome>,
    pub finished_at: DateTime<Utc>,
}

impl SetupReport {
    /// Name of the step that stopped the run, if any.
    pub fn failed_step(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Failed)
            .map(|s| s.name.as_str())
    }

    pub fn applied_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Applied)
            .count()
    }
}

/// Presence of each required table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseStatus {
    pub tables: BTreeMap<String, bool>,
    pub all_tables_exist: bool,
    pub message: String,
}

impl DatabaseStatus {
    pub fn from_tables(tables: BTreeMap<String, bool>) -> Self {
        let all_tables_exist = !tables.is_empty() && tables.values().all(|exists| *exists);
        let message = if all_tables_exist {
            "All tables exist"
        } else {
            "Some tables are missing"
        };
        Self {
            tables,
            all_tables_exist,
            message: message.to_string(),
        }
    }

    pub fn missing_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|(_, exists)| !**exists)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
