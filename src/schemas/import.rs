//! Import job schema - Status of a long-running import watched by the poller

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImportStatus {
    /// Polling stops once a terminal status is observed
    pub fn is_terminal(self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStatus::Pending => write!(f, "PENDING"),
            ImportStatus::Processing => write!(f, "PROCESSING"),
            ImportStatus::Completed => write!(f, "COMPLETED"),
            ImportStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: String,
    pub status: ImportStatus,
    #[serde(default)]
    pub message: Option<String>,
}
