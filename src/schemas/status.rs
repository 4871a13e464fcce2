//! Status vocabularies shared by plans, containers, HBLs and package transactions

use serde::{Deserialize, Serialize};

/// Per-container (and per-HBL destuff) working status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkingStatus {
    /// Assigned but not started
    #[default]
    Waiting,
    /// Work under way
    InProgress,
    /// Work finished
    Done,
    /// Work paused pending a decision
    OnHold,
}

impl std::fmt::Display for WorkingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkingStatus::Waiting => write!(f, "waiting"),
            WorkingStatus::InProgress => write!(f, "in-progress"),
            WorkingStatus::Done => write!(f, "done"),
            WorkingStatus::OnHold => write!(f, "on-hold"),
        }
    }
}

impl std::str::FromStr for WorkingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::domain::normalize_working_status(Some(s))
            .ok_or_else(|| format!("Unknown working status: {}", s))
    }
}

/// Plan status, as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Scheduled, or set aside until readiness is restored
    Pending,
    /// The single active plan
    InProgress,
    /// All containers finished
    Done,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Pending => write!(f, "PENDING"),
            PlanStatus::InProgress => write!(f, "IN_PROGRESS"),
            PlanStatus::Done => write!(f, "DONE"),
        }
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(PlanStatus::Pending),
            "IN_PROGRESS" => Ok(PlanStatus::InProgress),
            "DONE" => Ok(PlanStatus::Done),
            _ => Err(format!("Unknown plan status: {}", s)),
        }
    }
}

/// Package transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    InProgress,
    Done,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::InProgress => write!(f, "IN_PROGRESS"),
            TransactionStatus::Done => write!(f, "DONE"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "IN_PROGRESS" => Ok(TransactionStatus::InProgress),
            "DONE" => Ok(TransactionStatus::Done),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}
