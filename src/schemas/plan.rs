//! Plan schema - A scheduled unit of terminal work

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlanContainer, PlanStatus, WorkingStatus};

/// Kind of terminal work a plan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Receiving,
    Destuffing,
    Stuffing,
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanType::Receiving => write!(f, "RECEIVING"),
            PlanType::Destuffing => write!(f, "DESTUFFING"),
            PlanType::Stuffing => write!(f, "STUFFING"),
        }
    }
}

/// A plan and its ordered containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Unique identifier
    pub id: String,

    /// Human-readable plan code
    pub code: String,

    /// Kind of work
    pub plan_type: PlanType,

    /// Current plan status
    pub status: PlanStatus,

    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,

    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,

    /// Stamped on the first entry into IN_PROGRESS
    #[serde(default)]
    pub execution_start_at: Option<DateTime<Utc>>,

    /// Stamped on entry into DONE
    #[serde(default)]
    pub execution_end_at: Option<DateTime<Utc>>,

    /// Handling equipment has been booked
    #[serde(default)]
    pub equipment_booked: bool,

    /// The port has been notified
    #[serde(default)]
    pub port_notified: bool,

    /// Set when the plan was put back into PENDING
    #[serde(default)]
    pub pending_since: Option<DateTime<Utc>>,

    /// Containers in plan order
    #[serde(default)]
    pub containers: Vec<PlanContainer>,
}

impl Plan {
    /// Create a new pending plan with no containers
    pub fn new(id: impl Into<String>, code: impl Into<String>, plan_type: PlanType) -> Self {
        Plan {
            id: id.into(),
            code: code.into(),
            plan_type,
            status: PlanStatus::Pending,
            planned_start: None,
            planned_end: None,
            execution_start_at: None,
            execution_end_at: None,
            equipment_booked: false,
            port_notified: false,
            pending_since: None,
            containers: Vec::new(),
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    pub fn with_status(mut self, status: PlanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_readiness(mut self, equipment_booked: bool, port_notified: bool) -> Self {
        self.equipment_booked = equipment_booked;
        self.port_notified = port_notified;
        self
    }

    /// Append a container, re-parenting it onto this plan
    pub fn with_container(mut self, mut container: PlanContainer) -> Self {
        container.plan_id = self.id.clone();
        self.containers.push(container);
        self
    }

    /// Return a new Plan with the container of the same id replaced.
    ///
    /// If no container matches, the plan is returned unchanged.
    pub fn with_container_replaced(mut self, container: PlanContainer) -> Self {
        if let Some(slot) = self.containers.iter_mut().find(|c| c.id == container.id) {
            *slot = container;
        }
        self
    }

    // ===== QUERIES =====

    pub fn container(&self, container_id: &str) -> Option<&PlanContainer> {
        self.containers.iter().find(|c| c.id == container_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == PlanStatus::InProgress
    }

    /// True when the plan has containers and every one of them is done
    pub fn all_containers_done(&self) -> bool {
        !self.containers.is_empty()
            && self
                .containers
                .iter()
                .all(|c| c.working_status == WorkingStatus::Done)
    }
}
