//! Plan container schema - A container assigned to a plan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HblDestuffStatus, WorkingStatus};
use crate::domain::{allowed_container_targets, resolve_working_status};
use crate::errors::{CfsError, Result};

/// How much cargo ended up in the container when work completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoLoadedStatus {
    Empty,
    Partial,
    Full,
}

impl std::fmt::Display for CargoLoadedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CargoLoadedStatus::Empty => write!(f, "empty"),
            CargoLoadedStatus::Partial => write!(f, "partial"),
            CargoLoadedStatus::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for CargoLoadedStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(CargoLoadedStatus::Empty),
            "partial" => Ok(CargoLoadedStatus::Partial),
            "full" => Ok(CargoLoadedStatus::Full),
            _ => Err(format!("Unknown cargo loaded status: {}", s)),
        }
    }
}

/// A container within a plan, with its seal lifecycle and assigned HBLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContainer {
    pub id: String,

    /// Owning plan
    #[serde(default)]
    pub plan_id: String,

    /// Reference to the order container record
    #[serde(default)]
    pub order_container_id: Option<String>,

    #[serde(default)]
    pub container_number: Option<String>,

    #[serde(default)]
    pub working_status: WorkingStatus,

    #[serde(default)]
    pub unsealed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub unsealed_by: Option<String>,

    #[serde(default)]
    pub resealed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub resealed_by: Option<String>,

    #[serde(default)]
    pub new_seal_number: Option<String>,

    #[serde(default)]
    pub reseal_note: Option<String>,

    #[serde(default)]
    pub cargo_loaded_status: Option<CargoLoadedStatus>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_by: Option<String>,

    #[serde(default)]
    pub completion_notes: Option<String>,

    #[serde(default)]
    pub bypass_storage_flag: bool,

    /// Packing lists assigned directly, in addition to those linked through HBLs
    #[serde(default)]
    pub packing_list_ids: Vec<String>,

    #[serde(default)]
    pub hbls: Vec<HblDestuffStatus>,
}

impl PlanContainer {
    /// Create a new waiting container
    pub fn new(id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        PlanContainer {
            id: id.into(),
            plan_id: plan_id.into(),
            order_container_id: None,
            container_number: None,
            working_status: WorkingStatus::Waiting,
            unsealed_at: None,
            unsealed_by: None,
            resealed_at: None,
            resealed_by: None,
            new_seal_number: None,
            reseal_note: None,
            cargo_loaded_status: None,
            completed_at: None,
            completed_by: None,
            completion_notes: None,
            bypass_storage_flag: false,
            packing_list_ids: Vec::new(),
            hbls: Vec::new(),
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    pub fn with_working_status(mut self, status: WorkingStatus) -> Self {
        self.working_status = status;
        self
    }

    pub fn with_hbl(mut self, hbl: HblDestuffStatus) -> Self {
        self.hbls.push(hbl);
        self
    }

    pub fn with_packing_list(mut self, packing_list_id: impl Into<String>) -> Self {
        self.packing_list_ids.push(packing_list_id.into());
        self
    }

    /// Return a new container with the HBL of the same id replaced.
    ///
    /// If no HBL matches, the container is returned unchanged.
    pub fn with_hbl_replaced(mut self, hbl: HblDestuffStatus) -> Self {
        if let Some(slot) = self.hbls.iter_mut().find(|h| h.hbl_id == hbl.hbl_id) {
            *slot = hbl;
        }
        self
    }

    // ===== QUERIES =====

    pub fn hbl(&self, hbl_id: &str) -> Option<&HblDestuffStatus> {
        self.hbls.iter().find(|h| h.hbl_id == hbl_id)
    }

    /// Every packing list tied to this container, direct ones first, without duplicates
    pub fn all_packing_list_ids(&self) -> Vec<String> {
        let linked = self.hbls.iter().filter_map(|h| h.packing_list_id.clone());
        let mut ids: Vec<String> = Vec::new();
        for id in self.packing_list_ids.iter().cloned().chain(linked) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// A container record as received from the store, before defaults are resolved
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: Option<String>,
    pub plan_id: Option<String>,
    pub order_container_id: Option<String>,
    pub container_number: Option<String>,
    /// Explicit working status
    pub working_status: Option<String>,
    /// Legacy raw status code, consulted only when no working status is present
    pub status: Option<String>,
    pub bypass_storage_flag: Option<bool>,
    pub cargo_loaded_status: Option<CargoLoadedStatus>,
    pub packing_list_ids: Option<Vec<String>>,
    pub hbls: Option<Vec<HblDestuffStatus>>,
}

impl PlanContainer {
    /// Resolve an incoming record against the container it updates (if any).
    ///
    /// Absent fields keep the existing value; an unrecognized status code keeps the
    /// existing working status and only falls back to `waiting` for a new container.
    pub fn from_record(record: ContainerRecord, existing: Option<&PlanContainer>) -> Result<Self> {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CfsError::MissingField("container.id".to_string()))?;

        let existing = existing.filter(|current| current.id == id);
        let mut container = match existing {
            Some(current) => current.clone(),
            None => PlanContainer::new(id, ""),
        };

        if let Some(plan_id) = record.plan_id {
            container.plan_id = plan_id;
        }
        if record.order_container_id.is_some() {
            container.order_container_id = record.order_container_id;
        }
        if record.container_number.is_some() {
            container.container_number = record.container_number;
        }

        let previous = existing.map(|c| c.working_status);
        container.working_status = resolve_working_status(
            record.working_status.as_deref(),
            record.status.as_deref(),
            previous,
        )
        .unwrap_or(WorkingStatus::Waiting);
        if let Some(from) = previous {
            let to = container.working_status;
            if to != from && !allowed_container_targets(from).contains(&to) {
                return Err(CfsError::illegal(format!("container {}", container.id), from, to));
            }
        }

        if let Some(flag) = record.bypass_storage_flag {
            container.bypass_storage_flag = flag;
        }
        if record.cargo_loaded_status.is_some() {
            container.cargo_loaded_status = record.cargo_loaded_status;
        }
        if let Some(ids) = record.packing_list_ids {
            container.packing_list_ids = ids;
        }
        if let Some(hbls) = record.hbls {
            if let Some(violation) = hbls.iter().find_map(HblDestuffStatus::consistency_error) {
                return Err(CfsError::PreconditionFailed(violation));
            }
            container.hbls = hbls;
        }

        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ContainerRecord {
        ContainerRecord {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_record_requires_id() {
        let err = PlanContainer::from_record(ContainerRecord::default(), None).unwrap_err();
        assert!(matches!(err, CfsError::MissingField(_)));

        let blank = ContainerRecord {
            id: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(PlanContainer::from_record(blank, None).is_err());
    }

    #[test]
    fn test_from_record_defaults_for_new_container() {
        let container = PlanContainer::from_record(record("c-1"), None).unwrap();
        assert_eq!(container.working_status, WorkingStatus::Waiting);
        assert!(!container.bypass_storage_flag);
        assert!(container.hbls.is_empty());
    }

    #[test]
    fn test_from_record_explicit_status_wins_over_legacy() {
        let rec = ContainerRecord {
            working_status: Some("on-hold".to_string()),
            status: Some("DONE".to_string()),
            ..record("c-1")
        };
        let container = PlanContainer::from_record(rec, None).unwrap();
        assert_eq!(container.working_status, WorkingStatus::OnHold);
    }

    #[test]
    fn test_from_record_legacy_status_fallback() {
        let rec = ContainerRecord {
            status: Some("IN_PROGRESS".to_string()),
            ..record("c-1")
        };
        let container = PlanContainer::from_record(rec, None).unwrap();
        assert_eq!(container.working_status, WorkingStatus::InProgress);
    }

    #[test]
    fn test_from_record_unknown_status_preserves_existing() {
        let existing = PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::InProgress);
        let rec = ContainerRecord {
            status: Some("SEALED".to_string()),
            ..record("c-1")
        };
        let container = PlanContainer::from_record(rec, Some(&existing)).unwrap();
        assert_eq!(container.working_status, WorkingStatus::InProgress);
        assert_eq!(container.plan_id, "plan-1");
    }

    #[test]
    fn test_from_record_keeps_existing_bypass_flag_when_absent() {
        let mut existing = PlanContainer::new("c-1", "plan-1");
        existing.bypass_storage_flag = true;
        let container = PlanContainer::from_record(record("c-1"), Some(&existing)).unwrap();
        assert!(container.bypass_storage_flag);
    }

    #[test]
    fn test_from_record_never_leaves_done() {
        let existing = PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::Done);
        let rec = ContainerRecord {
            working_status: Some("waiting".to_string()),
            ..record("c-1")
        };
        let err = PlanContainer::from_record(rec, Some(&existing)).unwrap_err();
        assert!(matches!(err, CfsError::IllegalTransition { ref from, ref to, .. } if from == "done" && to == "waiting"));

        let same = ContainerRecord {
            status: Some("DONE".to_string()),
            ..record("c-1")
        };
        let container = PlanContainer::from_record(same, Some(&existing)).unwrap();
        assert_eq!(container.working_status, WorkingStatus::Done);
    }

    #[test]
    fn test_from_record_status_must_follow_state_machine() {
        let existing = PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::Waiting);
        let skip = ContainerRecord {
            working_status: Some("done".to_string()),
            ..record("c-1")
        };
        assert!(PlanContainer::from_record(skip, Some(&existing)).is_err());

        let step = ContainerRecord {
            working_status: Some("in-progress".to_string()),
            ..record("c-1")
        };
        let container = PlanContainer::from_record(step, Some(&existing)).unwrap();
        assert_eq!(container.working_status, WorkingStatus::InProgress);
    }

    #[test]
    fn test_from_record_rejects_inconsistent_hbls() {
        let rec = ContainerRecord {
            hbls: Some(vec![
                HblDestuffStatus::new("hbl-1"),
                HblDestuffStatus::new("hbl-2").with_destuff_status(WorkingStatus::Done),
            ]),
            ..record("c-1")
        };
        let err = PlanContainer::from_record(rec, None).unwrap_err();
        assert!(matches!(err, CfsError::PreconditionFailed(ref msg) if msg.contains("hbl-2")));

        let ok = ContainerRecord {
            hbls: Some(vec![HblDestuffStatus::new("hbl-1")]),
            ..record("c-1")
        };
        assert_eq!(PlanContainer::from_record(ok, None).unwrap().hbls.len(), 1);
    }

    #[test]
    fn test_all_packing_list_ids_deduplicates() {
        let container = PlanContainer::new("c-1", "plan-1")
            .with_packing_list("pl-1")
            .with_hbl(HblDestuffStatus::new("hbl-1").with_packing_list("pl-2"))
            .with_hbl(HblDestuffStatus::new("hbl-2").with_packing_list("pl-1"))
            .with_hbl(HblDestuffStatus::new("hbl-3"));
        assert_eq!(container.all_packing_list_ids(), vec!["pl-1", "pl-2"]);
    }

    #[test]
    fn test_cargo_loaded_status_parsing() {
        assert_eq!("EMPTY".parse::<CargoLoadedStatus>(), Ok(CargoLoadedStatus::Empty));
        assert_eq!(serde_json::to_string(&CargoLoadedStatus::Partial).unwrap(), "\"partial\"");
        assert!("half".parse::<CargoLoadedStatus>().is_err());
    }
}
