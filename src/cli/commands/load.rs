//! Load command - Bring a plan document into the store
//!
//! Container entries are raw store records; their working status codes and optional
//! fields are resolved through `PlanContainer::from_record`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{print_json, Session};
use crate::errors::{CfsError, Result};
use crate::fs::read_json;
use crate::schemas::{ContainerRecord, Plan, PlanContainer, PlanStatus, PlanType};
use crate::store::WorkflowStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    pub id: String,
    pub code: String,
    pub plan_type: PlanType,
    #[serde(default)]
    pub planned_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub equipment_booked: Option<bool>,
    #[serde(default)]
    pub port_notified: Option<bool>,
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
}

/// Merge a document into the stored plan, or build a new pending plan.
///
/// Status and execution stamps of an existing plan are kept. Containers are matched by
/// id: named ones are updated in place, new ones appended, unmentioned ones kept.
pub fn merge_document(doc: PlanDocument, existing: Option<Plan>) -> Result<Plan> {
    let mut plan = match existing {
        Some(plan) => {
            if plan.plan_type != doc.plan_type {
                return Err(CfsError::PreconditionFailed(format!(
                    "plan {} is {}, document says {}",
                    plan.code, plan.plan_type, doc.plan_type
                )));
            }
            plan
        }
        None => Plan::new(doc.id.clone(), doc.code.clone(), doc.plan_type),
    };

    plan.code = doc.code;
    if doc.planned_start.is_some() {
        plan.planned_start = doc.planned_start;
    }
    if doc.planned_end.is_some() {
        plan.planned_end = doc.planned_end;
    }
    if let Some(booked) = doc.equipment_booked {
        plan.equipment_booked = booked;
    }
    if let Some(notified) = doc.port_notified {
        plan.port_notified = notified;
    }

    for record in doc.containers {
        let index = record
            .id
            .as_deref()
            .and_then(|id| plan.containers.iter().position(|c| c.id == id));
        let mut container = PlanContainer::from_record(record, index.map(|i| &plan.containers[i]))?;
        container.plan_id = plan.id.clone();
        match index {
            Some(i) => plan.containers[i] = container,
            None if plan.status == PlanStatus::Done => {
                return Err(CfsError::PreconditionFailed(format!(
                    "plan {} is DONE; container {} cannot be added",
                    plan.code, container.id
                )))
            }
            None => plan.containers.push(container),
        }
    }

    Ok(plan)
}

pub async fn run(cwd: Option<&Path>, file: &Path, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let doc: PlanDocument = read_json(file)?;

    let existing = match session.store().get_plan(&doc.id).await {
        Ok(plan) => Some(plan),
        Err(CfsError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };
    let is_new = existing.is_none();

    let plan = merge_document(doc, existing)?;
    let saved = session.store().save_plan(&plan).await?;
    tracing::info!(
        plan = %saved.code,
        containers = saved.containers.len(),
        new = is_new,
        "plan loaded"
    );

    if json {
        print_json(&saved)?;
    } else {
        println!(
            "{} plan {} ({}, {} containers)",
            if is_new { "Created" } else { "Updated" },
            saved.code,
            saved.status,
            saved.containers.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::WorkingStatus;

    fn document(json: &str) -> PlanDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_new_plan_from_document() {
        let doc = document(
            r#"{
                "id": "plan-1",
                "code": "P-0001",
                "planType": "DESTUFFING",
                "equipmentBooked": true,
                "containers": [
                    { "id": "c-1", "status": "IN_PROGRESS", "packingListIds": ["pl-1"] },
                    { "id": "c-2", "workingStatus": "on hold" }
                ]
            }"#,
        );
        let plan = merge_document(doc, None).unwrap();

        assert_eq!(plan.status, PlanStatus::Pending);
        assert!(plan.equipment_booked);
        assert!(!plan.port_notified);
        assert_eq!(plan.containers[0].working_status, WorkingStatus::InProgress);
        assert_eq!(plan.containers[0].plan_id, "plan-1");
        assert_eq!(plan.containers[1].working_status, WorkingStatus::OnHold);
    }

    #[test]
    fn test_update_keeps_status_and_unknown_codes() {
        let existing = Plan::new("plan-1", "P-0001", PlanType::Destuffing)
            .with_status(PlanStatus::InProgress)
            .with_container(PlanContainer::new("c-1", "").with_working_status(WorkingStatus::Done));

        let doc = document(
            r#"{
                "id": "plan-1",
                "code": "P-0001",
                "planType": "DESTUFFING",
                "containers": [ { "id": "c-1", "status": "GATE_OUT" } ]
            }"#,
        );
        let plan = merge_document(doc, Some(existing)).unwrap();
        assert_eq!(plan.status, PlanStatus::InProgress);
        assert_eq!(plan.containers[0].working_status, WorkingStatus::Done);
    }

    #[test]
    fn test_done_container_cannot_be_reopened() {
        let existing = Plan::new("plan-1", "P-0001", PlanType::Destuffing)
            .with_status(PlanStatus::Done)
            .with_container(PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::Done));

        let doc = document(
            r#"{
                "id": "plan-1",
                "code": "P-0001",
                "planType": "DESTUFFING",
                "containers": [ { "id": "c-1", "workingStatus": "waiting" } ]
            }"#,
        );
        assert!(matches!(
            merge_document(doc, Some(existing)),
            Err(CfsError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn test_done_plan_accepts_no_new_containers() {
        let existing = Plan::new("plan-1", "P-0001", PlanType::Destuffing)
            .with_status(PlanStatus::Done)
            .with_container(PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::Done));

        let doc = document(
            r#"{ "id": "plan-1", "code": "P-0001", "planType": "DESTUFFING", "containers": [ { "id": "c-9" } ] }"#,
        );
        assert!(matches!(
            merge_document(doc, Some(existing)),
            Err(CfsError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn test_unmentioned_containers_are_kept() {
        let existing = Plan::new("plan-1", "P-0001", PlanType::Destuffing)
            .with_container(PlanContainer::new("c-1", "plan-1").with_working_status(WorkingStatus::InProgress))
            .with_container(PlanContainer::new("c-2", "plan-1"));

        let doc = document(
            r#"{
                "id": "plan-1",
                "code": "P-0001",
                "planType": "DESTUFFING",
                "containers": [
                    { "id": "c-2", "containerNumber": "MSCU1234567" },
                    { "id": "c-3" }
                ]
            }"#,
        );
        let plan = merge_document(doc, Some(existing)).unwrap();

        let ids: Vec<&str> = plan.containers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c-1", "c-2", "c-3"]);
        assert_eq!(plan.containers[0].working_status, WorkingStatus::InProgress);
        assert_eq!(plan.containers[1].container_number.as_deref(), Some("MSCU1234567"));
        assert_eq!(plan.containers[2].plan_id, "plan-1");
    }

    #[test]
    fn test_settled_hbl_without_result_rejected() {
        let doc = document(
            r#"{
                "id": "plan-1",
                "code": "P-0001",
                "planType": "DESTUFFING",
                "containers": [
                    { "id": "c-1", "hbls": [ { "hblId": "hbl-1", "destuffStatus": "done" } ] }
                ]
            }"#,
        );
        assert!(matches!(merge_document(doc, None), Err(CfsError::PreconditionFailed(_))));
    }

    #[test]
    fn test_plan_type_mismatch_rejected() {
        let existing = Plan::new("plan-1", "P-0001", PlanType::Stuffing);
        let doc = document(r#"{ "id": "plan-1", "code": "P-0001", "planType": "RECEIVING" }"#);
        assert!(matches!(
            merge_document(doc, Some(existing)),
            Err(CfsError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn test_container_without_id_rejected() {
        let doc = document(
            r#"{ "id": "plan-1", "code": "P-0001", "planType": "STUFFING", "containers": [ {} ] }"#,
        );
        assert!(matches!(merge_document(doc, None), Err(CfsError::MissingField(_))));
    }
}
