//! Plans command - List plans with optional status filtering

use std::path::Path;

use serde::Serialize;

use super::{print_json, Session};
use crate::domain::PLAN_STATES;
use crate::errors::{CfsError, Result};
use crate::schemas::{Plan, PlanStatus, WorkingStatus};
use crate::store::WorkflowStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    pub code: String,
    pub plan_type: String,
    pub status: PlanStatus,
    pub containers: usize,
    pub containers_done: usize,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        PlanSummary {
            id: plan.id.clone(),
            code: plan.code.clone(),
            plan_type: plan.plan_type.to_string(),
            status: plan.status,
            containers: plan.containers.len(),
            containers_done: plan
                .containers
                .iter()
                .filter(|c| c.working_status == WorkingStatus::Done)
                .count(),
        }
    }
}

fn parse_status_filter(raw: &str) -> Result<PlanStatus> {
    raw.parse::<PlanStatus>().map_err(|e| {
        let known: Vec<String> = PLAN_STATES.iter().map(ToString::to_string).collect();
        CfsError::PreconditionFailed(format!("{} (expected one of {})", e, known.join(", ")))
    })
}

pub async fn run(cwd: Option<&Path>, status: Option<&str>, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let filter = status.map(parse_status_filter).transpose()?;

    let plans = session.store().list_plans(filter).await?;
    let summaries: Vec<PlanSummary> = plans.iter().map(PlanSummary::from).collect();

    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No plans found");
        return Ok(());
    }
    for s in &summaries {
        println!(
            "{:<16} {:<12} {:<12} {}/{} containers done",
            s.code, s.plan_type, s.status, s.containers_done, s.containers
        );
    }
    Ok(())
}
