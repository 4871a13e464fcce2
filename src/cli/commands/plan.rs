//! Plan commands - resume, suspend and finish

use std::path::Path;

use super::{print_json, Session};
use crate::errors::Result;
use crate::schemas::Plan;

fn report(plan: &Plan, json: bool) -> Result<()> {
    if json {
        return print_json(plan);
    }
    println!("Plan {} is now {}", plan.code, plan.status);
    Ok(())
}

pub async fn resume(cwd: Option<&Path>, plan_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let plan = session.service.resume_plan(plan_id).await?;
    report(&plan, json)
}

pub async fn suspend(cwd: Option<&Path>, plan_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let plan = session.service.suspend_plan(plan_id).await?;
    report(&plan, json)
}

pub async fn finish(cwd: Option<&Path>, plan_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let plan = session.service.complete_plan(plan_id).await?;
    report(&plan, json)
}
