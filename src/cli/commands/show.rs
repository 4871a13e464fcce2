//! Show command - Display a plan with its containers and HBLs

use std::path::Path;

use super::{print_json, Session};
use crate::domain::{can_resume, is_container_destuff_complete};
use crate::errors::Result;
use crate::schemas::{Plan, PlanStatus};
use crate::store::WorkflowStore;

pub async fn run(cwd: Option<&Path>, plan_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let plan = session.store().get_plan(plan_id).await?;

    if json {
        return print_json(&plan);
    }

    let resume_hint = if plan.status == PlanStatus::Pending {
        let others = session.store().count_active_plans(Some(&plan.id)).await?;
        Some(can_resume(&plan, others > 0))
    } else {
        None
    };

    print_plan(&plan);
    if let Some(decision) = resume_hint {
        match decision.reason {
            None => println!("Ready to resume"),
            Some(reason) => println!("Cannot resume: {}", reason),
        }
    }
    Ok(())
}

fn print_plan(plan: &Plan) {
    println!("Plan {} ({})", plan.code, plan.id);
    println!("  Type:      {}", plan.plan_type);
    println!("  Status:    {}", plan.status);
    println!(
        "  Equipment: {}  Port notified: {}",
        if plan.equipment_booked { "booked" } else { "not booked" },
        if plan.port_notified { "yes" } else { "no" }
    );
    if let Some(start) = plan.execution_start_at {
        println!("  Started:   {}", start.to_rfc3339());
    }
    if let Some(end) = plan.execution_end_at {
        println!("  Finished:  {}", end.to_rfc3339());
    }

    for container in &plan.containers {
        println!();
        println!(
            "  Container {} [{}]",
            container.container_number.as_deref().unwrap_or(&container.id),
            container.working_status
        );
        if let Some(seal) = &container.new_seal_number {
            println!("    Seal: {}", seal);
        }
        if let Some(cargo) = container.cargo_loaded_status {
            println!("    Cargo loaded: {}", cargo);
        }
        if !container.hbls.is_empty() {
            println!(
                "    HBLs ({}):",
                if is_container_destuff_complete(&container.hbls) {
                    "settled"
                } else {
                    "pending"
                }
            );
            for hbl in &container.hbls {
                println!(
                    "      {} {}",
                    hbl.hbl_code.as_deref().unwrap_or(&hbl.hbl_id),
                    hbl.destuff_status
                );
            }
        }
    }
}
