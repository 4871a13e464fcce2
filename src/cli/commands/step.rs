//! Step command - Resolve the active business-flow step for a position status

use std::path::Path;

use super::{print_json, Session};
use crate::errors::Result;

pub async fn run(cwd: Option<&Path>, position_status: &str, flow: Option<&str>, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let flow = session.flow_name(flow)?;
    let cursor = session.service.resolve_flow_step(&flow, position_status).await?;

    if json {
        return print_json(&serde_json::json!({
            "flow": flow,
            "index": cursor.active_index(),
            "step": cursor.active(),
            "next": cursor.next_step(),
        }));
    }

    for (i, step) in cursor.steps().iter().enumerate() {
        let marker = if i == cursor.active_index() { ">" } else { " " };
        println!(
            "{} {}. {} ({} -> {})",
            marker,
            i + 1,
            step.code,
            step.from_status.as_deref().unwrap_or("?"),
            step.to_status.as_deref().unwrap_or("?")
        );
    }
    if cursor.is_last() {
        println!("Active step is the last step of {}", flow);
    }
    Ok(())
}
