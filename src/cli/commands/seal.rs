//! Seal-check command - Report whether a container may be sealed

use std::path::Path;

use super::{print_json, Session};
use crate::errors::Result;

pub async fn run(cwd: Option<&Path>, plan_id: &str, container_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let check = session.service.check_seal(plan_id, container_id).await?;

    if json {
        return print_json(&serde_json::json!({
            "containerId": container_id,
            "eligible": check.eligible,
            "reason": check.reason,
        }));
    }
    match check.reason {
        None => println!("Container {} may be sealed", container_id),
        Some(reason) => println!("Container {} may not be sealed: {}", container_id, reason),
    }
    Ok(())
}
