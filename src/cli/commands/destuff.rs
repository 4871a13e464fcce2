//! Destuff command - Record the destuff result of one HBL

use std::path::Path;

use super::{print_json, Session};
use crate::domain::DestuffResultRequest;
use crate::errors::Result;

pub async fn run(
    cwd: Option<&Path>,
    plan_id: &str,
    container_id: &str,
    hbl_id: &str,
    request: DestuffResultRequest,
    json: bool,
) -> Result<()> {
    let session = Session::open(cwd)?;
    let hbl = session
        .service
        .record_destuff_result(plan_id, container_id, hbl_id, &request)
        .await?;

    if json {
        return print_json(&hbl);
    }
    let classification = hbl
        .destuff_result
        .as_ref()
        .map(|r| r.classification.to_string())
        .unwrap_or_default();
    println!(
        "HBL {} is now {} ({})",
        hbl.hbl_code.as_deref().unwrap_or(&hbl.hbl_id),
        hbl.destuff_status,
        classification
    );
    Ok(())
}
