//! Container commands - unseal, reseal and complete

use std::path::Path;

use super::{parse_timestamp, print_json, Session};
use crate::errors::{CfsError, Result};
use crate::schemas::{CargoLoadedStatus, PlanContainer};

fn report(container: &PlanContainer, json: bool) -> Result<()> {
    if json {
        return print_json(container);
    }
    println!(
        "Container {} is now {}",
        container.container_number.as_deref().unwrap_or(&container.id),
        container.working_status
    );
    Ok(())
}

pub async fn unseal(
    cwd: Option<&Path>,
    plan_id: &str,
    container_id: &str,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let unsealed_at = parse_timestamp(at)?;
    let session = Session::open(cwd)?;
    let container = session
        .service
        .unseal_container(plan_id, container_id, unsealed_at)
        .await?;
    report(&container, json)
}

pub async fn reseal(
    cwd: Option<&Path>,
    plan_id: &str,
    container_id: &str,
    seal: &str,
    on_hold: bool,
    note: Option<String>,
    json: bool,
) -> Result<()> {
    let session = Session::open(cwd)?;
    let container = session
        .service
        .reseal_container(plan_id, container_id, seal, on_hold, note)
        .await?;
    report(&container, json)
}

pub async fn complete(
    cwd: Option<&Path>,
    plan_id: &str,
    container_id: &str,
    cargo_loaded: Option<&str>,
    notes: Option<String>,
    at: Option<&str>,
    json: bool,
) -> Result<()> {
    let cargo_loaded = cargo_loaded
        .map(|s| s.parse::<CargoLoadedStatus>().map_err(CfsError::PreconditionFailed))
        .transpose()?;
    let occurred_at = parse_timestamp(at)?;

    let session = Session::open(cwd)?;
    let container = session
        .service
        .complete_container(plan_id, container_id, occurred_at, notes, cargo_loaded)
        .await?;
    report(&container, json)
}
