//! Transaction commands - open and close package transactions

use std::path::Path;

use super::{print_json, Session};
use crate::errors::Result;
use crate::schemas::PackageTransaction;

fn report(txn: &PackageTransaction, json: bool) -> Result<()> {
    if json {
        return print_json(txn);
    }
    println!(
        "Transaction {} ({}) is {}",
        txn.code, txn.business_process_flow, txn.status
    );
    Ok(())
}

pub async fn open(
    cwd: Option<&Path>,
    id: &str,
    code: &str,
    packing_list: &str,
    flow: Option<&str>,
    party_name: Option<String>,
    json: bool,
) -> Result<()> {
    let session = Session::open(cwd)?;
    let flow = session.flow_name(flow)?;

    let mut txn = PackageTransaction::new(id, code, flow).with_packing_list(packing_list);
    txn.party_name = party_name;

    let saved = session.service.open_transaction(txn).await?;
    report(&saved, json)
}

pub async fn close(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let txn = session.service.close_transaction(id).await?;
    report(&txn, json)
}
