//! JSON-file store under `.cfs`
//!
//! One file per plan, transaction, flow and import job. Writes are serialized through
//! a single lock so the authoritative checks and the write happen together.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::{CfsError, Result};
use crate::fs::{
    ensure_safe_id, get_flow_path, get_import_path, get_plan_path, get_plans_dir,
    get_transaction_path, get_transactions_dir, read_json, read_json_dir, write_json,
};
use crate::schemas::{
    BusinessFlow, ImportJob, PackageTransaction, Plan, PlanStatus, TransactionFilter,
    TransactionStatus, WorkingStatus,
};

use super::{ImportStatusSource, WorkflowStore};

pub struct JsonStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open a store rooted at the directory that contains `.cfs`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonStore {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn not_found(err: CfsError, what: String) -> CfsError {
        match err {
            CfsError::FileNotFound(_) => CfsError::NotFound(what),
            other => other,
        }
    }

    fn load_plans(&self) -> Result<Vec<Plan>> {
        read_json_dir(&get_plans_dir(&self.root))
    }

    fn load_transactions(&self) -> Result<Vec<PackageTransaction>> {
        read_json_dir(&get_transactions_dir(&self.root))
    }

    fn stored_plan(&self, plan_id: &str) -> Result<Option<Plan>> {
        let path = get_plan_path(&self.root, plan_id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn stored_transaction(&self, id: &str) -> Result<Option<PackageTransaction>> {
        let path = get_transaction_path(&self.root, id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Seed or replace a flow definition
    pub fn put_business_flow(&self, flow: &BusinessFlow) -> Result<()> {
        ensure_safe_id("flow", &flow.name)?;
        write_json(&get_flow_path(&self.root, &flow.name), flow)
    }

    /// Seed or replace an import job record
    pub fn put_import_job(&self, job: &ImportJob) -> Result<()> {
        ensure_safe_id("import", &job.id)?;
        write_json(&get_import_path(&self.root, &job.id), job)
    }
}

#[async_trait]
impl WorkflowStore for JsonStore {
    async fn list_plans(&self, status: Option<PlanStatus>) -> Result<Vec<Plan>> {
        let plans = self.load_plans()?;
        Ok(plans
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect())
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        ensure_safe_id("plan", plan_id)?;
        read_json(&get_plan_path(&self.root, plan_id))
            .map_err(|e| Self::not_found(e, format!("plan {}", plan_id)))
    }

    async fn count_active_plans(&self, excluding: Option<&str>) -> Result<usize> {
        let plans = self.load_plans()?;
        Ok(plans
            .iter()
            .filter(|p| p.is_active() && Some(p.id.as_str()) != excluding)
            .count())
    }

    async fn save_plan(&self, plan: &Plan) -> Result<Plan> {
        ensure_safe_id("plan", &plan.id)?;
        let _guard = self.write_lock.lock().await;

        if let Some(stored) = self.stored_plan(&plan.id)? {
            if stored.status == PlanStatus::Done && plan.status != PlanStatus::Done {
                return Err(CfsError::Store(format!(
                    "plan {} is DONE and cannot be reopened",
                    stored.code
                )));
            }
            for kept in &stored.containers {
                match plan.container(&kept.id) {
                    None => {
                        return Err(CfsError::Store(format!(
                            "container {} cannot be dropped from plan {}",
                            kept.id, stored.code
                        )))
                    }
                    Some(next) if kept.working_status == WorkingStatus::Done && next.working_status != WorkingStatus::Done => {
                        return Err(CfsError::Store(format!(
                            "container {} is done and cannot become {}",
                            kept.id, next.working_status
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        if plan.is_active() {
            let conflicting = self
                .load_plans()?
                .into_iter()
                .find(|p| p.is_active() && p.id != plan.id);
            if let Some(other) = conflicting {
                return Err(CfsError::Store(format!(
                    "plan {} is already IN_PROGRESS",
                    other.code
                )));
            }
        }

        write_json(&get_plan_path(&self.root, &plan.id), plan)?;
        tracing::debug!(plan = %plan.id, status = %plan.status, "plan saved");
        Ok(plan.clone())
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<PackageTransaction>> {
        let txns = self.load_transactions()?;
        Ok(txns.into_iter().filter(|t| filter.matches(t)).collect())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<PackageTransaction> {
        ensure_safe_id("transaction", transaction_id)?;
        read_json(&get_transaction_path(&self.root, transaction_id))
            .map_err(|e| Self::not_found(e, format!("transaction {}", transaction_id)))
    }

    async fn save_transaction(&self, txn: &PackageTransaction) -> Result<PackageTransaction> {
        ensure_safe_id("transaction", &txn.id)?;
        let _guard = self.write_lock.lock().await;

        if let Some(stored) = self.stored_transaction(&txn.id)? {
            if stored.status == TransactionStatus::Done && txn.status != TransactionStatus::Done {
                return Err(CfsError::Store(format!(
                    "transaction {} is DONE and cannot be reopened",
                    stored.code
                )));
            }
        }

        if txn.is_open() {
            if let Some(packing_list_id) = &txn.packing_list_id {
                let conflicting = self.load_transactions()?.into_iter().find(|t| {
                    t.id != txn.id
                        && t.is_open()
                        && t.packing_list_id.as_ref() == Some(packing_list_id)
                        && t.business_process_flow == txn.business_process_flow
                });
                if let Some(other) = conflicting {
                    return Err(CfsError::Store(format!(
                        "packing list {} already has transaction {} in progress",
                        packing_list_id, other.code
                    )));
                }
            }
        }

        write_json(&get_transaction_path(&self.root, &txn.id), txn)?;
        tracing::debug!(transaction = %txn.id, status = %txn.status, "transaction saved");
        Ok(txn.clone())
    }

    async fn get_business_flow(&self, name: &str) -> Result<BusinessFlow> {
        ensure_safe_id("flow", name)?;
        read_json(&get_flow_path(&self.root, name))
            .map_err(|e| Self::not_found(e, format!("business flow {}", name)))
    }
}

#[async_trait]
impl ImportStatusSource for JsonStore {
    async fn import_status(&self, job_id: &str) -> Result<ImportJob> {
        ensure_safe_id("import", job_id)?;
        read_json(&get_import_path(&self.root, job_id))
            .map_err(|e| Self::not_found(e, format!("import {}", job_id)))
    }
}
