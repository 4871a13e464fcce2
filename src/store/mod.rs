//! Store boundary
//!
//! The workflow engine reaches persistence only through these request/response
//! traits. Implementations are expected to repeat the system-wide checks (single
//! active plan, single open transaction per packing list and flow, no reopening of
//! finished entities) and reject conflicting writes: the engine's own predicates are
//! an optimistic pre-check.

mod json_store;

use async_trait::async_trait;

use crate::errors::Result;
use crate::schemas::{
    BusinessFlow, ImportJob, PackageTransaction, Plan, PlanStatus, TransactionFilter,
};

pub use json_store::JsonStore;

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// List plans, optionally restricted to one status
    async fn list_plans(&self, status: Option<PlanStatus>) -> Result<Vec<Plan>>;

    async fn get_plan(&self, plan_id: &str) -> Result<Plan>;

    /// Number of IN_PROGRESS plans, not counting `excluding`
    async fn count_active_plans(&self, excluding: Option<&str>) -> Result<usize>;

    /// Persist a plan and return the stored version
    async fn save_plan(&self, plan: &Plan) -> Result<Plan>;

    async fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<PackageTransaction>>;

    async fn get_transaction(&self, transaction_id: &str) -> Result<PackageTransaction>;

    /// Persist a transaction and return the stored version
    async fn save_transaction(&self, txn: &PackageTransaction) -> Result<PackageTransaction>;

    /// Business flow configuration by flow name
    async fn get_business_flow(&self, name: &str) -> Result<BusinessFlow>;
}

/// Source of long-running import status, polled by the import watcher
#[async_trait]
pub trait ImportStatusSource: Send + Sync {
    async fn import_status(&self, job_id: &str) -> Result<ImportJob>;
}
