//! Schema types for plans, containers, HBLs, package transactions and flow configuration
//!
//! Field names serialize in camelCase to match the store's JSON shapes.

mod config;
mod container;
mod flow;
mod hbl;
mod import;
mod plan;
mod status;
mod transaction;

pub use config::Config;
pub use container::{CargoLoadedStatus, ContainerRecord, PlanContainer};
pub use flow::{BusinessFlow, BusinessFlowStep, FlowDirection};
pub use hbl::{DestuffClassification, DestuffResult, HblDestuffStatus};
pub use import::{ImportJob, ImportStatus};
pub use plan::{Plan, PlanType};
pub use status::{PlanStatus, TransactionStatus, WorkingStatus};
pub use transaction::{PackageItem, PackageTransaction, TransactionFilter};
