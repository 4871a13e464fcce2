//! cfs-workflow - Workflow and eligibility engine for container freight station operations
//!
//! This library provides:
//! - Schema definitions for plans, containers, HBLs, package transactions and flows
//! - Pure domain logic for statuses, transitions and eligibility gates
//! - An async store boundary with a local JSON-file implementation
//! - A workflow service that re-fetches, validates and writes through the store
//! - Attempt tracking and import status polling

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;
pub mod store;
pub mod watch;
pub mod workflow;

// Re-export commonly used types
pub use errors::{CfsError, Result};
pub use schemas::{Config, PackageTransaction, Plan, PlanContainer, PlanStatus, WorkingStatus};
pub use store::{JsonStore, WorkflowStore};
pub use workflow::WorkflowService;
