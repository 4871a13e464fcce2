//! File system utilities for the local store
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{read_config, read_json, read_json_dir, write_json};
pub use paths::{
    ensure_safe_id, find_store_root, get_cfs_dir, get_config_path, get_flow_path, get_flows_dir,
    get_import_path, get_imports_dir, get_plan_path, get_plans_dir, get_transaction_path,
    get_transactions_dir, resolve_cwd,
};
