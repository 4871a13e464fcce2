//! CLI command implementations

pub mod container;
pub mod destuff;
pub mod init;
pub mod list;
pub mod load;
pub mod plan;
pub mod seal;
pub mod show;
pub mod step;
pub mod transaction;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::load_config;
use crate::errors::{CfsError, Result};
use crate::fs::{find_store_root, resolve_cwd};
use crate::schemas::Config;
use crate::store::JsonStore;
use crate::workflow::WorkflowService;

/// An opened store with its configuration and workflow service
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub service: WorkflowService<JsonStore>,
}

impl Session {
    pub fn open(cwd: Option<&Path>) -> Result<Self> {
        let root = find_store_root(&resolve_cwd(cwd))?;
        let config = load_config(&root)?;
        let store = Arc::new(JsonStore::new(&root));
        let service = WorkflowService::new(store, config.actor.clone());
        Ok(Session {
            root,
            config,
            service,
        })
    }

    pub fn store(&self) -> &Arc<JsonStore> {
        self.service.store()
    }

    /// Explicit flow name, else the configured default
    pub fn flow_name(&self, flow: Option<&str>) -> Result<String> {
        flow.map(str::to_string)
            .or_else(|| self.config.default_flow.clone())
            .ok_or_else(|| CfsError::MissingField("flow (no default_flow configured)".to_string()))
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CfsError::InvalidJson(e.to_string()))?;
    println!("{}", out);
    Ok(())
}

/// Parse an optional RFC 3339 timestamp argument
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CfsError::wrap(e, format!("invalid timestamp {:?}", s)))
    })
    .transpose()
}
