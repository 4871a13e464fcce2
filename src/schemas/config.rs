//! Config schema - Configuration for the cfs operator tool

use serde::{Deserialize, Serialize};

/// Main configuration, read from `.cfs/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name stamped on unseal/reseal/complete actions
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Interval between import status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up watching an import after this many polls
    #[serde(default = "default_poll_max_ticks")]
    pub poll_max_ticks: u32,

    /// Flow used by `step` when none is given
    #[serde(default)]
    pub default_flow: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_actor() -> String {
    "operator".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_poll_max_ticks() -> u32 {
    900
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            actor: default_actor(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_max_ticks: default_poll_max_ticks(),
            default_flow: None,
        }
    }
}
