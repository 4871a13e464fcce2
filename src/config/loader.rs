//! Configuration loading with defaults

use std::path::Path;

use crate::errors::{CfsError, Result};
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the store root, falling back to defaults.
///
/// Fields missing from `.cfs/config.json` take their default values. A zero poll
/// interval or tick budget is rejected.
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    if config.poll_interval_ms == 0 {
        return Err(CfsError::ConfigError(
            "poll_interval_ms must be greater than zero".to_string(),
        ));
    }
    if config.poll_max_ticks == 0 {
        return Err(CfsError::ConfigError(
            "poll_max_ticks must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}
