//! JSON file operations with schema validation
//!
//! Provides functions to read and write JSON files with serde validation.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CfsError, Result};
use crate::schemas::Config;

use super::paths::get_config_path;

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the expected schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CfsError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            CfsError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CfsError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content =
        serde_json::to_string_pretty(data).map_err(|e| CfsError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read every `*.json` file in a directory, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn read_json_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    paths.iter().map(|p| read_json(p)).collect()
}

/// Read the config.json file, or defaults if it doesn't exist.
pub fn read_config(root: &Path) -> Result<Config> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}
