//! Path resolution utilities for the local store
//!
//! Provides functions to locate the store root and construct paths
//! to plan, transaction, flow and import files inside `.cfs`.

use std::path::{Path, PathBuf};

use crate::errors::{CfsError, Result};

/// Find the directory containing a `.cfs` data directory.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `StoreNotFound` - If no ancestor contains `.cfs`
pub fn find_store_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| CfsError::StoreNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if get_cfs_dir(&current).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(CfsError::StoreNotFound(
                    "Could not find a .cfs directory; run `cfs init` first".to_string(),
                ));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Reject identifiers that cannot be used as a file stem.
pub fn ensure_safe_id(kind: &str, id: &str) -> Result<()> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CfsError::MissingField(format!("{}.id", kind)));
    }
    if trimmed != id || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(CfsError::Store(format!("Invalid {} id: {:?}", kind, id)));
    }
    Ok(())
}

/// Get the path to the .cfs directory.
pub fn get_cfs_dir(root: &Path) -> PathBuf {
    root.join(".cfs")
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_cfs_dir(root).join("config.json")
}

pub fn get_plans_dir(root: &Path) -> PathBuf {
    get_cfs_dir(root).join("plans")
}

pub fn get_plan_path(root: &Path, id: &str) -> PathBuf {
    get_plans_dir(root).join(format!("{}.json", id))
}

pub fn get_transactions_dir(root: &Path) -> PathBuf {
    get_cfs_dir(root).join("transactions")
}

pub fn get_transaction_path(root: &Path, id: &str) -> PathBuf {
    get_transactions_dir(root).join(format!("{}.json", id))
}

pub fn get_flows_dir(root: &Path) -> PathBuf {
    get_cfs_dir(root).join("flows")
}

pub fn get_flow_path(root: &Path, name: &str) -> PathBuf {
    get_flows_dir(root).join(format!("{}.json", name))
}

pub fn get_imports_dir(root: &Path) -> PathBuf {
    get_cfs_dir(root).join("imports")
}

pub fn get_import_path(root: &Path, id: &str) -> PathBuf {
    get_imports_dir(root).join(format!("{}.json", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".cfs")).unwrap();
        temp
    }

    #[test]
    fn test_find_store_root_from_root() {
        let temp = setup_store();
        let root = find_store_root(temp.path()).unwrap();
        assert_eq!(root.canonicalize().unwrap(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_store_root_from_subdir() {
        let temp = setup_store();
        let subdir = temp.path().join("yard").join("gate-3");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = find_store_root(&subdir).unwrap();
        assert_eq!(root.canonicalize().unwrap(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_store_root_not_found() {
        let temp = TempDir::new().unwrap();
        let result = find_store_root(temp.path());
        assert!(matches!(result, Err(CfsError::StoreNotFound(_))));
    }

    #[test]
    fn test_store_paths() {
        let root = PathBuf::from("/terminal");
        assert_eq!(get_config_path(&root), PathBuf::from("/terminal/.cfs/config.json"));
        assert_eq!(get_plan_path(&root, "plan-1"), PathBuf::from("/terminal/.cfs/plans/plan-1.json"));
        assert_eq!(
            get_transaction_path(&root, "t-1"),
            PathBuf::from("/terminal/.cfs/transactions/t-1.json")
        );
        assert_eq!(get_flow_path(&root, "stuffing"), PathBuf::from("/terminal/.cfs/flows/stuffing.json"));
        assert_eq!(get_import_path(&root, "imp-1"), PathBuf::from("/terminal/.cfs/imports/imp-1.json"));
    }

    #[test]
    fn test_ensure_safe_id() {
        assert!(ensure_safe_id("plan", "plan-1").is_ok());
        assert!(matches!(ensure_safe_id("plan", ""), Err(CfsError::MissingField(_))));
        assert!(ensure_safe_id("plan", "../etc").is_err());
        assert!(ensure_safe_id("plan", "..").is_err());
        assert!(ensure_safe_id("plan", " plan-1").is_err());
    }

    #[test]
    fn test_resolve_cwd_with_override() {
        let path = PathBuf::from("/custom/path");
        assert_eq!(resolve_cwd(Some(&path)), path);
    }
}
