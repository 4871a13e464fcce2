//! Init command - Create a .cfs store

use std::path::Path;

use crate::errors::Result;
use crate::fs::{
    get_cfs_dir, get_config_path, get_flows_dir, get_imports_dir, get_plans_dir,
    get_transactions_dir, resolve_cwd, write_json,
};
use crate::schemas::Config;

pub async fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    let config_path = get_config_path(&root);

    for dir in [
        get_cfs_dir(&root),
        get_plans_dir(&root),
        get_transactions_dir(&root),
        get_flows_dir(&root),
        get_imports_dir(&root),
    ] {
        std::fs::create_dir_all(&dir)?;
    }

    if config_path.exists() && !force {
        tracing::info!("{} already exists, leaving it untouched", config_path.display());
    } else {
        write_json(&config_path, &Config::default())?;
        tracing::info!("Wrote {}", config_path.display());
    }

    println!("Initialized CFS store in {}", get_cfs_dir(&root).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::read_config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_layout() {
        let temp = TempDir::new().unwrap();
        run(Some(temp.path()), false).await.unwrap();

        assert!(get_plans_dir(temp.path()).is_dir());
        assert!(get_transactions_dir(temp.path()).is_dir());
        assert!(get_config_path(temp.path()).exists());
    }

    #[tokio::test]
    async fn test_init_keeps_config_without_force() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".cfs")).unwrap();
        std::fs::write(get_config_path(temp.path()), r#"{ "actor": "gate-clerk" }"#).unwrap();

        run(Some(temp.path()), false).await.unwrap();
        assert_eq!(read_config(temp.path()).unwrap().actor, "gate-clerk");

        run(Some(temp.path()), true).await.unwrap();
        assert_eq!(read_config(temp.path()).unwrap().actor, "operator");
    }
}
