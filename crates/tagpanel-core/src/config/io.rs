//! YAML configuration I/O
//!
//! Loading never fails: the panel starts with defaults when the file is
//! missing or broken. Saving goes through a sibling temp file and a rename so
//! an interrupted shutdown cannot leave a truncated config behind.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Read and parse a YAML file; `Ok(None)` when it does not exist
fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };
    let value = serde_yaml::from_str(&contents).with_context(|| format!("Invalid YAML in {:?}", path))?;
    Ok(Some(value))
}

/// Load configuration, falling back to `T::default()`
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match read_yaml(path) {
        Ok(Some(config)) => {
            log::info!("load_config: loaded {:?}", path);
            config
        }
        Ok(None) => {
            log::info!("load_config: no config at {:?}, using defaults", path);
            T::default()
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save configuration, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, yaml).with_context(|| format!("Failed to write {:?}", tmp))?;
    std::fs::rename(&tmp, path).with_context(|| format!("Failed to replace {:?}", path))?;
    log::info!("save_config: saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: PanelConfig = load_config(Path::new("/nonexistent/path/panel.yaml"));
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.yaml");
        std::fs::write(&path, "setting: [not, a, map").unwrap();

        let config: PanelConfig = load_config(&path);
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.yaml");
        std::fs::write(&path, "setting:\n  enable_ratings: true\n").unwrap();

        let config: PanelConfig = load_config(&path);
        assert!(config.setting.enable_ratings);
        assert_eq!(config.persist, PanelConfig::default().persist);
    }

    #[test]
    fn test_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panel.yaml");

        let mut config = PanelConfig::default();
        config.setting.enable_ratings = true;
        config.persist.file_view_sizes = "300 50 120".to_string();
        config.persist.splitter_state = vec![0, 3, 0, 2];

        save_config(&config, &path).unwrap();
        let loaded: PanelConfig = load_config(&path);

        assert_eq!(loaded, config);
        assert!(!temp_path(&path).exists());
    }
}
