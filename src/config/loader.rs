// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration for the binary.
///
/// - If the config file exists it is loaded; otherwise defaults are used,
///   which is only valid when `path_override` supplies the watch root.
/// - `path_override` (from `--path`) replaces `[watcher].path`.
pub fn resolve(config_path: impl AsRef<Path>, path_override: Option<&str>) -> Result<ConfigFile> {
    let config_path = config_path.as_ref();

    let mut raw = if config_path.exists() {
        load_from_path(config_path)?
    } else {
        debug!(?config_path, "config file not found; using defaults");
        RawConfigFile::default()
    };

    if let Some(path) = path_override {
        raw.watcher.path = Some(path.to_string());
    }

    ConfigFile::try_from(raw)
}

/// Default config location: `Driverwatch.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Driverwatch.toml")
}
