// src/config/validate.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WatchError};
use crate::watch::WatcherOptions;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let path = validate_path(&raw)?;
        let ignore_names = validate_ignore_names(&raw)?;
        let stop_timeout = validate_stop_timeout(&raw)?;

        Ok(ConfigFile::new_unchecked(
            path,
            WatcherOptions {
                ignore_names,
                stop_timeout,
            },
        ))
    }
}

/// Run validation without consuming the raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ConfigFile::try_from(cfg.clone()).map(|_| ())
}

fn validate_path(cfg: &RawConfigFile) -> Result<PathBuf> {
    match cfg.watcher.path.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => Err(WatchError::ConfigError(
            "[watcher].path must be set (in the config file or with --path)".to_string(),
        )),
    }
}

fn validate_ignore_names(cfg: &RawConfigFile) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for name in cfg.watcher.ignore.iter() {
        if name.is_empty() {
            return Err(WatchError::ConfigError(
                "[watcher].ignore must not contain empty names".to_string(),
            ));
        }
        if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            return Err(WatchError::ConfigError(format!(
                "[watcher].ignore entry '{}' must be a single directory name",
                name
            )));
        }
        names.insert(name.clone());
    }
    Ok(names)
}

fn validate_stop_timeout(cfg: &RawConfigFile) -> Result<Duration> {
    let timeout = parse_duration(&cfg.watcher.stop_timeout).map_err(|e| {
        WatchError::ConfigError(format!("[watcher].stop_timeout: {}", e))
    })?;
    if timeout.is_zero() {
        return Err(WatchError::ConfigError(
            "[watcher].stop_timeout must be greater than zero".to_string(),
        ));
    }
    Ok(timeout)
}

/// Parse a duration string such as `"500ms"`, `"11s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| "duration too large".to_string()),
        "h" => value
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| "duration too large".to_string()),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
