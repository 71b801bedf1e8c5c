// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::watch::{WatcherOptions, DEFAULT_IGNORE_NAME};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watcher]
/// path = "/var/lib/kubelet/plugins"
/// ignore = ["kubernetes.io"]
/// stop_timeout = "11s"
/// ```
///
/// All keys are optional here; `path` must be supplied either by the file
/// or on the command line before validation succeeds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watcher: WatcherSection,
}

/// `[watcher]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatcherSection {
    /// Directory whose subdirectories are reported as drivers.
    #[serde(default)]
    pub path: Option<String>,

    /// Subdirectory names that are never reported.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Duration string (e.g. `"11s"`, `"500ms"`) bounding shutdown.
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout: String,
}

fn default_ignore() -> Vec<String> {
    vec![DEFAULT_IGNORE_NAME.to_string()]
}

fn default_stop_timeout() -> String {
    "11s".to_string()
}

impl Default for WatcherSection {
    fn default() -> Self {
        Self {
            path: None,
            ignore: default_ignore(),
            stop_timeout: default_stop_timeout(),
        }
    }
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
    options: WatcherOptions,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(path: PathBuf, options: WatcherOptions) -> Self {
        Self { path, options }
    }

    /// The watch root.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }
}
