// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::LifecycleState;

#[derive(Error, Debug)]
pub enum WatchError {
    /// The native notification source could not be created.
    #[error("failed to start plugin watcher: {0}")]
    WatchInit(#[source] notify::Error),

    /// The bootstrap listing of the watch root failed.
    #[error("failed to read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Registering the watch root with the native source failed.
    #[error("failed to watch {path:?}: {source}")]
    PathRegistration {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("timeout on stopping watcher after {0:?}")]
    ShutdownTimeout(Duration),

    #[error("cannot {operation} watcher in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
