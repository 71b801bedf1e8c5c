// src/types.rs

use std::fmt;

/// What happened to a driver directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverChange {
    /// The directory was created, or already existed when the watcher started.
    Appeared,
    /// The directory was removed.
    Removed,
}

impl fmt::Display for DriverChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverChange::Appeared => f.write_str("appeared"),
            DriverChange::Removed => f.write_str("removed"),
        }
    }
}

/// A filtered, handler-facing event: the base name of a watched
/// subdirectory plus what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverEvent {
    name: String,
    change: DriverChange,
}

impl DriverEvent {
    pub fn new(name: impl Into<String>, change: DriverChange) -> Self {
        Self {
            name: name.into(),
            change,
        }
    }

    /// Driver name (final path segment of the subdirectory).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn change(&self) -> DriverChange {
        self.change
    }
}

/// Lifecycle of a single `DriverWatcher`.
///
/// Transitions only move forward (`Idle -> Running -> Stopping -> Stopped`),
/// with one exception: a failed start rolls back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Running,
    /// Stop was requested but the drain has not (yet) completed.
    Stopping,
    Stopped,
}
