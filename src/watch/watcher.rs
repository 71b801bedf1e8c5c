// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::errors::{Result, WatchError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::LifecycleState;
use crate::watch::bootstrap::scan_existing;
use crate::watch::dispatch::Dispatcher;
use crate::watch::event_loop::{event_channels, EventLoop};
use crate::watch::handler::{DriverHandler, SharedHandler};

/// Directory name owned by the kubelet itself, never a driver.
pub const DEFAULT_IGNORE_NAME: &str = "kubernetes.io";

/// How long `stop` waits for in-flight work before giving up.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(11);

/// Tunables for a `DriverWatcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherOptions {
    /// Subdirectory names that never reach the handler.
    pub ignore_names: BTreeSet<String>,
    pub stop_timeout: Duration,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            ignore_names: BTreeSet::from([DEFAULT_IGNORE_NAME.to_string()]),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// Watches the immediate subdirectories of one directory and reports each
/// appearance and removal to a handler.
///
/// Subdirectories that already exist when [`start`](Self::start) runs are
/// reported as `Appeared`. The watcher is single-use: once stopped it cannot
/// be started again. Callers must serialize `start` and `stop`.
pub struct DriverWatcher {
    root: PathBuf,
    handler: SharedHandler,
    ignore_names: Arc<BTreeSet<String>>,
    stop_timeout: Duration,
    fs: Arc<dyn FileSystem>,
    state: LifecycleState,
    native: Option<RecommendedWatcher>,
    stop: CancellationToken,
    tracker: TaskTracker,
}

impl fmt::Debug for DriverWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverWatcher")
            .field("root", &self.root)
            .field("ignore_names", &self.ignore_names)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DriverWatcher {
    /// Build a watcher with default options. Performs no I/O.
    pub fn new(path: impl Into<PathBuf>, handler: impl DriverHandler) -> Self {
        Self::with_options(path, handler, WatcherOptions::default())
    }

    pub fn with_options(
        path: impl Into<PathBuf>,
        handler: impl DriverHandler,
        options: WatcherOptions,
    ) -> Self {
        Self {
            root: path.into(),
            handler: SharedHandler::new(handler),
            ignore_names: Arc::new(options.ignore_names),
            stop_timeout: options.stop_timeout,
            fs: Arc::new(RealFileSystem),
            state: LifecycleState::Idle,
            native: None,
            stop: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Replace the filesystem used for the start-up scan.
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Start watching. Must be called from within a Tokio runtime.
    ///
    /// The event loop is listening before existing directories are scanned
    /// and before the root is registered, so no notification is lost in
    /// between. If the native source cannot be created or the scan fails,
    /// nothing is left running and the watcher returns to `Idle`. If
    /// registering the root fails the watcher stays `Running` and must still
    /// be stopped.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Idle {
            return Err(WatchError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        self.stop = CancellationToken::new();
        self.tracker = TaskTracker::new();

        let (sinks, sources) = event_channels();

        let native = RecommendedWatcher::new(
            {
                let sinks = sinks.clone();
                move |res: notify::Result<notify::Event>| sinks.forward(res)
            },
            Config::default(),
        )
        .map_err(WatchError::WatchInit)?;

        let dispatcher = Dispatcher::new(self.handler.clone(), self.tracker.clone());
        let event_loop = EventLoop::new(
            sources,
            self.stop.clone(),
            dispatcher,
            Arc::clone(&self.ignore_names),
        );
        self.tracker.spawn(event_loop.run());

        let injected =
            match scan_existing(self.fs.as_ref(), &self.root, &self.ignore_names, &sinks) {
                Ok(n) => n,
                Err(err) => {
                    self.stop.cancel();
                    self.tracker.close();
                    return Err(err);
                }
            };
        drop(sinks);

        self.state = LifecycleState::Running;
        let native = self.native.insert(native);
        native
            .watch(&self.root, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::PathRegistration {
                path: self.root.clone(),
                source,
            })?;

        info!(root = ?self.root, existing = injected, "driver watcher started");
        Ok(())
    }

    /// Stop the event loop and wait for in-flight handler calls.
    ///
    /// On timeout returns [`WatchError::ShutdownTimeout`], leaves the native
    /// watch open and stays in `Stopping`.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state != LifecycleState::Running {
            return Err(WatchError::InvalidState {
                operation: "stop",
                state: self.state,
            });
        }

        self.state = LifecycleState::Stopping;
        self.stop.cancel();
        self.tracker.close();

        if tokio::time::timeout(self.stop_timeout, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                root = ?self.root,
                pending = self.tracker.len(),
                timeout = ?self.stop_timeout,
                "timeout on stopping watcher"
            );
            return Err(WatchError::ShutdownTimeout(self.stop_timeout));
        }

        // Dropping the native watcher closes the OS subscription.
        self.native = None;
        self.state = LifecycleState::Stopped;
        info!(root = ?self.root, "driver watcher stopped");
        Ok(())
    }
}

impl Drop for DriverWatcher {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
