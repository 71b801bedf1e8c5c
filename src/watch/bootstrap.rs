// src/watch/bootstrap.rs

//! One-time scan that reports drivers already present at start-up.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;
use crate::watch::event::{driver_name, RawEvent};
use crate::watch::event_loop::EventSinks;

/// Inject a synthetic "created" event for every existing subdirectory of
/// `root` whose name is not ignored.
///
/// The events travel through the same channel as live notifications, so they
/// are filtered and dispatched exactly like real ones. Returns the number of
/// events injected.
pub fn scan_existing(
    fs: &dyn FileSystem,
    root: &Path,
    ignore_names: &BTreeSet<String>,
    sinks: &EventSinks,
) -> Result<usize> {
    let entries = fs.read_dir(root).map_err(|source| WatchError::DirectoryRead {
        path: root.to_path_buf(),
        source,
    })?;

    let mut injected = 0;
    for entry in entries {
        if !fs.is_dir(&entry) {
            continue;
        }
        match driver_name(&entry) {
            Some(name) if !ignore_names.contains(&name) => {}
            _ => continue,
        }

        debug!(path = ?entry, "found existing driver directory");
        if !sinks.inject(RawEvent::created(entry)) {
            warn!("event loop stopped during bootstrap scan");
            break;
        }
        injected += 1;
    }

    Ok(injected)
}
