// src/watch/dispatch.rs

//! Per-event handler dispatch.

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

use crate::types::DriverEvent;
use crate::watch::handler::SharedHandler;

/// Runs the handler once per event on its own tracked task.
///
/// Distinct driver names are handled concurrently. For the same name the
/// new task waits for the previous one, so a `Removed` followed by an
/// `Appeared` reaches the handler in that order.
#[derive(Debug)]
pub struct Dispatcher {
    handler: SharedHandler,
    tracker: TaskTracker,
    /// Latest task per driver name.
    active: HashMap<String, JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(handler: SharedHandler, tracker: TaskTracker) -> Self {
        Self {
            handler,
            tracker,
            active: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, event: DriverEvent) {
        self.active.retain(|_, handle| !handle.is_finished());

        let name = event.name().to_string();
        let previous = self.active.remove(&name);
        let handler = self.handler.clone();

        let handle = self.tracker.spawn(async move {
            if let Some(previous) = previous {
                // Errors were already logged by the previous task.
                let _ = previous.await;
            }
            invoke(handler, event).await;
        });

        self.active.insert(name, handle);
    }

    /// Number of driver names with a handler call still pending.
    pub fn pending(&self) -> usize {
        self.active.values().filter(|h| !h.is_finished()).count()
    }
}

/// Call the handler on the blocking pool, containing any panic.
async fn invoke(handler: SharedHandler, event: DriverEvent) {
    let name = event.name().to_string();
    let change = event.change();

    let result = tokio::task::spawn_blocking(move || handler.handle(&event)).await;

    match result {
        Ok(()) => debug!(driver = %name, %change, "driver handler finished"),
        Err(err) if err.is_panic() => {
            error!(driver = %name, %change, "driver handler panicked; event dropped")
        }
        Err(err) => warn!(driver = %name, %change, error = %err, "driver handler task failed"),
    }
}
