use std::sync::{Arc, Mutex};
use std::time::Duration;

use driverwatch::types::{DriverChange, DriverEvent};
use driverwatch::watch::DriverHandler;

/// A handler that:
/// - records every event it is called with
/// - optionally blocks for a fixed time per call (to keep work in flight).
#[derive(Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<DriverEvent>>>,
    delay: Option<Duration>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each call sleeps for `delay` after recording its event.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            events: Arc::default(),
            delay: Some(delay),
        }
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Sorted names of recorded events with the given change.
    pub fn names(&self, change: DriverChange) -> Vec<String> {
        let mut names: Vec<String> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.change() == change)
            .map(|e| e.name().to_string())
            .collect();
        names.sort();
        names
    }
}

impl DriverHandler for RecordingHandler {
    fn handle(&self, event: &DriverEvent) {
        self.events.lock().unwrap().push(event.clone());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
    }
}
