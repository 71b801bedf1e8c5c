// src/watch/handler.rs

use std::fmt;
use std::sync::Arc;

use crate::types::DriverEvent;

/// Caller-supplied callback invoked once per qualifying driver event.
///
/// Calls for distinct driver names may run concurrently, so implementations
/// must be thread-safe. Calls for the same name are delivered in the order
/// the events arrived. The return value is ignored; a panic is caught and
/// logged by the dispatcher.
pub trait DriverHandler: Send + Sync + 'static {
    fn handle(&self, event: &DriverEvent);
}

impl<F> DriverHandler for F
where
    F: Fn(&DriverEvent) + Send + Sync + 'static,
{
    fn handle(&self, event: &DriverEvent) {
        self(event)
    }
}

/// Shared, type-erased handler.
#[derive(Clone)]
pub struct SharedHandler(Arc<dyn DriverHandler>);

impl SharedHandler {
    pub fn new(handler: impl DriverHandler) -> Self {
        Self(Arc::new(handler))
    }

    pub fn handle(&self, event: &DriverEvent) {
        self.0.handle(event)
    }
}

impl fmt::Debug for SharedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandler").finish_non_exhaustive()
    }
}
