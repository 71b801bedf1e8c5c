// src/watch/event_loop.rs

//! The single consumer of raw filesystem events.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::watch::dispatch::Dispatcher;
use crate::watch::event::{classify, Classified, RawEvent};

/// Create the channel pair shared by the native source, the bootstrap scan
/// and the event loop.
pub fn event_channels() -> (EventSinks, EventSources) {
    let (events_tx, events_rx) = mpsc::unbounded_channel::<RawEvent>();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel::<notify::Error>();
    (
        EventSinks {
            events: events_tx,
            errors: errors_tx,
        },
        EventSources {
            events: events_rx,
            errors: errors_rx,
        },
    )
}

/// Producer side. Cheap to clone; safe to use from any thread.
#[derive(Debug, Clone)]
pub struct EventSinks {
    events: mpsc::UnboundedSender<RawEvent>,
    errors: mpsc::UnboundedSender<notify::Error>,
}

impl EventSinks {
    /// Queue an event for the loop. Returns `false` once the loop is gone.
    pub fn inject(&self, event: RawEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn report_error(&self, err: notify::Error) -> bool {
        self.errors.send(err).is_ok()
    }

    /// Entry point for the `notify` callback.
    pub fn forward(&self, res: notify::Result<notify::Event>) {
        match res {
            Ok(event) => {
                for raw in RawEvent::from_notify(event) {
                    if !self.inject(raw) {
                        trace!("event loop gone; dropping native event");
                        return;
                    }
                }
            }
            Err(err) => {
                if !self.report_error(err) {
                    trace!("event loop gone; dropping native error");
                }
            }
        }
    }
}

/// Consumer side, owned by the event loop.
#[derive(Debug)]
pub struct EventSources {
    events: mpsc::UnboundedReceiver<RawEvent>,
    errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Waits on native events, native errors and the stop signal.
#[derive(Debug)]
pub struct EventLoop {
    sources: EventSources,
    stop: CancellationToken,
    dispatcher: Dispatcher,
    ignore_names: Arc<BTreeSet<String>>,
}

impl EventLoop {
    pub fn new(
        sources: EventSources,
        stop: CancellationToken,
        dispatcher: Dispatcher,
        ignore_names: Arc<BTreeSet<String>>,
    ) -> Self {
        Self {
            sources,
            stop,
            dispatcher,
            ignore_names,
        }
    }

    /// Run until the stop signal fires or every producer is gone.
    ///
    /// Events still queued when the stop signal fires are abandoned.
    pub async fn run(mut self) {
        debug!("driver event loop started");

        loop {
            tokio::select! {
                biased;

                _ = self.stop.cancelled() => {
                    debug!("stop signal received; leaving event loop");
                    break;
                }

                maybe_event = self.sources.events.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("event channel closed; leaving event loop");
                            break;
                        }
                    }
                }

                Some(err) = self.sources.errors.recv() => {
                    warn!(error = %err, "file watcher received error");
                }
            }
        }

        debug!("driver event loop finished");
    }

    fn handle_event(&mut self, event: RawEvent) {
        match classify(&event, &self.ignore_names) {
            Classified::Dispatch(driver) => {
                info!(
                    driver = %driver.name(),
                    change = %driver.change(),
                    path = ?event.path,
                    "handling driver event"
                );
                self.dispatcher.dispatch(driver);
            }
            Classified::Ignored(name) => {
                debug!(driver = %name, op = ?event.op, "ignoring reserved directory");
            }
            Classified::Dropped => {
                debug!(op = ?event.op, path = ?event.path, "ignoring event");
            }
        }
    }
}
