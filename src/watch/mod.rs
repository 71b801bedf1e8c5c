// src/watch/mod.rs

//! Driver directory watching.
//!
//! This module is responsible for:
//! - Turning raw `notify` events into driver appear/remove events.
//! - Reporting directories that already exist at start-up through the same
//!   path as live events.
//! - Running the handler once per event and draining in-flight calls on stop.
//!
//! It does **not** know what a driver is; it only reports names.

pub mod bootstrap;
pub mod dispatch;
pub mod event;
pub mod event_loop;
pub mod handler;
pub mod watcher;

pub use event::{classify, Classified, Op, RawEvent};
pub use event_loop::{event_channels, EventLoop, EventSinks, EventSources};
pub use handler::{DriverHandler, SharedHandler};
pub use watcher::{DriverWatcher, WatcherOptions, DEFAULT_IGNORE_NAME, DEFAULT_STOP_TIMEOUT};
