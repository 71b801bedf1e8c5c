// src/config/mod.rs

//! Configuration loading and validation for driverwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into watcher options (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve};
pub use model::{ConfigFile, RawConfigFile, WatcherSection};
pub use validate::{parse_duration, validate_config};
