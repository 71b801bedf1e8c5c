// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `driverwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "driverwatch",
    version,
    about = "Report plugin driver directories as they appear and disappear.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Driverwatch.toml` in the current working directory. A
    /// missing file is fine as long as `--path` is given.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Directory to watch; overrides `[watcher].path`.
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DRIVERWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective config, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
