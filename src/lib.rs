// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::types::DriverEvent;
use crate::watch::DriverWatcher;

pub use crate::errors::WatchError;
pub use crate::types::{DriverChange, LifecycleState};
pub use crate::watch::{DriverHandler, WatcherOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + `--path` override)
/// - a `DriverWatcher` whose handler prints each event on stdout
/// - Ctrl-C handling and bounded shutdown
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args.config, args.path.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut watcher = DriverWatcher::with_options(
        cfg.path().clone(),
        print_event,
        cfg.options().clone(),
    );

    if let Err(err) = watcher.start() {
        // A failed registration leaves the loop running; shut it down.
        if watcher.state() == LifecycleState::Running {
            if let Err(stop_err) = watcher.stop().await {
                warn!(error = %stop_err, "failed to stop watcher after start error");
            }
        }
        return Err(err.into());
    }

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received; stopping watcher");

    watcher.stop().await?;
    Ok(())
}

fn print_event(event: &DriverEvent) {
    println!("{}\t{}", event.change(), event.name());
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("driverwatch dry-run");
    println!("  watcher.path = {}", cfg.path().display());
    println!(
        "  watcher.ignore = {:?}",
        cfg.options().ignore_names.iter().collect::<Vec<_>>()
    );
    println!("  watcher.stop_timeout = {:?}", cfg.options().stop_timeout);

    debug!("dry-run complete (no watching)");
}
