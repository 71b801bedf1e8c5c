// tests/watcher_lifecycle.rs

mod common;
use crate::common::{
    init_tracing, make_driver_dirs, temp_root, wait_for, with_timeout, RecordingHandler,
};

use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use driverwatch::errors::WatchError;
use driverwatch::fs::mock::MockFileSystem;
use driverwatch::types::{DriverChange, DriverEvent, LifecycleState};
use driverwatch::watch::{DriverWatcher, WatcherOptions, DEFAULT_STOP_TIMEOUT};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn construction_performs_no_io() {
    let watcher = DriverWatcher::new("/does/not/exist", |_: &DriverEvent| {});
    assert_eq!(watcher.state(), LifecycleState::Idle);
    assert_eq!(watcher.root(), PathBuf::from("/does/not/exist").as_path());
}

#[test]
fn default_options_ignore_kubelet_directory() {
    let options = WatcherOptions::default();
    assert_eq!(options.stop_timeout, DEFAULT_STOP_TIMEOUT);
    assert_eq!(options.stop_timeout, Duration::from_secs(11));
    assert_eq!(
        options.ignore_names,
        BTreeSet::from(["kubernetes.io".to_string()])
    );
}

#[tokio::test]
async fn missing_root_fails_start_and_rolls_back() -> TestResult {
    init_tracing();
    let root = temp_root();
    let missing = root.path().join("not-there");

    let handler = RecordingHandler::new();
    let mut watcher = DriverWatcher::new(&missing, handler.clone());

    match watcher.start() {
        Err(WatchError::DirectoryRead { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected DirectoryRead, got {other:?}"),
    }
    assert_eq!(watcher.state(), LifecycleState::Idle);

    // Nothing is running, so there is nothing to stop.
    assert!(matches!(
        watcher.stop().await,
        Err(WatchError::InvalidState { state: LifecycleState::Idle, .. })
    ));
    assert!(handler.is_empty());
    Ok(())
}

#[tokio::test]
async fn start_and_stop_enforce_lifecycle_order() -> TestResult {
    init_tracing();
    let root = temp_root();
    let mut watcher = DriverWatcher::new(root.path(), |_: &DriverEvent| {});

    assert!(matches!(
        watcher.stop().await,
        Err(WatchError::InvalidState { operation: "stop", .. })
    ));

    watcher.start()?;
    assert_eq!(watcher.state(), LifecycleState::Running);
    assert!(matches!(
        watcher.start(),
        Err(WatchError::InvalidState { operation: "start", state: LifecycleState::Running })
    ));

    watcher.stop().await?;
    assert_eq!(watcher.state(), LifecycleState::Stopped);

    // Single-use: neither a second stop nor a restart is allowed.
    assert!(matches!(
        watcher.stop().await,
        Err(WatchError::InvalidState { state: LifecycleState::Stopped, .. })
    ));
    assert!(matches!(
        watcher.start(),
        Err(WatchError::InvalidState { state: LifecycleState::Stopped, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn stop_waits_for_in_flight_handlers() -> TestResult {
    init_tracing();
    let root = temp_root();
    let names = make_driver_dirs(root.path(), "csi-", 5);

    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let handler = {
        let started = Arc::clone(&started);
        let finished = Arc::clone(&finished);
        move |_: &DriverEvent| {
            started.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
            finished.fetch_add(1, Ordering::SeqCst);
        }
    };

    let mut watcher = DriverWatcher::new(root.path(), handler);
    watcher.start()?;
    assert!(wait_for(|| started.load(Ordering::SeqCst) == names.len()).await);

    with_timeout(watcher.stop()).await?;
    assert_eq!(finished.load(Ordering::SeqCst), names.len());
    assert_eq!(watcher.state(), LifecycleState::Stopped);
    Ok(())
}

#[tokio::test]
async fn slow_handler_makes_stop_time_out() -> TestResult {
    init_tracing();
    let root = temp_root();
    make_driver_dirs(root.path(), "csi-slow-", 1);

    let handler = RecordingHandler::with_delay(Duration::from_secs(2));
    let options = WatcherOptions {
        stop_timeout: Duration::from_millis(100),
        ..WatcherOptions::default()
    };
    let mut watcher = DriverWatcher::with_options(root.path(), handler.clone(), options);
    watcher.start()?;
    assert!(wait_for(|| handler.len() == 1).await);

    match watcher.stop().await {
        Err(WatchError::ShutdownTimeout(after)) => {
            assert_eq!(after, Duration::from_millis(100))
        }
        other => panic!("expected ShutdownTimeout, got {other:?}"),
    }
    assert_eq!(watcher.state(), LifecycleState::Stopping);
    Ok(())
}

#[tokio::test]
async fn bootstrap_goes_through_the_configured_filesystem() -> TestResult {
    init_tracing();
    let root = temp_root();

    let fs = MockFileSystem::new();
    fs.add_dir(root.path().join("csi-mock-a"));
    fs.add_dir(root.path().join("csi-mock-b"));
    fs.add_dir(root.path().join("kubernetes.io"));
    fs.add_file(root.path().join("csi.sock"));

    let handler = RecordingHandler::new();
    let mut watcher =
        DriverWatcher::new(root.path(), handler.clone()).with_filesystem(Arc::new(fs));
    watcher.start()?;

    assert!(wait_for(|| handler.len() == 2).await);
    assert_eq!(
        handler.names(DriverChange::Appeared),
        vec!["csi-mock-a".to_string(), "csi-mock-b".to_string()]
    );

    watcher.stop().await?;
    Ok(())
}

#[tokio::test]
async fn failed_registration_leaves_a_stoppable_watcher() -> TestResult {
    init_tracing();
    let missing = PathBuf::from("/driverwatch-test/definitely/missing");

    let fs = MockFileSystem::new();
    fs.add_dir(missing.join("csi-a"));

    let handler = RecordingHandler::new();
    let mut watcher =
        DriverWatcher::new(&missing, handler.clone()).with_filesystem(Arc::new(fs));

    match watcher.start() {
        Err(WatchError::PathRegistration { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected PathRegistration, got {other:?}"),
    }
    assert_eq!(watcher.state(), LifecycleState::Running);

    watcher.stop().await?;
    assert_eq!(watcher.state(), LifecycleState::Stopped);
    Ok(())
}
