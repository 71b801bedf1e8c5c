#![allow(dead_code)]
#![allow(unused_imports)]

pub use driverwatch_test_utils::builders::{make_driver_dirs, ConfigFileBuilder};
pub use driverwatch_test_utils::{init_tracing, settle, wait_for, with_timeout, RecordingHandler};

use tempfile::TempDir;

/// Fresh, empty watch root. Removed when the returned guard drops.
pub fn temp_root() -> TempDir {
    tempfile::Builder::new()
        .prefix("driverwatch-")
        .tempdir()
        .expect("create temp watch root")
}

pub fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
