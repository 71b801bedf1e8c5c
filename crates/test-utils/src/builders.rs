#![allow(dead_code)]

use std::path::{Path, PathBuf};

use driverwatch::config::{ConfigFile, RawConfigFile, WatcherSection};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watcher: WatcherSection::default(),
            },
        }
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.watcher.path = Some(path.as_ref().display().to_string());
        self
    }

    pub fn ignore(mut self, name: &str) -> Self {
        self.config.watcher.ignore.push(name.to_string());
        self
    }

    pub fn no_ignore(mut self) -> Self {
        self.config.watcher.ignore.clear();
        self
    }

    pub fn stop_timeout(mut self, timeout: &str) -> Self {
        self.config.watcher.stop_timeout = timeout.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create `<root>/<prefix><i>` for `i in 0..count` and return the names.
pub fn make_driver_dirs(root: &Path, prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let name = format!("{prefix}{i}");
            let dir: PathBuf = root.join(&name);
            std::fs::create_dir_all(&dir).expect("create driver dir");
            name
        })
        .collect()
}
