//! Shared test utilities for grub2cfg tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use grub2cfg::cfa::DiskFile;
use grub2cfg::config::{
    Config, DEFAULT_DEVICE_MAP_FILE, DEFAULT_GRUB_CFG_FILE, DEFAULT_GRUB_DEFAULT_FILE,
    DEFAULT_INSTALL_DEVICE_FILE,
};

/// Test environment with a temporary target root.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Simulated filesystem root
    pub root: PathBuf,
    /// Configuration pointing every file below `root`
    pub config: Config,
}

impl TestEnv {
    /// Create a new test environment with an empty root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("root");
        fs::create_dir_all(&root).expect("Failed to create root dir");

        let config = Config {
            grub_default: root.join(DEFAULT_GRUB_DEFAULT_FILE),
            grub_cfg: root.join(DEFAULT_GRUB_CFG_FILE),
            device_map: root.join(DEFAULT_DEVICE_MAP_FILE),
            install_device: root.join(DEFAULT_INSTALL_DEVICE_FILE),
            root: root.clone(),
        };

        Self {
            _temp_dir: temp_dir,
            root,
            config,
        }
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    /// Install a fixture from tests/fixtures as the grub.cfg of this root.
    pub fn install_grub_cfg(&self, fixture_name: &str) {
        self.write(&self.config.grub_cfg, &fixture(fixture_name));
    }

    pub fn handler(&self) -> Arc<DiskFile> {
        Arc::new(DiskFile)
    }
}

/// Read a fixture file from tests/fixtures.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Read a file, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Assert that a file exists and contains the given content.
pub fn assert_file_contains(path: &Path, content: &str) {
    let actual = read(path);
    assert!(
        actual.contains(content),
        "File {} should contain '{}', got:\n{}",
        path.display(),
        content,
        actual
    );
}
