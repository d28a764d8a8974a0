//! Configuration management for grub2cfg.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default filesystem root all relative paths are resolved against.
pub const DEFAULT_ROOT: &str = "/";
pub const DEFAULT_GRUB_DEFAULT_FILE: &str = "etc/default/grub";
pub const DEFAULT_GRUB_CFG_FILE: &str = "boot/grub2/grub.cfg";
pub const DEFAULT_DEVICE_MAP_FILE: &str = "boot/grub2/device.map";
pub const DEFAULT_INSTALL_DEVICE_FILE: &str = "etc/default/grub_installdevice";

/// grub2cfg configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the system being edited (default: /)
    pub root: PathBuf,
    /// Path to /etc/default/grub
    pub grub_default: PathBuf,
    /// Path to the generated grub.cfg
    pub grub_cfg: PathBuf,
    /// Path to device.map
    pub device_map: PathBuf,
    /// Path to grub_installdevice
    pub install_device: PathBuf,
}

impl Config {
    /// Load configuration from `.env` in `base_dir` and the environment.
    ///
    /// `root_override` (the `--root` flag) beats `GRUB2CFG_ROOT`.
    pub fn load(base_dir: &Path, root_override: Option<&Path>) -> Result<Self> {
        let mut env_vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            let iter = dotenvy::from_path_iter(&env_path)
                .with_context(|| format!("Failed to open {}", env_path.display()))?;
            for item in iter {
                let (key, value) =
                    item.with_context(|| format!("Invalid line in {}", env_path.display()))?;
                env_vars.insert(key, value);
            }
        }

        // Environment variables override .env file
        for (key, value) in std::env::vars() {
            env_vars.insert(key, value);
        }

        Ok(Self::from_vars(&env_vars, root_override))
    }

    fn from_vars(env_vars: &HashMap<String, String>, root_override: Option<&Path>) -> Self {
        let root = root_override
            .map(Path::to_path_buf)
            .or_else(|| env_vars.get("GRUB2CFG_ROOT").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));

        let resolve = |key: &str, default: &str| {
            let path = env_vars
                .get(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        };

        Self {
            grub_default: resolve("GRUB_DEFAULT_FILE", DEFAULT_GRUB_DEFAULT_FILE),
            grub_cfg: resolve("GRUB_CFG_FILE", DEFAULT_GRUB_CFG_FILE),
            device_map: resolve("GRUB_DEVICE_MAP_FILE", DEFAULT_DEVICE_MAP_FILE),
            install_device: resolve("GRUB_INSTALL_DEVICE_FILE", DEFAULT_INSTALL_DEVICE_FILE),
            root,
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  GRUB2CFG_ROOT: {}", self.root.display());
        print_path("GRUB_DEFAULT_FILE", &self.grub_default);
        print_path("GRUB_CFG_FILE", &self.grub_cfg);
        print_path("GRUB_DEVICE_MAP_FILE", &self.device_map);
        print_path("GRUB_INSTALL_DEVICE_FILE", &self.install_device);
    }
}

fn print_path(name: &str, path: &Path) {
    let status = if path.exists() { "FOUND" } else { "NOT FOUND" };
    println!("  {}: {} ({})", name, path.display(), status);
}
