//! Model of `/etc/default/grub_installdevice`.
//!
//! One device per line. Two special words may appear among the devices:
//! `activate` (set the boot flag) and `generic_mbr` (write a generic MBR).
//! They are always written last so the device list stays readable.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cfa::{BaseModel, FileHandler, Parser};

/// Default location of the file.
pub const INSTALL_DEVICE_PATH: &str = "/etc/default/grub_installdevice";

const ACTIVATE: &str = "activate";
const GENERIC_MBR: &str = "generic_mbr";

/// Line-per-device parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallDeviceParser;

impl Parser for InstallDeviceParser {
    type Data = Vec<String>;

    fn parse(&self, content: &str) -> Result<Vec<String>> {
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn serialize(&self, data: &Vec<String>) -> Result<String> {
        let mut out = String::new();
        for device in data.iter().filter(|d| !is_special(d)) {
            out.push_str(device);
            out.push('\n');
        }
        for special in [ACTIVATE, GENERIC_MBR] {
            if data.iter().any(|d| d == special) {
                out.push_str(special);
                out.push('\n');
            }
        }
        Ok(out)
    }

    fn empty(&self) -> Vec<String> {
        Vec::new()
    }
}

fn is_special(entry: &str) -> bool {
    entry == ACTIVATE || entry == GENERIC_MBR
}

pub struct InstallDevice {
    base: BaseModel<InstallDeviceParser>,
}

impl InstallDevice {
    pub fn new(handler: Arc<dyn FileHandler>) -> Self {
        Self::with_path(handler, INSTALL_DEVICE_PATH)
    }

    pub fn with_path(handler: Arc<dyn FileHandler>, path: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseModel::new(InstallDeviceParser, path, handler),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        self.base.load()
    }

    pub fn save(&self) -> Result<()> {
        self.base.save()
    }

    /// Add a device unless it is already listed.
    pub fn add_device(&mut self, dev: &str) {
        self.insert(dev);
    }

    /// Remove a device. Does nothing if it is not listed.
    pub fn remove_device(&mut self, dev: &str) {
        self.base.data_mut().retain(|d| d != dev);
    }

    /// Listed devices without the special entries.
    pub fn devices(&self) -> Vec<&str> {
        self.base
            .data()
            .iter()
            .map(String::as_str)
            .filter(|d| !is_special(d))
            .collect()
    }

    pub fn generic_mbr(&self) -> bool {
        self.contains(GENERIC_MBR)
    }

    pub fn set_generic_mbr(&mut self, enabled: bool) {
        self.set_special(GENERIC_MBR, enabled);
    }

    pub fn activate(&self) -> bool {
        self.contains(ACTIVATE)
    }

    pub fn set_activate(&mut self, enabled: bool) {
        self.set_special(ACTIVATE, enabled);
    }

    fn contains(&self, entry: &str) -> bool {
        self.base.data().iter().any(|d| d == entry)
    }

    fn insert(&mut self, entry: &str) {
        if !self.contains(entry) {
            self.base.data_mut().push(entry.to_string());
        }
    }

    fn set_special(&mut self, entry: &str, enabled: bool) {
        if enabled {
            self.insert(entry);
        } else {
            self.remove_device(entry);
        }
    }
}
