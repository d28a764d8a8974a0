//! Model of `/boot/grub2/device.map`.
//!
//! Maps BIOS drive names to system devices, one `(hdN) /dev/...` pair per
//! line. GRUB selects the boot drive through BIOS INT 13, which limits the
//! map to eight drives; [`DeviceMap::save`] refuses to write more.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cfa::{BaseModel, FileHandler, KeyValueParser, Matcher, Syntax};

/// Default location of the file.
pub const DEVICE_MAP_PATH: &str = "/boot/grub2/device.map";

/// Maximum number of mappings BIOS INT 13 can address.
pub const MAX_GRUB_DEVICES: usize = 8;

pub struct DeviceMap {
    base: BaseModel<KeyValueParser>,
}

impl DeviceMap {
    pub fn new(handler: Arc<dyn FileHandler>) -> Self {
        Self::with_path(handler, DEVICE_MAP_PATH)
    }

    pub fn with_path(handler: Arc<dyn FileHandler>, path: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseModel::new(KeyValueParser::new(Syntax::Spaced), path, handler),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        self.base.load()
    }

    /// Persist the map. Nothing is written when the map is over the limit.
    pub fn save(&self) -> Result<()> {
        let count = self.grub_devices().len();
        if count > MAX_GRUB_DEVICES {
            bail!(
                "Too many grub devices. Limit is {}. {} devices are mapped.",
                MAX_GRUB_DEVICES,
                count
            );
        }
        self.base.save()
    }

    /// GRUB drive mapped to `system_dev`, if any.
    pub fn grub_device_for(&self, system_dev: &str) -> Option<String> {
        self.base
            .tree()
            .select(&Matcher::any().with_value(system_dev))
            .into_iter()
            .next()
            .map(|(key, _)| key)
    }

    /// System device mapped to `grub_dev`, if any.
    pub fn system_device_for(&self, grub_dev: &str) -> Option<String> {
        self.base.value_for(grub_dev)
    }

    /// Map `grub_dev` to `system_dev`, replacing an existing mapping.
    pub fn add_mapping(&mut self, grub_dev: &str, system_dev: &str) {
        self.base.generic_set(grub_dev, system_dev);
    }

    /// Drop the mapping of `grub_dev`. Returns whether one existed.
    pub fn remove_mapping(&mut self, grub_dev: &str) -> bool {
        self.base.tree_mut().delete(grub_dev)
    }

    /// Every mapped GRUB drive in file order.
    pub fn grub_devices(&self) -> Vec<String> {
        self.base
            .tree()
            .keys()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
