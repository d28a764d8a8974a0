//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `entries` - List boot entries from grub.cfg
//! - `show` - Display configuration and settings
//! - `settings` - Get/set /etc/default/grub values
//! - `params` - Edit kernel command lines
//! - `devices` - Edit install devices and the device map

pub mod devices;
mod entries;
pub mod params;
mod settings;
pub mod show;

pub use devices::{cmd_device_map, cmd_install_device};
pub use entries::cmd_entries;
pub use params::cmd_param;
pub use settings::{cmd_get, cmd_serial_console, cmd_set, cmd_terminal, cmd_toggle};
pub use show::cmd_show;

use anyhow::Result;
use std::sync::Arc;

use grub2cfg::cfa::DiskFile;
use grub2cfg::config::Config;
use grub2cfg::grub2::{DeviceMap, GrubDefault, InstallDevice};

/// Open /etc/default/grub. A missing file is treated as empty.
fn open_default(config: &Config) -> Result<GrubDefault> {
    let mut model = GrubDefault::with_path(Arc::new(DiskFile), &config.grub_default);
    if config.grub_default.exists() {
        model.load()?;
    } else {
        eprintln!(
            "  [WARN] {} not found, starting empty",
            config.grub_default.display()
        );
    }
    Ok(model)
}

/// Open device.map. A missing file is treated as empty.
fn open_device_map(config: &Config) -> Result<DeviceMap> {
    let mut model = DeviceMap::with_path(Arc::new(DiskFile), &config.device_map);
    if config.device_map.exists() {
        model.load()?;
    } else {
        eprintln!(
            "  [WARN] {} not found, starting empty",
            config.device_map.display()
        );
    }
    Ok(model)
}

/// Open grub_installdevice. A missing file is treated as empty.
fn open_install_device(config: &Config) -> Result<InstallDevice> {
    let mut model = InstallDevice::with_path(Arc::new(DiskFile), &config.install_device);
    if config.install_device.exists() {
        model.load()?;
    } else {
        eprintln!(
            "  [WARN] {} not found, starting empty",
            config.install_device.display()
        );
    }
    Ok(model)
}
