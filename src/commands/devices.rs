//! Device commands - install devices and the BIOS device map.

use anyhow::{bail, Result};

use super::{open_device_map, open_install_device};
use grub2cfg::config::Config;

/// Action for the install-device command.
pub enum InstallDeviceAction {
    List,
    Add(String),
    Remove(String),
    GenericMbr(bool),
    Activate(bool),
}

/// Action for the device-map command.
pub enum DeviceMapAction {
    List,
    Add { grub_device: String, system_device: String },
    Remove(String),
    /// Find the GRUB drive of a system device
    Lookup(String),
}

/// Execute the install-device command.
pub fn cmd_install_device(config: &Config, action: InstallDeviceAction) -> Result<()> {
    let mut install_device = open_install_device(config)?;

    match action {
        InstallDeviceAction::List => {
            println!("Install devices:");
            for device in install_device.devices() {
                println!("  {}", device);
            }
            println!("  activate: {}", yes_no(install_device.activate()));
            println!("  generic_mbr: {}", yes_no(install_device.generic_mbr()));
            return Ok(());
        }
        InstallDeviceAction::Add(device) => {
            install_device.add_device(&device);
            println!("✓ Added {}", device);
        }
        InstallDeviceAction::Remove(device) => {
            install_device.remove_device(&device);
            println!("✓ Removed {}", device);
        }
        InstallDeviceAction::GenericMbr(enabled) => {
            install_device.set_generic_mbr(enabled);
            println!("✓ generic_mbr: {}", yes_no(enabled));
        }
        InstallDeviceAction::Activate(enabled) => {
            install_device.set_activate(enabled);
            println!("✓ activate: {}", yes_no(enabled));
        }
    }
    install_device.save()
}

/// Execute the device-map command.
pub fn cmd_device_map(config: &Config, action: DeviceMapAction) -> Result<()> {
    let mut device_map = open_device_map(config)?;

    match action {
        DeviceMapAction::List => {
            println!("Device map ({}):", config.device_map.display());
            for grub_device in device_map.grub_devices() {
                let system = device_map.system_device_for(&grub_device).unwrap_or_default();
                println!("  {} -> {}", grub_device, system);
            }
            Ok(())
        }
        DeviceMapAction::Lookup(system_device) => match device_map.grub_device_for(&system_device) {
            Some(grub_device) => {
                println!("{}", grub_device);
                Ok(())
            }
            None => bail!("{} has no mapping in {}", system_device, config.device_map.display()),
        },
        DeviceMapAction::Add {
            grub_device,
            system_device,
        } => {
            device_map.add_mapping(&grub_device, &system_device);
            device_map.save()?;
            println!("✓ {} -> {}", grub_device, system_device);
            Ok(())
        }
        DeviceMapAction::Remove(grub_device) => {
            if !device_map.remove_mapping(&grub_device) {
                println!("  {} is not mapped, nothing to do", grub_device);
                return Ok(());
            }
            device_map.save()?;
            println!("✓ Removed {}", grub_device);
            Ok(())
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
