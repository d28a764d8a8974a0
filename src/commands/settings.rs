//! Settings commands - read and write single /etc/default/grub values.

use anyhow::{bail, Result};

use super::open_default;
use grub2cfg::config::Config;
use grub2cfg::grub2::{Attribute, Terminal, Toggle};

/// Print one attribute.
pub fn cmd_get(config: &Config, attribute: Attribute) -> Result<()> {
    let grub_default = open_default(config)?;
    match grub_default.get(attribute) {
        Some(value) => println!("{}", value),
        None => bail!("{} is not set in {}", attribute.key(), config.grub_default.display()),
    }
    Ok(())
}

/// Set one attribute and save.
pub fn cmd_set(config: &Config, attribute: Attribute, value: &str) -> Result<()> {
    let mut grub_default = open_default(config)?;
    grub_default.set(attribute, value);
    grub_default.save()?;
    println!("✓ {}={}", attribute.key(), value);
    Ok(())
}

/// Enable or disable a boolean setting and save.
pub fn cmd_toggle(config: &Config, toggle: Toggle, enabled: bool) -> Result<()> {
    let mut grub_default = open_default(config)?;
    let key = {
        let mut value = grub_default.toggle(toggle);
        value.set(enabled);
        value.key().to_string()
    };
    grub_default.save()?;
    let state = if enabled { "enabled" } else { "disabled" };
    println!("✓ {} ({})", state, key);
    Ok(())
}

/// Show the terminal list, or replace it when names are given.
///
/// Every name is validated before anything is written.
pub fn cmd_terminal(config: &Config, names: &[String]) -> Result<()> {
    let mut grub_default = open_default(config)?;

    if names.is_empty() {
        match grub_default.terminal()? {
            Some(terminals) => {
                for terminal in terminals {
                    println!("{}", terminal);
                }
            }
            None => println!("(unset)"),
        }
        return Ok(());
    }

    let terminals = names
        .iter()
        .map(|name| name.parse::<Terminal>())
        .collect::<Result<Vec<_>>>()?;
    grub_default.set_terminal(&terminals);
    grub_default.save()?;
    println!("✓ GRUB_TERMINAL={}", names.join(" "));
    Ok(())
}

/// Show or set the serial console command.
pub fn cmd_serial_console(config: &Config, command: Option<&str>) -> Result<()> {
    let mut grub_default = open_default(config)?;

    let Some(command) = command else {
        match grub_default.serial_console() {
            Some(value) => println!("{}", value),
            None => println!("(unset)"),
        }
        return Ok(());
    };

    grub_default.set_serial_console(command)?;
    grub_default.save()?;
    println!("✓ GRUB_SERIAL_COMMAND={}", command);
    println!("  serial terminal enabled");
    Ok(())
}
