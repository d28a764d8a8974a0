//! Show command - displays information.

use anyhow::Result;

use super::open_default;
use grub2cfg::config::Config;
use grub2cfg::grub2::{Attribute, CmdlineKey, Toggle};

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show /etc/default/grub settings
    Settings,
}

/// Execute the show command.
pub fn cmd_show(config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Settings => show_settings(config)?,
    }
    Ok(())
}

fn show_settings(config: &Config) -> Result<()> {
    let mut grub_default = open_default(config)?;

    println!("Settings in {}:", config.grub_default.display());
    for attribute in Attribute::ALL {
        let value = grub_default.get(attribute);
        println!(
            "  {}: {}",
            attribute.key(),
            value.as_deref().unwrap_or("(unset)")
        );
    }

    println!();
    for toggle in Toggle::ALL {
        let value = grub_default.toggle(toggle);
        let state = match value.state() {
            Some(true) => "enabled",
            Some(false) => "disabled",
            None => "(unset)",
        };
        println!("  {}: {}", value.key(), state);
    }

    println!();
    match grub_default.terminal() {
        Ok(Some(terminals)) => {
            let names: Vec<_> = terminals.iter().map(|t| t.as_str()).collect();
            println!("  GRUB_TERMINAL: {}", names.join(" "));
        }
        Ok(None) => println!("  GRUB_TERMINAL: (unset)"),
        Err(e) => println!("  GRUB_TERMINAL: ✗ {}", e),
    }
    if let Some(serial) = grub_default.serial_console() {
        println!("  GRUB_SERIAL_COMMAND: {}", serial);
    }

    println!();
    for key in CmdlineKey::ALL {
        let params = grub_default.cmdline(key);
        if !params.is_empty() {
            println!("  {}: {}", key, params.serialize());
        }
    }
    Ok(())
}
