//! Entries command - lists boot entries from the generated grub.cfg.

use anyhow::{bail, Result};
use std::sync::Arc;

use grub2cfg::cfa::DiskFile;
use grub2cfg::config::Config;
use grub2cfg::grub2::GrubCfg;

/// Execute the entries command.
pub fn cmd_entries(config: &Config, json: bool, titles_only: bool) -> Result<()> {
    if !config.grub_cfg.exists() {
        bail!(
            "grub.cfg not found at {}. Run 'grub2-mkconfig -o {}' first.",
            config.grub_cfg.display(),
            config.grub_cfg.display()
        );
    }

    let mut grub_cfg = GrubCfg::with_path(Arc::new(DiskFile), &config.grub_cfg)?;
    grub_cfg.load()?;

    if json {
        if titles_only {
            println!("{}", serde_json::to_string_pretty(&grub_cfg.sections())?);
        } else {
            println!("{}", serde_json::to_string_pretty(grub_cfg.boot_entries())?);
        }
        return Ok(());
    }

    if titles_only {
        for title in grub_cfg.sections() {
            println!("{}", title);
        }
        return Ok(());
    }

    println!("Boot entries in {}:", config.grub_cfg.display());
    for (idx, entry) in grub_cfg.boot_entries().iter().enumerate() {
        println!("  [{}] {}", idx, entry.title());
        if entry.path() != entry.title() {
            println!("      path: {}", entry.path());
        }
    }
    println!("\n{} entries", grub_cfg.boot_entries().len());
    Ok(())
}
