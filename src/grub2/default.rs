//! Model of `/etc/default/grub`.
//!
//! Edits never rewrite the file wholesale:
//! - setting a key that exists changes only its value
//! - a key that only appears commented out is uncommented in place
//! - anything else is appended at the end
//!
//! Kernel command lines are exposed as [`KernelParams`], created on first
//! access and cached for the lifetime of the model.

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::kernel_params::{CmdlineKey, KernelParams};
use crate::cfa::{BaseModel, BooleanValue, FileHandler, KeyValueParser, KeyValueTree, Syntax};

/// Default location of the file.
pub const GRUB_DEFAULT_PATH: &str = "/etc/default/grub";

const TERMINAL_KEY: &str = "GRUB_TERMINAL";
const SERIAL_COMMAND_KEY: &str = "GRUB_SERIAL_COMMAND";

/// Plain string settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Default,
    Distributor,
    Gfxmode,
    HiddenTimeout,
    Theme,
    Timeout,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Default,
        Attribute::Distributor,
        Attribute::Gfxmode,
        Attribute::HiddenTimeout,
        Attribute::Theme,
        Attribute::Timeout,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Attribute::Default => "GRUB_DEFAULT",
            Attribute::Distributor => "GRUB_DISTRIBUTOR",
            Attribute::Gfxmode => "GRUB_GFXMODE",
            Attribute::HiddenTimeout => "GRUB_HIDDEN_TIMEOUT",
            Attribute::Theme => "GRUB_THEME",
            Attribute::Timeout => "GRUB_TIMEOUT",
        }
    }
}

/// Supported `GRUB_TERMINAL` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Serial,
    Console,
    Gfxterm,
}

impl Terminal {
    pub fn as_str(self) -> &'static str {
        match self {
            Terminal::Serial => "serial",
            Terminal::Console => "console",
            Terminal::Gfxterm => "gfxterm",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terminal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serial" => Ok(Terminal::Serial),
            "console" => Ok(Terminal::Console),
            "gfxterm" => Ok(Terminal::Gfxterm),
            other => Err(anyhow!(
                "A value is invalid: {:?} (expected serial, console or gfxterm)",
                other
            )),
        }
    }
}

/// Boolean settings and the strings they are stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// `GRUB_DISABLE_OS_PROBER`, inverted.
    OsProber,
    /// `GRUB_DISABLE_RECOVERY`, inverted.
    RecoveryEntry,
    /// `GRUB_SAVEDEFAULT`.
    SaveDefault,
    /// `GRUB_ENABLE_CRYPTODISK`, stored as `y`/`n`.
    Cryptodisk,
}

impl Toggle {
    pub const ALL: [Toggle; 4] = [
        Toggle::OsProber,
        Toggle::RecoveryEntry,
        Toggle::SaveDefault,
        Toggle::Cryptodisk,
    ];

    /// `(key, true_value, false_value)`
    pub fn spec(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Toggle::OsProber => ("GRUB_DISABLE_OS_PROBER", "false", "true"),
            Toggle::RecoveryEntry => ("GRUB_DISABLE_RECOVERY", "false", "true"),
            Toggle::SaveDefault => ("GRUB_SAVEDEFAULT", "true", "false"),
            Toggle::Cryptodisk => ("GRUB_ENABLE_CRYPTODISK", "y", "n"),
        }
    }
}

/// `/etc/default/grub` model.
pub struct GrubDefault {
    base: BaseModel<KeyValueParser>,
    kernel_params: BTreeMap<CmdlineKey, KernelParams>,
}

impl GrubDefault {
    pub fn new(handler: Arc<dyn FileHandler>) -> Self {
        Self::with_path(handler, GRUB_DEFAULT_PATH)
    }

    pub fn with_path(handler: Arc<dyn FileHandler>, path: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseModel::new(KeyValueParser::new(Syntax::Shell), path, handler),
            kernel_params: BTreeMap::new(),
        }
    }

    /// Read the file. Cached kernel command lines are refreshed from the
    /// new content and lose any pending edits.
    pub fn load(&mut self) -> Result<()> {
        self.base.load()?;
        for (key, params) in self.kernel_params.iter_mut() {
            if let Some(line) = self.base.value_for(key.key()) {
                params.replace(Some(&line));
            }
        }
        Ok(())
    }

    /// Write edited kernel command lines back and persist the file.
    ///
    /// A command line that is empty and was never edited is left alone.
    pub fn save(&mut self) -> Result<()> {
        for (key, params) in &self.kernel_params {
            if !params.is_empty() || params.is_modified() {
                self.base.generic_set(key.key(), &params.serialize());
            }
        }
        self.base.save()
    }

    /// Raw value of any key.
    pub fn value_for(&self, key: &str) -> Option<String> {
        self.base.value_for(key)
    }

    /// Set any key (modify, uncomment, or append).
    pub fn generic_set(&mut self, key: &str, value: &str) {
        self.base.generic_set(key, value);
    }

    pub fn tree(&self) -> &KeyValueTree {
        self.base.tree()
    }

    pub fn get(&self, attribute: Attribute) -> Option<String> {
        self.value_for(attribute.key())
    }

    pub fn set(&mut self, attribute: Attribute, value: &str) {
        self.generic_set(attribute.key(), value);
    }

    pub fn default_entry(&self) -> Option<String> {
        self.get(Attribute::Default)
    }

    pub fn distributor(&self) -> Option<String> {
        self.get(Attribute::Distributor)
    }

    pub fn gfxmode(&self) -> Option<String> {
        self.get(Attribute::Gfxmode)
    }

    pub fn hidden_timeout(&self) -> Option<String> {
        self.get(Attribute::HiddenTimeout)
    }

    pub fn theme(&self) -> Option<String> {
        self.get(Attribute::Theme)
    }

    pub fn timeout(&self) -> Option<String> {
        self.get(Attribute::Timeout)
    }

    /// Boolean handle for one of the [`Toggle`] settings.
    pub fn toggle(&mut self, toggle: Toggle) -> BooleanValue<'_> {
        let (key, true_value, false_value) = toggle.spec();
        BooleanValue::new(key, self.base.tree_mut(), true_value, false_value)
    }

    pub fn os_prober(&mut self) -> BooleanValue<'_> {
        self.toggle(Toggle::OsProber)
    }

    pub fn recovery_entry(&mut self) -> BooleanValue<'_> {
        self.toggle(Toggle::RecoveryEntry)
    }

    pub fn savedefault(&mut self) -> BooleanValue<'_> {
        self.toggle(Toggle::SaveDefault)
    }

    pub fn cryptodisk(&mut self) -> BooleanValue<'_> {
        self.toggle(Toggle::Cryptodisk)
    }

    /// Kernel command line stored under `key`, created from the current
    /// file content on first access.
    pub fn cmdline(&mut self, key: CmdlineKey) -> &mut KernelParams {
        let base = &self.base;
        self.kernel_params
            .entry(key)
            .or_insert_with(|| KernelParams::new(base.value_for(key.key()).as_deref(), key))
    }

    pub fn kernel_params(&mut self) -> &mut KernelParams {
        self.cmdline(CmdlineKey::LinuxDefault)
    }

    pub fn xen_hypervisor_params(&mut self) -> &mut KernelParams {
        self.cmdline(CmdlineKey::XenDefault)
    }

    pub fn xen_kernel_params(&mut self) -> &mut KernelParams {
        self.cmdline(CmdlineKey::XenReplaceDefault)
    }

    pub fn recovery_params(&mut self) -> &mut KernelParams {
        self.cmdline(CmdlineKey::Recovery)
    }

    /// Parsed `GRUB_TERMINAL`; `None` when absent or empty.
    pub fn terminal(&self) -> Result<Option<Vec<Terminal>>> {
        let Some(values) = self.value_for(TERMINAL_KEY) else {
            return Ok(None);
        };
        if values.trim().is_empty() {
            return Ok(None);
        }
        values
            .split_whitespace()
            .map(|value| {
                value
                    .parse::<Terminal>()
                    .map_err(|_| anyhow!("unknown GRUB_TERMINAL option {:?}", value))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn set_terminal(&mut self, values: &[Terminal]) {
        let joined = values
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.generic_set(TERMINAL_KEY, &joined);
    }

    pub fn serial_console(&self) -> Option<String> {
        self.value_for(SERIAL_COMMAND_KEY)
    }

    /// Set `GRUB_SERIAL_COMMAND` and make sure `serial` is among the
    /// terminals.
    pub fn set_serial_console(&mut self, value: &str) -> Result<()> {
        let mut terminals = self.terminal()?.unwrap_or_default();
        if !terminals.contains(&Terminal::Serial) {
            terminals.push(Terminal::Serial);
        }
        self.set_terminal(&terminals);
        self.generic_set(SERIAL_COMMAND_KEY, value);
        Ok(())
    }
}
