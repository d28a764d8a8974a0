//! Kernel command line variables of `/etc/default/grub`.

use std::fmt;

use super::param_tree::{ParamTree, ParamValue, Parameter};
use crate::cfa::{Matcher, Placer};

/// Which `GRUB_CMDLINE_*` variable a command line is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CmdlineKey {
    /// Normal (non-recovery) Linux entries.
    LinuxDefault,
    /// All Linux entries, recovery included.
    Linux,
    /// Xen hypervisor.
    XenDefault,
    /// Linux kernel under Xen, replacing the default line.
    XenReplaceDefault,
    /// Recovery entries.
    Recovery,
}

impl CmdlineKey {
    pub const ALL: [CmdlineKey; 5] = [
        CmdlineKey::LinuxDefault,
        CmdlineKey::Linux,
        CmdlineKey::XenDefault,
        CmdlineKey::XenReplaceDefault,
        CmdlineKey::Recovery,
    ];

    /// Variable name in `/etc/default/grub`.
    pub fn key(self) -> &'static str {
        match self {
            CmdlineKey::LinuxDefault => "GRUB_CMDLINE_LINUX_DEFAULT",
            CmdlineKey::Linux => "GRUB_CMDLINE_LINUX",
            CmdlineKey::XenDefault => "GRUB_CMDLINE_XEN_DEFAULT",
            CmdlineKey::XenReplaceDefault => "GRUB_CMDLINE_LINUX_XEN_REPLACE_DEFAULT",
            CmdlineKey::Recovery => "GRUB_CMDLINE_LINUX_RECOVERY",
        }
    }
}

impl fmt::Display for CmdlineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A kernel command line bound to the variable it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelParams {
    key: CmdlineKey,
    tree: ParamTree,
}

impl KernelParams {
    pub fn new(line: Option<&str>, key: CmdlineKey) -> Self {
        Self {
            key,
            tree: ParamTree::new(line),
        }
    }

    pub fn key(&self) -> CmdlineKey {
        self.key
    }

    pub fn tree(&self) -> &ParamTree {
        &self.tree
    }

    /// Value(s) of `key`.
    ///
    /// # Example
    /// ```
    /// use grub2cfg::grub2::{CmdlineKey, KernelParams, Parameter};
    ///
    /// let params = KernelParams::new(
    ///     Some("quiet console=S0 console=S1 vga=0x400"),
    ///     CmdlineKey::LinuxDefault,
    /// );
    /// assert_eq!(params.parameter("quiet"), Parameter::Flag);
    /// assert_eq!(params.parameter("verbose"), Parameter::Missing);
    /// assert_eq!(params.parameter("vga"), Parameter::Value("0x400".into()));
    /// ```
    pub fn parameter(&self, key: &str) -> Parameter {
        self.tree.parameter(key)
    }

    /// Add a parameter. Use [`Placer::Replace`] to change an existing value.
    pub fn add_parameter(&mut self, key: &str, value: impl Into<ParamValue>, placer: &Placer) {
        self.tree.add_parameter(key, value, placer);
    }

    pub fn remove_parameter(&mut self, matcher: &Matcher) -> usize {
        self.tree.remove_parameter(matcher)
    }

    pub fn serialize(&self) -> String {
        self.tree.serialize()
    }

    /// Re-read from `line`, discarding pending edits.
    pub fn replace(&mut self, line: Option<&str>) {
        self.tree.replace(line);
    }

    pub fn is_empty(&self) -> bool {
        self.serialize().is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.tree.is_modified()
    }
}
