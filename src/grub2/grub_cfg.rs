//! Boot menu reconstruction from the generated `grub.cfg`.
//!
//! `grub.cfg` is produced by `grub2-mkconfig` and is never edited by hand,
//! so this model is read-only. Only three kinds of lines carry structure:
//!
//! ```text
//! menuentry 'openSUSE Leap 42.1' --class opensuse ... {   <- boot entry
//! submenu 'Advanced options for openSUSE Leap 42.1' ... { <- nesting
//! }                                                       <- block closer
//! ```
//!
//! Everything else is opaque. A single forward pass with an explicit
//! stack of open blocks recovers the full submenu path of every entry,
//! which is the form `grub2-set-default` expects (`Submenu>Entry`).
//!
//! Some generators add hint-only entries that cannot be booted, e.g. the
//! "Start bootloader from a read-only snapshot" notice on SUSE. They are
//! recognized by their double quote delimiters, while real entries use
//! single quotes, and are left out of the result.

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cfa::{BaseModel, FileHandler, Parser};

/// Default location of the generated menu.
pub const GRUB_CFG_PATH: &str = "/boot/grub2/grub.cfg";

/// Separator between submenu titles in a boot entry path.
pub const PATH_SEPARATOR: &str = ">";

/// One selectable item of the boot menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootEntry {
    title: String,
    path: String,
}

impl BootEntry {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Title as shown on screen.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ancestor submenu titles and the title, joined with `>`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Open block during a parse pass.
#[derive(Debug)]
enum Frame {
    Submenu(String),
    /// Menu entry body or a submenu we do not track by name.
    Anonymous,
}

/// Line scanner turning `grub.cfg` text into [`BootEntry`] values.
#[derive(Debug, Clone)]
pub struct MenuParser {
    entry_re: Regex,
    any_entry_re: Regex,
    submenu_re: Regex,
    any_submenu_re: Regex,
    closer_re: Regex,
}

impl MenuParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entry_re: Regex::new(r"^\s*menuentry\s+'([^']+)'")?,
            any_entry_re: Regex::new(r"^\s*menuentry\s")?,
            submenu_re: Regex::new(r"^\s*submenu\s+'([^']+)'")?,
            any_submenu_re: Regex::new(r"^\s*submenu\s")?,
            closer_re: Regex::new(r"^\s*\}\s*$")?,
        })
    }

    /// Bootable entries in menu order, each with its full submenu path.
    pub fn parse_entries(&self, text: &str) -> Vec<BootEntry> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut entries = Vec::new();

        for line in text.lines() {
            if let Some(caps) = self.entry_re.captures(line) {
                let title = &caps[1];
                let mut path: Vec<&str> = stack
                    .iter()
                    .filter_map(|frame| match frame {
                        Frame::Submenu(name) => Some(name.as_str()),
                        Frame::Anonymous => None,
                    })
                    .collect();
                path.push(title);
                entries.push(BootEntry::new(title, path.join(PATH_SEPARATOR)));
                if opens_block(line) {
                    stack.push(Frame::Anonymous);
                }
            } else if let Some(caps) = self.submenu_re.captures(line) {
                stack.push(Frame::Submenu(caps[1].to_string()));
            } else if self.closer_re.is_match(line) {
                stack.pop();
            } else if (self.any_entry_re.is_match(line) || self.any_submenu_re.is_match(line))
                && opens_block(line)
            {
                // Hint, untitled or unquoted entry: its `}` must not close the submenu.
                stack.push(Frame::Anonymous);
            }
        }

        if !stack.is_empty() {
            eprintln!(
                "  [WARN] grub.cfg ends with {} unclosed block(s), entries may have wrong paths",
                stack.len()
            );
        }

        entries
    }
}

impl Parser for MenuParser {
    type Data = Vec<BootEntry>;

    fn parse(&self, content: &str) -> Result<Vec<BootEntry>> {
        Ok(self.parse_entries(content))
    }

    fn serialize(&self, _data: &Vec<BootEntry>) -> Result<String> {
        bail!("Serializing grub.cfg is not supported, regenerate it with grub2-mkconfig")
    }

    fn empty(&self) -> Vec<BootEntry> {
        Vec::new()
    }
}

fn opens_block(line: &str) -> bool {
    line.trim_end().ends_with('{')
}

/// Titles only, in menu order.
pub fn sections(entries: &[BootEntry]) -> Vec<&str> {
    entries.iter().map(BootEntry::title).collect()
}

/// Read-only model of the generated boot menu.
pub struct GrubCfg {
    base: BaseModel<MenuParser>,
}

impl GrubCfg {
    pub fn new(handler: Arc<dyn FileHandler>) -> Result<Self> {
        Self::with_path(handler, GRUB_CFG_PATH)
    }

    pub fn with_path(handler: Arc<dyn FileHandler>, path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            base: BaseModel::new(MenuParser::new()?, path, handler),
        })
    }

    pub fn load(&mut self) -> Result<()> {
        self.base.load()
    }

    /// Always fails: the file belongs to `grub2-mkconfig`.
    pub fn save(&self) -> Result<()> {
        self.base.save()
    }

    /// Entry titles in order.
    ///
    /// Titles repeat across submenus; prefer [`GrubCfg::boot_entries`].
    pub fn sections(&self) -> Vec<&str> {
        sections(self.base.data())
    }

    /// Bootable entries with their full paths.
    pub fn boot_entries(&self) -> &[BootEntry] {
        self.base.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<BootEntry> {
        MenuParser::new().unwrap().parse_entries(text)
    }

    fn paths(entries: &[BootEntry]) -> Vec<&str> {
        entries.iter().map(BootEntry::path).collect()
    }

    #[test]
    fn test_flat_menu() {
        let text = "menuentry 'one' {\n}\nmenuentry 'two' {\n}\nmenuentry 'three' {\n}\nmenuentry 'four' {\n}\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 4);
        for entry in &entries {
            assert_eq!(entry.path(), entry.title());
        }
    }

    #[test]
    fn test_nested_menu() {
        let text = "\
submenu 'Advanced options for X' --id 'adv' {
\tmenuentry 'A' --class os {
\t\tlinux /vmlinuz
\t}
\tmenuentry 'B' --class os {
\t\tlinux /vmlinuz
\t}
}
menuentry 'halt' {
\thalt
}
";
        let entries = parse(text);
        assert_eq!(
            paths(&entries),
            vec![
                "Advanced options for X>A",
                "Advanced options for X>B",
                "halt"
            ]
        );
        assert_eq!(sections(&entries), vec!["A", "B", "halt"]);
    }

    #[test]
    fn test_entries_without_bodies() {
        let text = "submenu 'S' {\nmenuentry 'A'\nmenuentry 'B'\n}\nmenuentry 'halt'\n";
        assert_eq!(paths(&parse(text)), vec!["S>A", "S>B", "halt"]);
    }

    #[test]
    fn test_deeply_nested() {
        let text = "\
submenu 'L1' {
  submenu 'L2' {
    menuentry 'deep' {
    }
  }
  menuentry 'mid' {
  }
}
";
        assert_eq!(paths(&parse(text)), vec!["L1>L2>deep", "L1>mid"]);
    }

    #[test]
    fn test_hint_entries_are_filtered() {
        let text = "\
submenu 'Sub' {
  menuentry 'real one' {
  }
  menuentry \"Start bootloader from a read-only snapshot\" {
    true
  }
  menuentry 'real two' {
  }
}
";
        assert_eq!(paths(&parse(text)), vec!["Sub>real one", "Sub>real two"]);
    }

    #[test]
    fn test_untitled_and_unquoted_entries_keep_submenu_open() {
        let text = "\
submenu 'S' {
  menuentry '' {
  }
  menuentry Custom {
  }
  menuentry 'B' {
  }
}
menuentry 'after' {
}
";
        assert_eq!(paths(&parse(text)), vec!["S>B", "after"]);
    }

    #[test]
    fn test_unbalanced_closer_is_ignored() {
        let text = "}\nmenuentry 'a' {\n}\n}\n}\nmenuentry 'b' {\n}\n";
        assert_eq!(paths(&parse(text)), vec!["a", "b"]);
    }

    #[test]
    fn test_unclosed_submenu_at_eof() {
        let text = "submenu 'open' {\nmenuentry 'x' {\n}\n";
        assert_eq!(paths(&parse(text)), vec!["open>x"]);
    }

    #[test]
    fn test_title_is_first_quoted_run() {
        let text = "menuentry 'SLES 12-SP2, with Linux 4.4.21' --class sles --id 'gnulinux-x' {\n}\n";
        assert_eq!(parse(text)[0].title(), "SLES 12-SP2, with Linux 4.4.21");
    }

    #[test]
    fn test_serialize_always_fails() {
        let parser = MenuParser::new().unwrap();
        assert!(parser.serialize(&Vec::new()).is_err());
        let entries = parser.parse_entries("menuentry 'a' {\n}\n");
        let err = parser.serialize(&entries).unwrap_err();
        assert!(err.to_string().contains("grub2-mkconfig"));
    }

    #[test]
    fn test_entry_serializes_as_json() {
        let entry = BootEntry::new("halt", "halt");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"title":"halt","path":"halt"}"#);
    }
}
