//! Comment- and order-preserving key/value file model.
//!
//! Handles the two flat formats GRUB2 keeps next to its generated menu:
//!
//! - [`Syntax::Shell`]: sysconfig style `KEY=value` assignments as found in
//!   `/etc/default/grub`, with optional single or double quotes and an
//!   optional trailing `# comment`.
//! - [`Syntax::Spaced`]: `key<whitespace>value` pairs as found in
//!   `/boot/grub2/device.map`.
//!
//! Lines that are not touched serialize byte-for-byte, so hand-written
//! comments and layout survive an edit.

use anyhow::Result;

use super::base_model::Parser;
use super::matcher::Matcher;

/// Line syntax of a key/value file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `KEY=value`
    Shell,
    /// `key value`
    Spaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    key: String,
    value: String,
    quote: Quote,
    indent: String,
    separator: String,
    trailing: String,
    /// Original text, dropped once the assignment is modified.
    raw: Option<String>,
}

impl Assignment {
    fn new(syntax: Syntax, key: &str, value: &str) -> Self {
        let (separator, quote) = match syntax {
            Syntax::Shell => ("=", Quote::Double),
            Syntax::Spaced => ("\t", Quote::None),
        };
        Self {
            key: key.to_string(),
            value: value.to_string(),
            quote,
            indent: String::new(),
            separator: separator.to_string(),
            trailing: String::new(),
            raw: None,
        }
    }

    fn set_value(&mut self, syntax: Syntax, value: &str) {
        if syntax == Syntax::Shell {
            self.quote = match self.quote {
                Quote::None if needs_quoting(value) => Quote::Double,
                Quote::Single if value.contains('\'') => Quote::Double,
                other => other,
            };
        }
        self.value = value.to_string();
        self.raw = None;
    }

    fn render(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let value = match self.quote {
            Quote::None => self.value.clone(),
            Quote::Single => format!("'{}'", self.value),
            Quote::Double => format!("\"{}\"", escape_double(&self.value)),
        };
        format!(
            "{}{}{}{}{}",
            self.indent, self.key, self.separator, value, self.trailing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Assignment(Assignment),
    Comment(String),
    /// Blank or unparsable line, kept verbatim.
    Other(String),
}

/// Parsed key/value file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueTree {
    syntax: Syntax,
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl KeyValueTree {
    /// Empty file of the given syntax.
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            lines: Vec::new(),
            trailing_newline: true,
        }
    }

    /// Parse file content.
    pub fn parse(syntax: Syntax, content: &str) -> Self {
        Self {
            syntax,
            lines: content.lines().map(|l| parse_line(syntax, l)).collect(),
            trailing_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// Render the file back to text.
    pub fn serialize(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Assignment(a) => a.render(),
                Line::Comment(raw) | Line::Other(raw) => raw.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Value of the last assignment of `key`, with surrounding quotes removed.
    pub fn value_for(&self, key: &str) -> Option<String> {
        self.assignments()
            .filter(|a| a.key == key)
            .last()
            .map(|a| a.value.clone())
    }

    /// Set `key` to `value`.
    ///
    /// Modifies the last existing assignment, else uncomments the first
    /// commented-out assignment of the key, else appends a new line.
    pub fn generic_set(&mut self, key: &str, value: &str) {
        let syntax = self.syntax;

        let existing = self.lines.iter_mut().rev().find_map(|line| match line {
            Line::Assignment(a) if a.key == key => Some(a),
            _ => None,
        });
        if let Some(assignment) = existing {
            assignment.set_value(syntax, value);
            return;
        }

        let commented = self.lines.iter().position(|line| match line {
            Line::Comment(raw) => is_commented_assignment(syntax, raw, key),
            _ => false,
        });
        let assignment = Line::Assignment(Assignment::new(syntax, key, value));
        match commented {
            Some(idx) => self.lines[idx] = assignment,
            None => self.lines.push(assignment),
        }
    }

    /// Remove every assignment of `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !matches!(line, Line::Assignment(a) if a.key == key));
        self.lines.len() != before
    }

    /// Assigned `(key, value)` pairs accepted by `matcher`, in file order.
    pub fn select(&self, matcher: &Matcher) -> Vec<(String, String)> {
        self.assignments()
            .filter(|a| matcher.matches(&a.key, Some(&a.value)))
            .map(|a| (a.key.clone(), a.value.clone()))
            .collect()
    }

    /// Assigned keys in file order.
    pub fn keys(&self) -> Vec<&str> {
        self.assignments().map(|a| a.key.as_str()).collect()
    }

    fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.lines.iter().filter_map(|line| match line {
            Line::Assignment(a) => Some(a),
            _ => None,
        })
    }
}

/// [`Parser`] producing a [`KeyValueTree`].
#[derive(Debug, Clone, Copy)]
pub struct KeyValueParser {
    pub syntax: Syntax,
}

impl KeyValueParser {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }
}

impl Parser for KeyValueParser {
    type Data = KeyValueTree;

    fn parse(&self, content: &str) -> Result<KeyValueTree> {
        Ok(KeyValueTree::parse(self.syntax, content))
    }

    fn serialize(&self, data: &KeyValueTree) -> Result<String> {
        Ok(data.serialize())
    }

    fn empty(&self) -> KeyValueTree {
        KeyValueTree::new(self.syntax)
    }
}

fn parse_line(syntax: Syntax, raw: &str) -> Line {
    let trimmed = raw.trim_start();
    let indent = &raw[..raw.len() - trimmed.len()];

    if trimmed.is_empty() {
        return Line::Other(raw.to_string());
    }
    if trimmed.starts_with('#') {
        return Line::Comment(raw.to_string());
    }

    let parsed = match syntax {
        Syntax::Shell => parse_shell(trimmed),
        Syntax::Spaced => parse_spaced(trimmed),
    };
    match parsed {
        Some(mut assignment) => {
            assignment.indent = indent.to_string();
            assignment.raw = Some(raw.to_string());
            Line::Assignment(assignment)
        }
        None => Line::Other(raw.to_string()),
    }
}

fn parse_shell(text: &str) -> Option<Assignment> {
    let (key, rest) = text.split_once('=')?;
    if !is_shell_key(key) {
        return None;
    }
    let (value, quote, trailing) = split_value(rest);
    let value = match quote {
        Quote::Double => unescape_double(value),
        _ => value.to_string(),
    };
    Some(Assignment {
        key: key.to_string(),
        value,
        quote,
        indent: String::new(),
        separator: "=".to_string(),
        trailing: trailing.to_string(),
        raw: None,
    })
}

fn parse_spaced(text: &str) -> Option<Assignment> {
    let key_end = text.find(char::is_whitespace)?;
    let (key, rest) = text.split_at(key_end);
    let value_start = rest.len() - rest.trim_start().len();
    let (separator, rest) = rest.split_at(value_start);
    if rest.is_empty() {
        return None;
    }
    let value_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (value, trailing) = rest.split_at(value_end);
    Some(Assignment {
        key: key.to_string(),
        value: value.to_string(),
        quote: Quote::None,
        indent: String::new(),
        separator: separator.to_string(),
        trailing: trailing.to_string(),
        raw: None,
    })
}

/// Split an assignment right-hand side into value, quote style and the
/// text that follows the value.
fn split_value(rest: &str) -> (&str, Quote, &str) {
    if let Some(inner) = rest.strip_prefix('"') {
        let mut escaped = false;
        for (idx, c) in inner.char_indices() {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => return (&inner[..idx], Quote::Double, &inner[idx + 1..]),
                _ => escaped = false,
            }
        }
    } else if let Some(inner) = rest.strip_prefix('\'') {
        if let Some(idx) = inner.find('\'') {
            return (&inner[..idx], Quote::Single, &inner[idx + 1..]);
        }
    }
    // Unquoted, or an unterminated quote: value runs to the first blank.
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (&rest[..end], Quote::None, &rest[end..])
}

/// Escape `"` and the backslashes that would otherwise be read as an
/// escape. Other backslashes (`\$`, `\n`) are left alone so `$VAR`
/// expansion and existing escapes keep their meaning.
fn escape_double(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' if matches!(chars.peek(), None | Some('"') | Some('\\')) => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape_double`]: only `\"` and `\\` are collapsed.
fn unescape_double(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '"' || next == '\\' => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_shell_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_commented_assignment(syntax: Syntax, raw: &str, key: &str) -> bool {
    let body = raw.trim_start().trim_start_matches('#').trim_start();
    match syntax {
        Syntax::Shell => body
            .strip_prefix(key)
            .is_some_and(|rest| rest.starts_with('=')),
        Syntax::Spaced => body.split_whitespace().next() == Some(key),
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || "\"'$`\\;&|<>()#*?".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(content: &str) -> KeyValueTree {
        KeyValueTree::parse(Syntax::Shell, content)
    }

    #[test]
    fn test_untouched_file_is_byte_identical() {
        let content = "# GRUB defaults\n\nGRUB_TIMEOUT=8\n  GRUB_DISTRIBUTOR='SLES'  # vendor\nGRUB_CMDLINE_LINUX_DEFAULT=\"quiet splash\" # comment\nnot an assignment\n";
        assert_eq!(shell(content).serialize(), content);
    }

    #[test]
    fn test_missing_trailing_newline_is_kept() {
        let content = "GRUB_TIMEOUT=8";
        assert_eq!(shell(content).serialize(), content);
    }

    #[test]
    fn test_value_for_unwraps_quotes() {
        let tree = shell("A=1\nB=\"two words\"\nC='single'\nD=\"\"\n");
        assert_eq!(tree.value_for("A").as_deref(), Some("1"));
        assert_eq!(tree.value_for("B").as_deref(), Some("two words"));
        assert_eq!(tree.value_for("C").as_deref(), Some("single"));
        assert_eq!(tree.value_for("D").as_deref(), Some(""));
        assert_eq!(tree.value_for("E"), None);
    }

    #[test]
    fn test_last_assignment_wins() {
        let tree = shell("GRUB_TIMEOUT=5\nGRUB_TIMEOUT=10\n");
        assert_eq!(tree.value_for("GRUB_TIMEOUT").as_deref(), Some("10"));
    }

    #[test]
    fn test_set_existing_keeps_style() {
        let mut tree = shell("GRUB_ENABLE_CRYPTODISK=false\n");
        tree.generic_set("GRUB_ENABLE_CRYPTODISK", "true");
        assert_eq!(tree.serialize(), "GRUB_ENABLE_CRYPTODISK=true\n");
    }

    #[test]
    fn test_set_existing_unquoted_gains_quotes_when_needed() {
        let mut tree = shell("GRUB_TERMINAL=console\n");
        tree.generic_set("GRUB_TERMINAL", "serial console");
        assert_eq!(tree.serialize(), "GRUB_TERMINAL=\"serial console\"\n");
    }

    #[test]
    fn test_set_keeps_trailing_comment() {
        let mut tree = shell("GRUB_CMDLINE_LINUX_DEFAULT=\"quiet\" # comment 1\n");
        tree.generic_set("GRUB_CMDLINE_LINUX_DEFAULT", "quiet splash");
        assert_eq!(
            tree.serialize(),
            "GRUB_CMDLINE_LINUX_DEFAULT=\"quiet splash\" # comment 1\n"
        );
    }

    #[test]
    fn test_set_uncomments() {
        let mut tree = shell("#bla bla\n#GRUB_ENABLE_CRYPTODISK=false\n");
        tree.generic_set("GRUB_ENABLE_CRYPTODISK", "true");
        assert_eq!(tree.serialize(), "#bla bla\nGRUB_ENABLE_CRYPTODISK=\"true\"\n");
    }

    #[test]
    fn test_set_does_not_uncomment_prefix_key() {
        let mut tree = shell("#GRUB_TIMEOUT_STYLE=hidden\n");
        tree.generic_set("GRUB_TIMEOUT", "3");
        assert_eq!(
            tree.serialize(),
            "#GRUB_TIMEOUT_STYLE=hidden\nGRUB_TIMEOUT=\"3\"\n"
        );
    }

    #[test]
    fn test_set_appends_to_empty_file() {
        let mut tree = shell("");
        tree.generic_set("GRUB_ENABLE_CRYPTODISK", "true");
        assert_eq!(tree.serialize(), "GRUB_ENABLE_CRYPTODISK=\"true\"\n");
    }

    #[test]
    fn test_delete() {
        let mut tree = shell("A=1\nB=2\nA=3\n");
        assert!(tree.delete("A"));
        assert!(!tree.delete("A"));
        assert_eq!(tree.serialize(), "B=2\n");
    }

    #[test]
    fn test_spaced_syntax() {
        let content = "# device map\n(hd0)\t/dev/sda\n(hd1)   /dev/disk/by-id/ata-XYZ\n";
        let mut tree = KeyValueTree::parse(Syntax::Spaced, content);
        assert_eq!(tree.serialize(), content);
        assert_eq!(tree.value_for("(hd1)").as_deref(), Some("/dev/disk/by-id/ata-XYZ"));
        assert_eq!(tree.keys(), vec!["(hd0)", "(hd1)"]);

        tree.generic_set("(hd1)", "/dev/sdb");
        tree.generic_set("(hd2)", "/dev/sdc");
        assert_eq!(
            tree.serialize(),
            "# device map\n(hd0)\t/dev/sda\n(hd1)   /dev/sdb\n(hd2)\t/dev/sdc\n"
        );
    }

    #[test]
    fn test_select() {
        let tree = KeyValueTree::parse(Syntax::Spaced, "(hd0) /dev/sda\n(hd1) /dev/sdb\n");
        let found = tree.select(&Matcher::any().with_value("/dev/sdb"));
        assert_eq!(found, vec![("(hd1)".to_string(), "/dev/sdb".to_string())]);
    }

    #[test]
    fn test_double_quotes_in_value_are_escaped() {
        let mut tree = shell("GRUB_CMDLINE_LINUX_DEFAULT=\"quiet\"\n");
        tree.generic_set("GRUB_CMDLINE_LINUX_DEFAULT", "quiet foo=\"a b\"");
        let text = tree.serialize();
        assert_eq!(text, "GRUB_CMDLINE_LINUX_DEFAULT=\"quiet foo=\\\"a b\\\"\"\n");

        let reread = shell(&text);
        assert_eq!(
            reread.value_for("GRUB_CMDLINE_LINUX_DEFAULT").as_deref(),
            Some("quiet foo=\"a b\"")
        );
    }

    #[test]
    fn test_backslashes_survive_rewrite() {
        for value in ["a\\", "a\\\"b", "\\\\x", "keep \\$HOME"] {
            let mut tree = shell("");
            tree.generic_set("GRUB_X", value);
            let reread = shell(&tree.serialize());
            assert_eq!(reread.value_for("GRUB_X").as_deref(), Some(value), "value: {}", value);
        }
    }

    #[test]
    fn test_variable_expansion_is_not_escaped() {
        let mut tree = shell("");
        tree.generic_set("GRUB_CMDLINE_LINUX", "$GRUB_CMDLINE_LINUX quiet");
        assert_eq!(tree.serialize(), "GRUB_CMDLINE_LINUX=\"$GRUB_CMDLINE_LINUX quiet\"\n");
    }
}
