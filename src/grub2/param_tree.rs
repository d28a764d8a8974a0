//! Kernel command line as an editable, order-preserving record list.
//!
//! A command line such as `quiet console=ttyS0 console=tty0 vga=0x400` is
//! split into records on whitespace, and each token is split on its
//! first `=` only, so `root=UUID=1234` keeps `UUID=1234` as the value.
//!
//! Edits never physically delete records. Removal tags a record as
//! [`Operation::Remove`] and every read accessor filters those out, so
//! positions stay stable for the whole edit session.

use std::fmt;

use crate::cfa::{Matcher, Placer, Record};

/// Value half of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Token without `=value` (present, boolean true).
    Flag,
    /// Token with an explicit value, possibly empty (`key=`).
    Value(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Flag => None,
            ParamValue::Value(v) => Some(v),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ParamValue::Flag)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Value(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Value(value)
    }
}

/// Edit state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Parsed from the original line and untouched.
    Keep,
    /// Inserted during this edit session.
    Add,
    /// Tombstone: hidden from every read accessor.
    Remove,
}

/// One `key` / `key=value` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    key: String,
    value: ParamValue,
    operation: Operation,
}

impl ParameterRecord {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    fn render(&self) -> String {
        match &self.value {
            ParamValue::Flag => self.key.clone(),
            ParamValue::Value(v) => format!("{}={}", self.key, v),
        }
    }
}

impl Record for ParameterRecord {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> Option<&str> {
        self.value.as_str()
    }

    fn is_removed(&self) -> bool {
        self.operation == Operation::Remove
    }

    fn mark_removed(&mut self) {
        self.operation = Operation::Remove;
    }
}

/// Result of looking a key up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// No record with the key.
    Missing,
    /// Exactly one record, a bare flag.
    Flag,
    /// Exactly one record with a value.
    Value(String),
    /// More than one record; every value in order.
    Multiple(Vec<ParamValue>),
}

impl Parameter {
    pub fn is_present(&self) -> bool {
        !matches!(self, Parameter::Missing)
    }
}

/// Split a single command line token on its first `=`.
pub fn split_token(token: &str) -> (&str, ParamValue) {
    match token.split_once('=') {
        Some((key, value)) => (key, ParamValue::from(value)),
        None => (token, ParamValue::Flag),
    }
}

/// Parsed kernel command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTree {
    records: Vec<ParameterRecord>,
}

impl ParamTree {
    /// Parse a command line. `None` or an empty line gives an empty tree.
    pub fn new(line: Option<&str>) -> Self {
        let records = line
            .unwrap_or_default()
            .split_whitespace()
            .map(|token| {
                let (key, value) = split_token(token);
                ParameterRecord {
                    key: key.to_string(),
                    value,
                    operation: Operation::Keep,
                }
            })
            .collect();
        Self { records }
    }

    pub fn parse(line: &str) -> Self {
        Self::new(Some(line))
    }

    /// Live (non-removed) records in order.
    pub fn data(&self) -> impl Iterator<Item = &ParameterRecord> {
        self.records.iter().filter(|r| !r.is_removed())
    }

    /// Every record including tombstones.
    pub fn all_data(&self) -> &[ParameterRecord] {
        &self.records
    }

    /// Look up `key` among live records.
    pub fn parameter(&self, key: &str) -> Parameter {
        let mut values: Vec<ParamValue> = self
            .data()
            .filter(|r| r.key == key)
            .map(|r| r.value.clone())
            .collect();

        match values.len() {
            0 => Parameter::Missing,
            1 => match values.remove(0) {
                ParamValue::Flag => Parameter::Flag,
                ParamValue::Value(v) => Parameter::Value(v),
            },
            _ => Parameter::Multiple(values),
        }
    }

    /// Insert a new record at the position chosen by `placer`.
    pub fn add_parameter(&mut self, key: &str, value: impl Into<ParamValue>, placer: &Placer) {
        let idx = placer.insertion_index(&mut self.records);
        self.records.insert(
            idx,
            ParameterRecord {
                key: key.to_string(),
                value: value.into(),
                operation: Operation::Add,
            },
        );
    }

    /// Append a new record at the end.
    pub fn push_parameter(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.add_parameter(key, value, &Placer::Append);
    }

    /// Tombstone every live record accepted by `matcher`.
    ///
    /// Returns how many records were newly removed; a repeated call with
    /// the same matcher removes nothing.
    pub fn remove_parameter(&mut self, matcher: &Matcher) -> usize {
        let mut removed = 0;
        for record in self.records.iter_mut() {
            if matcher.matches_record(&*record) {
                record.mark_removed();
                removed += 1;
            }
        }
        removed
    }

    /// Render live records as a space separated command line.
    ///
    /// A record that renders to nothing (a flag with an empty key) is skipped.
    pub fn serialize(&self) -> String {
        self.data()
            .map(ParameterRecord::render)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Drop all records and edit history and re-parse from `line`.
    pub fn replace(&mut self, line: Option<&str>) {
        *self = Self::new(line);
    }

    /// True when [`ParamTree::serialize`] would return an empty line.
    pub fn is_empty(&self) -> bool {
        self.data().all(|r| r.render().is_empty())
    }

    /// True if any record was added or removed since parsing.
    pub fn is_modified(&self) -> bool {
        self.records.iter().any(|r| r.operation != Operation::Keep)
    }
}

impl fmt::Display for ParamTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "quiet console=S0 console=S1 vga=0x400";

    #[test]
    fn test_roundtrip() {
        assert_eq!(ParamTree::parse(LINE).serialize(), LINE);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let tree = ParamTree::parse("  quiet\t\tsplash=silent \n ");
        assert_eq!(tree.serialize(), "quiet splash=silent");
    }

    #[test]
    fn test_absent_and_empty_lines() {
        assert!(ParamTree::new(None).is_empty());
        assert!(ParamTree::parse("").is_empty());
        assert!(ParamTree::parse("   ").is_empty());
        assert_eq!(ParamTree::new(None).serialize(), "");
    }

    #[test]
    fn test_first_equals_split() {
        let tree = ParamTree::parse("root=UUID=1234-abcd");
        assert_eq!(tree.parameter("root"), Parameter::Value("UUID=1234-abcd".into()));
        assert_eq!(tree.serialize(), "root=UUID=1234-abcd");
    }

    #[test]
    fn test_flag_differs_from_empty_value() {
        let tree = ParamTree::parse("rd.break rd.shell=");
        assert_eq!(tree.parameter("rd.break"), Parameter::Flag);
        assert_eq!(tree.parameter("rd.shell"), Parameter::Value(String::new()));
        assert_eq!(tree.serialize(), "rd.break rd.shell=");
    }

    #[test]
    fn test_parameter_aggregation() {
        let tree = ParamTree::parse(LINE);
        assert_eq!(tree.parameter("quiet"), Parameter::Flag);
        assert_eq!(tree.parameter("verbose"), Parameter::Missing);
        assert_eq!(tree.parameter("vga"), Parameter::Value("0x400".into()));
        assert_eq!(
            tree.parameter("console"),
            Parameter::Multiple(vec!["S0".into(), "S1".into()])
        );
    }

    #[test]
    fn test_multiple_keeps_flags() {
        let tree = ParamTree::parse("splash splash=silent");
        assert_eq!(
            tree.parameter("splash"),
            Parameter::Multiple(vec![ParamValue::Flag, "silent".into()])
        );
    }

    #[test]
    fn test_placement_sequence() {
        let mut tree = ParamTree::parse(LINE);

        tree.add_parameter("verbose", ParamValue::Flag, &Placer::After(Matcher::key("quiet")));
        tree.push_parameter("silent", ParamValue::Flag);
        tree.add_parameter(
            "console",
            "S2",
            &Placer::Replace(Matcher::key("console").with_value("S1")),
        );
        tree.remove_parameter(&Matcher::key("vga"));

        assert_eq!(tree.serialize(), "quiet verbose console=S0 console=S2 silent");
    }

    #[test]
    fn test_before_placer() {
        let mut tree = ParamTree::parse("root=/dev/sda2 quiet");
        tree.add_parameter("ro", ParamValue::Flag, &Placer::Before(Matcher::key("quiet")));
        assert_eq!(tree.serialize(), "root=/dev/sda2 ro quiet");
    }

    #[test]
    fn test_positional_placer_without_match_appends() {
        let mut tree = ParamTree::parse("quiet");
        tree.add_parameter("a", "1", &Placer::Before(Matcher::key("missing")));
        tree.add_parameter("b", "2", &Placer::After(Matcher::key("missing")));
        tree.add_parameter("c", "3", &Placer::Replace(Matcher::key("missing")));
        assert_eq!(tree.serialize(), "quiet a=1 b=2 c=3");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut tree = ParamTree::parse("a=1 b=2 c=3");
        tree.add_parameter("b", "9", &Placer::Replace(Matcher::key("b")));
        assert_eq!(tree.serialize(), "a=1 b=9 c=3");
        assert_eq!(tree.all_data().len(), 4);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut once = ParamTree::parse(LINE);
        once.remove_parameter(&Matcher::key("console"));

        let mut twice = ParamTree::parse(LINE);
        assert_eq!(twice.remove_parameter(&Matcher::key("console")), 2);
        assert_eq!(twice.remove_parameter(&Matcher::key("console")), 0);

        assert_eq!(once.serialize(), twice.serialize());
        assert_eq!(twice.serialize(), "quiet vga=0x400");
    }

    #[test]
    fn test_tombstones_hidden_from_readers() {
        let mut tree = ParamTree::parse(LINE);
        tree.remove_parameter(&Matcher::key("vga"));
        assert_eq!(tree.parameter("vga"), Parameter::Missing);
        assert!(tree.data().all(|r| r.key() != "vga"));
        assert_eq!(
            tree.all_data()
                .iter()
                .filter(|r| r.operation() == Operation::Remove)
                .count(),
            1
        );
    }

    #[test]
    fn test_empty_key_flag_renders_nothing() {
        let mut tree = ParamTree::new(None);
        tree.push_parameter("", ParamValue::Flag);
        assert_eq!(tree.serialize(), "");
        assert!(tree.is_empty());

        tree.push_parameter("", ParamValue::Flag);
        tree.push_parameter("quiet", ParamValue::Flag);
        assert_eq!(tree.serialize(), "quiet");
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_replace_resets_history() {
        let mut tree = ParamTree::parse(LINE);
        tree.remove_parameter(&Matcher::any());
        assert!(tree.is_empty());
        assert!(tree.is_modified());

        tree.replace(Some("splash=silent"));
        assert!(!tree.is_modified());
        assert_eq!(tree.all_data().len(), 1);
        assert_eq!(tree.to_string(), "splash=silent");

        tree.replace(None);
        assert!(tree.is_empty());
    }
}
