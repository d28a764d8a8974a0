//! Record selection predicates.
//!
//! A [`Matcher`] is a stateless predicate over a key and an optional value.
//! It is used to pick records for removal and as the anchor of the
//! positional [`Placer`](super::placer::Placer) variants.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// View of a tombstone-tagged record that matchers and placers operate on.
///
/// A record whose value is a bare flag (no `=value` part) reports `None`
/// from [`Record::value`].
pub trait Record {
    fn key(&self) -> &str;
    fn value(&self) -> Option<&str>;
    fn is_removed(&self) -> bool;
    fn mark_removed(&mut self);
}

/// Criterion applied to the value half of a record.
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    /// Value equals the given string exactly.
    Exact(String),
    /// Value matches the regular expression.
    Pattern(Regex),
    /// Record is a bare flag without a value.
    Flag,
}

impl ValueMatcher {
    fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (ValueMatcher::Exact(expected), Some(v)) => expected == v,
            (ValueMatcher::Pattern(re), Some(v)) => re.is_match(v),
            (ValueMatcher::Flag, None) => true,
            _ => false,
        }
    }
}

type Predicate = Arc<dyn Fn(&str, Option<&str>) -> bool + Send + Sync>;

/// Predicate selecting records by key, value and/or a custom closure.
///
/// All criteria that are set must hold. A matcher without criteria
/// matches every record.
///
/// # Example
/// ```
/// use grub2cfg::cfa::Matcher;
///
/// let m = Matcher::key("console").with_value("ttyS0");
/// assert!(m.matches("console", Some("ttyS0")));
/// assert!(!m.matches("console", Some("tty0")));
/// ```
#[derive(Clone, Default)]
pub struct Matcher {
    key: Option<String>,
    value: Option<ValueMatcher>,
    predicate: Option<Predicate>,
}

impl Matcher {
    /// Matcher accepting every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matcher on an exact key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Matcher driven by a custom predicate over `(key, value)`.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Arc::new(predicate)),
            ..Self::default()
        }
    }

    /// Additionally require the value to equal `value`.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(ValueMatcher::Exact(value.into()));
        self
    }

    /// Additionally require the value to match `pattern`.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.value = Some(ValueMatcher::Pattern(pattern));
        self
    }

    /// Additionally require the record to be a bare flag.
    pub fn flag_only(mut self) -> Self {
        self.value = Some(ValueMatcher::Flag);
        self
    }

    /// Build a matcher from a `KEY` or `KEY=VALUE` selector.
    ///
    /// `KEY` matches every record with that key; `KEY=VALUE` also pins the
    /// value. The split happens on the first `=` only.
    pub fn from_selector(selector: &str) -> Self {
        match selector.split_once('=') {
            Some((key, value)) => Self::key(key).with_value(value),
            None => Self::key(selector),
        }
    }

    /// Test a raw key/value pair.
    pub fn matches(&self, key: &str, value: Option<&str>) -> bool {
        if let Some(expected) = &self.key {
            if expected != key {
                return false;
            }
        }
        if let Some(value_matcher) = &self.value {
            if !value_matcher.matches(value) {
                return false;
            }
        }
        match &self.predicate {
            Some(predicate) => predicate(key, value),
            None => true,
        }
    }

    /// Test a record. Removed records never match.
    pub fn matches_record<R: Record>(&self, record: &R) -> bool {
        !record.is_removed() && self.matches(record.key(), record.value())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
