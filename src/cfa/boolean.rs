//! Boolean view over a string-valued key.

use super::key_value::KeyValueTree;

/// Handle mapping a key's string value onto a boolean.
///
/// Many GRUB keys are phrased negatively (`GRUB_DISABLE_OS_PROBER`), so
/// the strings representing "enabled" and "disabled" are configurable.
#[derive(Debug)]
pub struct BooleanValue<'a> {
    key: &'a str,
    true_value: &'a str,
    false_value: &'a str,
    tree: &'a mut KeyValueTree,
}

impl<'a> BooleanValue<'a> {
    pub fn new(
        key: &'a str,
        tree: &'a mut KeyValueTree,
        true_value: &'a str,
        false_value: &'a str,
    ) -> Self {
        Self {
            key,
            true_value,
            false_value,
            tree,
        }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    pub fn enabled(&self) -> bool {
        self.tree.value_for(self.key).as_deref() == Some(self.true_value)
    }

    pub fn disabled(&self) -> bool {
        self.tree.value_for(self.key).as_deref() == Some(self.false_value)
    }

    /// True if the key holds one of the two recognized values.
    pub fn defined(&self) -> bool {
        self.enabled() || self.disabled()
    }

    /// `Some(state)` when defined, `None` otherwise.
    pub fn state(&self) -> Option<bool> {
        if self.enabled() {
            Some(true)
        } else if self.disabled() {
            Some(false)
        } else {
            None
        }
    }

    pub fn enable(&mut self) {
        self.set(true);
    }

    pub fn disable(&mut self) {
        self.set(false);
    }

    pub fn set(&mut self, enabled: bool) {
        let value = if enabled {
            self.true_value
        } else {
            self.false_value
        };
        self.tree.generic_set(self.key, value);
    }
}
