//! Named status lines shown above the item list.
//!
//! Keys are never displayed; they only let callers update or remove a line
//! they own.  Display order is insertion order.

use std::collections::HashMap;

/// Insertion-ordered key → value lines.
///
/// `order` and `values` always hold the same set of keys.
#[derive(Debug, Default)]
pub struct StatusLines {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl StatusLines {
    /// Set, update, or remove (`value == ""`) the line named `key`.
    ///
    /// Updating keeps the line's position.  A blank key is ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }

        let value = value.into();
        if value.is_empty() {
            if self.values.remove(key).is_some() {
                self.order.retain(|k| k != key);
            }
            return;
        }

        match self.values.get_mut(key) {
            Some(existing) => *existing = value,
            None => {
                self.order.push(key.to_owned());
                self.values.insert(key.to_owned(), value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key.trim()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Values in display order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|key| self.values.get(key).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_position() {
        let mut status = StatusLines::default();
        status.set("a", "first");
        status.set("b", "second");
        status.set("a", "changed");

        assert_eq!(status.values().collect::<Vec<_>>(), ["changed", "second"]);
    }

    #[test]
    fn empty_value_removes_line_and_order_slot() {
        let mut status = StatusLines::default();
        status.set("a", "one");
        status.set("b", "two");
        status.set("c", "three");

        status.set("b", "");

        assert_eq!(status.values().count(), 2);
        assert_eq!(status.get("b"), None);
        assert_eq!(status.values().collect::<Vec<_>>(), ["one", "three"]);

        // Re-adding appends at the end.
        status.set("b", "back");
        assert_eq!(status.values().collect::<Vec<_>>(), ["one", "three", "back"]);
    }

    #[test]
    fn blank_key_is_ignored_and_key_is_trimmed() {
        let mut status = StatusLines::default();
        status.set("   ", "ignored");
        assert!(status.is_empty());

        status.set("  sel ", "value");
        assert_eq!(status.get("sel"), Some("value"));
        assert_eq!(status.values().count(), 1);
    }

    #[test]
    fn removing_unknown_key_is_a_no_op() {
        let mut status = StatusLines::default();
        status.set("a", "one");
        status.set("zzz", "");
        assert_eq!(status.values().count(), 1);
    }

    #[test]
    fn repeated_identical_set_is_idempotent() {
        let mut status = StatusLines::default();
        status.set("a", "one");
        status.set("a", "one");
        assert_eq!(status.values().count(), 1);
        assert_eq!(status.values().collect::<Vec<_>>(), ["one"]);
    }
}
