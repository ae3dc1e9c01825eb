//! Atomic class entries and the per-class entry maps built from them

use indexmap::IndexMap;

/// One atomic rule, or an explicit unset marker for a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicClassEntry {
    /// `None` for unset markers
    pub class_name: Option<String>,
    pub property: String,
    /// Normalized value; fallback lists are joined with ", "
    pub value: String,
    /// Full pseudo suffix as composed, pseudo-element included (e.g. `::before:hover`)
    pub selector_suffix: Option<String>,
    pub pseudo_element: Option<String>,
    pub at_rule: Option<String>,
    pub ltr_css: String,
    pub rtl_css: Option<String>,
    pub priority: u32,
    pub is_null: bool,
}

impl AtomicClassEntry {
    /// Unset marker: contributes no class but defeats earlier values when merged
    pub fn null(property: impl Into<String>) -> Self {
        Self {
            class_name: None,
            property: property.into(),
            value: String::new(),
            selector_suffix: None,
            pseudo_element: None,
            at_rule: None,
            ltr_css: String::new(),
            rtl_css: None,
            priority: 0,
            is_null: true,
        }
    }

    /// Selector text after the class name, used for ordering
    pub fn selector(&self) -> &str {
        self.selector_suffix.as_deref().unwrap_or("")
    }
}

/// Condition-specific entries of one property, keyed by the composed
/// condition string (`"default"`, `":hover"`, `"@media (...):hover"`)
pub type ConditionalBundle = IndexMap<String, AtomicClassEntry>;

/// What a class defines for one canonical property key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSlot {
    Atomic(AtomicClassEntry),
    Bundle(ConditionalBundle),
}

impl StyleSlot {
    /// Every entry in the slot, in insertion order
    pub fn entries(&self) -> Box<dyn Iterator<Item = &AtomicClassEntry> + '_> {
        match self {
            StyleSlot::Atomic(entry) => Box::new(std::iter::once(entry)),
            StyleSlot::Bundle(bundle) => Box::new(bundle.values()),
        }
    }
}

/// Compiled class: canonical property key to slot, in declaration order
pub type ClassEntries = IndexMap<String, StyleSlot>;

/// Canonical key of a property, scoped by pseudo-element when present
/// (`color`, `color:::before`)
pub fn canonical_key(property: &str, pseudo_element: Option<&str>) -> String {
    match pseudo_element {
        Some(pseudo) => format!("{}:{}", property, pseudo),
        None => property.to_string(),
    }
}

/// Insert a slot, replacing an earlier one for the same key in place
pub(crate) fn insert_slot(entries: &mut ClassEntries, key: String, slot: StyleSlot) {
    entries.insert(key, slot);
}

/// Compiled dynamic class
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicClass {
    pub params: Vec<String>,
    /// `(property, parameter, custom property name)`
    pub bindings: Vec<DynamicBinding>,
    pub entries: ClassEntries,
}

/// Link between a dynamic property and the parameter that feeds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicBinding {
    pub property: String,
    pub param: String,
    pub custom_property: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("color", None), "color");
        assert_eq!(canonical_key("color", Some("::before")), "color:::before");
    }

    #[test]
    fn test_null_entry() {
        let entry = AtomicClassEntry::null("color");
        assert!(entry.is_null);
        assert_eq!(entry.class_name, None);
        assert_eq!(entry.selector(), "");
    }

    #[test]
    fn test_insert_slot_keeps_position() {
        let mut entries = ClassEntries::new();
        insert_slot(&mut entries, "color".into(), StyleSlot::Atomic(AtomicClassEntry::null("color")));
        insert_slot(&mut entries, "margin".into(), StyleSlot::Atomic(AtomicClassEntry::null("margin")));
        let mut replacement = AtomicClassEntry::null("color");
        replacement.value = "red".into();
        insert_slot(&mut entries, "color".into(), StyleSlot::Atomic(replacement));

        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["color", "margin"]);
        assert!(matches!(&entries["color"], StyleSlot::Atomic(e) if e.value == "red"));
    }

    #[test]
    fn test_slot_entries() {
        let mut bundle = ConditionalBundle::new();
        bundle.insert("default".into(), AtomicClassEntry::null("color"));
        bundle.insert(":hover".into(), AtomicClassEntry::null("color"));
        assert_eq!(StyleSlot::Bundle(bundle).entries().count(), 2);
    }
}
