//! Rule Registry
//!
//! Content-addressed store of emitted rules. Insertion is insert-if-absent:
//! the first writer of a key wins and identical later writes are no-ops.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::entry::AtomicClassEntry;

/// Kind of emitted rule, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    /// `@property` for typed vars
    TypedProperty,
    /// `@property` for dynamic custom properties
    DynamicProperty,
    Keyframes,
    /// `:root{...}` var blocks, plus their at-rule variants
    RootVars,
    PositionTry,
    ViewTransition,
    Atomic,
    Theme,
}

/// One registered rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRule {
    pub kind: RuleKind,
    pub css_text: String,
    /// RTL twin, atomic rules only
    pub rtl_text: Option<String>,
    pub priority: u32,
    /// Property and selector text, used to order atomic rules
    pub property: String,
    pub selector: String,
    /// 1 unconditioned, 2 pseudo-suffixed, 3 at-rule wrapped
    pub layer: u8,
}

impl RegisteredRule {
    /// A non-atomic rule
    pub fn block(kind: RuleKind, css_text: impl Into<String>) -> Self {
        Self {
            kind,
            css_text: css_text.into(),
            rtl_text: None,
            priority: 0,
            property: String::new(),
            selector: String::new(),
            layer: 0,
        }
    }

    fn atomic(entry: &AtomicClassEntry) -> Self {
        let layer = if entry.at_rule.is_some() {
            3
        } else if entry.selector_suffix.is_some() {
            2
        } else {
            1
        };
        Self {
            kind: RuleKind::Atomic,
            css_text: entry.ltr_css.clone(),
            rtl_text: entry.rtl_css.clone(),
            priority: entry.priority,
            property: entry.property.clone(),
            selector: entry.selector().to_string(),
            layer,
        }
    }
}

/// Registry of emitted rules keyed by `(kind, content hash)`
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<(RuleKind, String), RegisteredRule, FxBuildHasher>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule unless its key is already present. Returns true when inserted.
    pub fn insert(&mut self, key: impl Into<String>, rule: RegisteredRule) -> bool {
        let key = (rule.kind, key.into());
        if self.rules.contains_key(&key) {
            return false;
        }
        log::debug!("Registered {:?} rule {}", key.0, key.1);
        self.rules.insert(key, rule);
        true
    }

    /// Register an atomic entry under its class name. Unset markers are skipped.
    pub fn insert_entry(&mut self, entry: &AtomicClassEntry) -> bool {
        match &entry.class_name {
            Some(class_name) => self.insert(class_name.clone(), RegisteredRule::atomic(entry)),
            None => false,
        }
    }

    pub fn get(&self, kind: RuleKind, key: &str) -> Option<&RegisteredRule> {
        self.rules.get(&(kind, key.to_string()))
    }

    pub fn contains(&self, kind: RuleKind, key: &str) -> bool {
        self.get(kind, key).is_some()
    }

    /// Rules in insertion order
    pub fn rules(&self) -> impl Iterator<Item = (&str, &RegisteredRule)> {
        self.rules.iter().map(|((_, key), rule)| (key.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
