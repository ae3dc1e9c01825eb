//! CSS emission
//!
//! Orders the registry's rules by kind, atomic rules by priority, and
//! applies the layer or specificity strategy.

use std::cmp::Ordering;

use tessera_css::RuleOrder;

use crate::registry::{RegisteredRule, RuleKind, RuleRegistry};

/// Layer order statement emitted ahead of layered atomic rules
pub const LAYER_ORDER: &str = "@layer priority1, priority2, priority3;";

/// One emitted rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub css_text: String,
    pub priority: u32,
}

fn order<'a>(key: &'a str, rule: &'a RegisteredRule) -> RuleOrder<'a> {
    RuleOrder {
        priority: rule.priority,
        property: &rule.property,
        selector: &rule.selector,
        class_name: key,
    }
}

/// Ordered rules of a registry
pub fn emit(registry: &RuleRegistry, use_css_layers: bool) -> Vec<CssRule> {
    let mut rules: Vec<(&str, &RegisteredRule)> = registry.rules().collect();
    rules.sort_by(|(key_a, a), (key_b, b)| {
        a.kind.cmp(&b.kind).then_with(|| {
            if a.kind == RuleKind::Atomic {
                order(key_a, a).cmp(&order(key_b, b))
            } else {
                Ordering::Equal
            }
        })
    });

    let mut out = Vec::with_capacity(rules.len() + 1);
    let mut layers_declared = false;
    for (_, rule) in rules {
        if rule.kind != RuleKind::Atomic {
            out.push(CssRule {
                css_text: rule.css_text.clone(),
                priority: rule.priority,
            });
            continue;
        }

        if use_css_layers && !layers_declared {
            out.push(CssRule {
                css_text: LAYER_ORDER.to_string(),
                priority: 0,
            });
            layers_declared = true;
        }

        // RTL twin directly after its LTR rule
        for text in std::iter::once(&rule.css_text).chain(rule.rtl_text.as_ref()) {
            let css_text = if use_css_layers {
                format!("@layer priority{}{{{}}}", rule.layer, text)
            } else {
                text.clone()
            };
            out.push(CssRule {
                css_text,
                priority: rule.priority,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AtomicClassEntry;

    fn atomic(class: &str, property: &str, priority: u32, css: &str) -> AtomicClassEntry {
        let mut entry = AtomicClassEntry::null(property);
        entry.class_name = Some(class.to_string());
        entry.is_null = false;
        entry.priority = priority;
        entry.ltr_css = css.to_string();
        entry
    }

    fn texts(rules: &[CssRule]) -> Vec<&str> {
        rules.iter().map(|r| r.css_text.as_str()).collect()
    }

    #[test]
    fn test_kind_then_priority() {
        let mut registry = RuleRegistry::new();
        registry.insert_entry(&atomic("x2", "color", 70_200, ".x2{color:red}"));
        registry.insert("t", RegisteredRule::block(RuleKind::Theme, ".t{}"));
        registry.insert_entry(&atomic("x1", "display", 200, ".x1{display:flex}"));
        registry.insert("k", RegisteredRule::block(RuleKind::Keyframes, "@keyframes k{}"));

        let rules = emit(&registry, false);
        assert_eq!(
            texts(&rules),
            vec!["@keyframes k{}", ".x1{display:flex}", ".x2{color:red}", ".t{}"]
        );
    }

    #[test]
    fn test_tie_break_by_property() {
        let mut registry = RuleRegistry::new();
        registry.insert_entry(&atomic("x1", "border-color", 80_100, ".x1{border-color:red}"));
        registry.insert_entry(&atomic("x2", "border-bottom", 80_100, ".x2{border-bottom:1px solid}"));
        let rules = emit(&registry, false);
        assert_eq!(
            texts(&rules),
            vec![".x2{border-bottom:1px solid}", ".x1{border-color:red}"]
        );
    }

    #[test]
    fn test_rtl_follows_ltr() {
        let mut entry = atomic("x1", "float", 200, ".x1{float:left}");
        entry.rtl_css = Some("html[dir=\"rtl\"] .x1{float:right}".into());
        let mut registry = RuleRegistry::new();
        registry.insert_entry(&entry);
        registry.insert_entry(&atomic("x2", "float", 200, ".x2{float:none}"));

        let rules = emit(&registry, false);
        assert_eq!(
            texts(&rules),
            vec![".x1{float:left}", "html[dir=\"rtl\"] .x1{float:right}", ".x2{float:none}"]
        );
    }

    #[test]
    fn test_layers() {
        let mut hover = atomic("x2", "color", 70_500, ".x2:hover{color:red}");
        hover.selector_suffix = Some(":hover".into());
        let mut registry = RuleRegistry::new();
        registry.insert_entry(&atomic("x1", "color", 70_200, ".x1{color:blue}"));
        registry.insert_entry(&hover);

        let rules = emit(&registry, true);
        assert_eq!(
            texts(&rules),
            vec![
                LAYER_ORDER,
                "@layer priority1{.x1{color:blue}}",
                "@layer priority2{.x2:hover{color:red}}",
            ]
        );
    }
}
