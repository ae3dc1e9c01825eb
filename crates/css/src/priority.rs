//! Priority Calculator
//!
//! Total order over atomic rules: property group, shorthand tier, selector
//! kind and at-rule, then property name and selector text.

use std::cmp::Ordering;

use crate::properties::{property_group, property_tier, PropertyTier};

/// Distance between two property groups
pub const GROUP_STEP: u32 = 10_000;
/// Offset added when a pseudo-class or pseudo-element suffix is present
pub const PSEUDO_OFFSET: u32 = 300;
/// Offset added when an at-rule wraps the rule
pub const AT_RULE_OFFSET: u32 = 600;

fn tier_offset(tier: PropertyTier) -> u32 {
    match tier {
        PropertyTier::ShorthandOfShorthands => 0,
        PropertyTier::Shorthand => 100,
        PropertyTier::Longhand => 200,
    }
}

/// Priority of a rule. Shorthands sort before their longhands in the same
/// group; suffixed rules after unsuffixed ones; at-rule rules after both.
pub fn priority(property: &str, suffix: Option<&str>, at_rule: Option<&str>) -> u32 {
    let mut value = property_group(property).rank() * GROUP_STEP + tier_offset(property_tier(property));
    if suffix.is_some_and(|s| !s.is_empty()) {
        value += PSEUDO_OFFSET;
    }
    if at_rule.is_some_and(|a| !a.is_empty()) {
        value += AT_RULE_OFFSET;
    }
    value
}

/// Sort key of an emitted rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOrder<'a> {
    pub priority: u32,
    pub property: &'a str,
    pub selector: &'a str,
    pub class_name: &'a str,
}

impl Ord for RuleOrder<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.property.cmp(other.property))
            .then_with(|| self.selector.cmp(other.selector))
            .then_with(|| self.class_name.cmp(other.class_name))
    }
}

impl PartialOrd for RuleOrder<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
