//! Conditional declarations
//!
//! Nested condition maps are flattened into `(combined condition, leaf)`
//! pairs first; a later pair whose condition normalizes to the same text
//! replaces the earlier one. Each property then gets one bundle keyed by
//! the combined condition string.

use indexmap::IndexMap;
use tessera_css::selector::{combine, condition_kind, is_conditional_map, parse_combined, DEFAULT_CONDITION};
use tessera_css::{normalize_leaf, DeclValue};

use super::{apply_shorthand_policy, build_entry, null_entry, unset_targets, ProcessContext};
use crate::entry::{canonical_key, insert_slot, ClassEntries, ConditionalBundle, StyleSlot};
use crate::error::{StyleError, StyleResult};

/// A leaf of a flattened condition map
#[derive(Debug, Clone, PartialEq)]
pub struct FlatCondition<'v> {
    /// Combined condition as composed from the written keys
    pub condition: String,
    pub value: &'v DeclValue,
}

/// Flatten a condition map. Keys are deduplicated by their normalized text,
/// last written wins.
pub fn flatten<'v>(
    definition: &str,
    property: &str,
    map: &'v [(String, DeclValue)],
) -> StyleResult<Vec<FlatCondition<'v>>> {
    let mut flat: IndexMap<String, FlatCondition<'v>> = IndexMap::new();
    flatten_into(definition, property, "", map, &mut flat)?;
    Ok(flat.into_values().collect())
}

fn flatten_into<'v>(
    definition: &str,
    property: &str,
    parent: &str,
    map: &'v [(String, DeclValue)],
    flat: &mut IndexMap<String, FlatCondition<'v>>,
) -> StyleResult<()> {
    for (key, value) in map {
        if condition_kind(key).is_none() {
            return Err(StyleError::validation(
                definition,
                format!("'{}' in the value of '{}' is not a condition", key, property),
            ));
        }

        let condition = compose(parent, key)?;
        match value {
            DeclValue::Map(inner) if is_conditional_map(inner) => {
                flatten_into(definition, property, &condition, inner, flat)?;
            }
            DeclValue::Map(_) => {
                return Err(StyleError::validation(
                    definition,
                    format!(
                        "condition '{}' of '{}' holds a property group; expected a value",
                        key, property
                    ),
                ));
            }
            _ => {
                let canonical = parse_combined(&condition)?.canonical_key();
                flat.shift_remove(&canonical);
                flat.insert(canonical, FlatCondition { condition, value });
            }
        }
    }
    Ok(())
}

/// Combine a parent condition with a child key. At-rules move in front of
/// any pseudo suffix so the result always parses as `@...:...`.
fn compose(parent: &str, child: &str) -> StyleResult<String> {
    if !child.starts_with('@') || parent.is_empty() {
        return Ok(combine(parent, child));
    }
    let parsed = parse_combined(parent)?;
    Ok(format!(
        "{}{}{}",
        parsed.at_rule.unwrap_or_default(),
        child,
        parsed.suffix.unwrap_or_default()
    ))
}

/// Process a conditional map for one property
pub fn process(
    ctx: &mut ProcessContext<'_>,
    property: &str,
    pseudo_element: Option<&str>,
    map: &[(String, DeclValue)],
    entries: &mut ClassEntries,
) -> StyleResult<()> {
    let flat = flatten(ctx.definition, property, map)?;
    let mut bundles: IndexMap<String, ConditionalBundle> = IndexMap::new();

    for FlatCondition { condition, value } in flat {
        let parsed = parse_combined(&condition)?;
        let suffix = match (pseudo_element, parsed.suffix.as_deref()) {
            (Some(pseudo), Some(s)) => Some(format!("{}{}", pseudo, s)),
            (Some(pseudo), None) => Some(pseudo.to_string()),
            (None, s) => s.map(str::to_string),
        };
        let at_rule = parsed.at_rule.as_deref();
        let bundle_key = if condition.is_empty() {
            DEFAULT_CONDITION.to_string()
        } else {
            condition.clone()
        };

        if value.is_null() {
            for target in unset_targets(ctx, property) {
                let entry = null_entry(&target, suffix.as_deref(), at_rule);
                bundles.entry(target).or_default().insert(bundle_key.clone(), entry);
            }
            continue;
        }

        let normalized = normalize_leaf(property, value)?;
        ctx.check_prefixes(property, &normalized);

        for (longhand, value) in apply_shorthand_policy(ctx, property, &normalized) {
            let entry = build_entry(ctx.config, &longhand, &value, suffix.as_deref(), at_rule);
            bundles.entry(longhand).or_default().insert(bundle_key.clone(), entry);
        }
    }

    for (longhand, bundle) in bundles {
        insert_slot(entries, canonical_key(&longhand, pseudo_element), StyleSlot::Bundle(bundle));
    }
    Ok(())
}
