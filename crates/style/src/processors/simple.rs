//! Unconditional declarations and explicit unsets

use tessera_css::{normalize_leaf, DeclValue};

use super::{apply_shorthand_policy, build_entry, null_entry, unset_targets, ProcessContext};
use crate::entry::{canonical_key, insert_slot, ClassEntries, StyleSlot};
use crate::error::StyleResult;

/// Process a plain value (scalar, fallback list or null) for one property
pub fn process(
    ctx: &mut ProcessContext<'_>,
    property: &str,
    pseudo_element: Option<&str>,
    value: &DeclValue,
    entries: &mut ClassEntries,
) -> StyleResult<()> {
    if value.is_null() {
        for target in unset_targets(ctx, property) {
            let entry = null_entry(&target, pseudo_element, None);
            insert_slot(entries, canonical_key(&target, pseudo_element), StyleSlot::Atomic(entry));
        }
        return Ok(());
    }

    let normalized = normalize_leaf(property, value)?;
    ctx.check_prefixes(property, &normalized);

    for (longhand, value) in apply_shorthand_policy(ctx, property, &normalized) {
        let entry = build_entry(ctx.config, &longhand, &value, pseudo_element, None);
        insert_slot(entries, canonical_key(&longhand, pseudo_element), StyleSlot::Atomic(entry));
    }
    Ok(())
}
