//! Pseudo-element property groups (`"::before": { content: "''", ... }`)

use tessera_css::properties::dash_case;
use tessera_css::selector::{condition_kind, parse_combined, ConditionKind};
use tessera_css::DeclValue;

use super::{check_policy, process_property, ProcessContext};
use crate::entry::ClassEntries;
use crate::error::{StyleError, StyleResult};

/// Process every property of a pseudo-element group, scoping each selector
/// to the pseudo-element
pub fn process(
    ctx: &mut ProcessContext<'_>,
    pseudo_element: &str,
    value: &DeclValue,
    entries: &mut ClassEntries,
) -> StyleResult<()> {
    if condition_kind(pseudo_element) != Some(ConditionKind::PseudoElement) {
        return Err(StyleError::validation(
            ctx.definition,
            format!("'{}' is not a pseudo-element", pseudo_element),
        ));
    }
    parse_combined(pseudo_element)?;

    let DeclValue::Map(group) = value else {
        return Err(StyleError::validation(
            ctx.definition,
            format!("'{}' expects a map of properties", pseudo_element),
        ));
    };

    check_policy(ctx, group)?;

    for (key, inner) in group {
        if condition_kind(key).is_some() {
            return Err(StyleError::validation(
                ctx.definition,
                format!(
                    "'{}' inside '{}' must be a property; put conditions on the property value",
                    key, pseudo_element
                ),
            ));
        }
        process_property(ctx, &dash_case(key), Some(pseudo_element), inner, entries)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::entry::StyleSlot;

    fn run(value: DeclValue) -> StyleResult<ClassEntries> {
        let config = StyleConfig::default();
        let mut warnings = Vec::new();
        let mut ctx = ProcessContext::new(&config, "test", &mut warnings);
        let mut entries = ClassEntries::new();
        process(&mut ctx, "::before", &value, &mut entries)?;
        Ok(entries)
    }

    #[test]
    fn test_scoped_properties() {
        let entries = run(DeclValue::map([("content", "''"), ("color", "red")])).unwrap();
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["content:::before", "color:::before"]);

        let StyleSlot::Atomic(color) = &entries["color:::before"] else { panic!("expected atomic") };
        let class = color.class_name.as_deref().unwrap();
        assert_eq!(color.ltr_css, format!(".{}::before{{color:red}}", class));
        assert_eq!(color.pseudo_element.as_deref(), Some("::before"));

        let StyleSlot::Atomic(content) = &entries["content:::before"] else { panic!("expected atomic") };
        assert!(content.ltr_css.ends_with("{content:\"\"}"));
    }

    #[test]
    fn test_conditions_inside_pseudo_element() {
        let value = DeclValue::map([(
            "color",
            DeclValue::map([("default", "red"), (":hover", "blue")]),
        )]);
        let entries = run(value).unwrap();
        let StyleSlot::Bundle(bundle) = &entries["color:::before"] else { panic!("expected bundle") };
        assert_eq!(bundle["default"].selector_suffix.as_deref(), Some("::before"));
        assert_eq!(bundle[":hover"].selector_suffix.as_deref(), Some("::before:hover"));
    }

    #[test]
    fn test_rejects_non_map() {
        assert!(run(DeclValue::from("red")).is_err());
    }

    #[test]
    fn test_rejects_condition_keys() {
        let value = DeclValue::map([(":hover", DeclValue::map([("color", "red")]))]);
        assert!(matches!(run(value), Err(StyleError::Validation { .. })));
    }
}
