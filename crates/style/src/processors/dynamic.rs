//! Runtime-bound properties
//!
//! Each property compiles to `property:var(--<prefix>-<property>)`; the
//! value arrives later through an inline style.

use rustc_hash::FxHashSet;
use tessera_css::properties::dash_case;
use tessera_css::NormalizedValue;

use super::{build_entry, ProcessContext};
use crate::config::ShorthandBehavior;
use crate::entry::{canonical_key, insert_slot, ClassEntries, DynamicBinding, DynamicClass, StyleSlot};
use crate::error::{StyleError, StyleResult};
use crate::shorthand::check_forbidden;

/// Custom property carrying a dynamic property's value
pub fn custom_property_name(prefix: &str, property: &str) -> String {
    format!("--{}-{}", prefix, property)
}

/// Validate a dynamic definition and build its entries.
/// `properties` pairs each property with the parameter that feeds it.
pub fn process(
    ctx: &mut ProcessContext<'_>,
    params: &[String],
    properties: &[(String, String)],
) -> StyleResult<DynamicClass> {
    if params.is_empty() {
        return Err(StyleError::validation(ctx.definition, "dynamic class needs at least one parameter"));
    }
    let mut seen = FxHashSet::default();
    for param in params {
        if !seen.insert(param.as_str()) {
            return Err(StyleError::validation(
                ctx.definition,
                format!("parameter '{}' is declared more than once", param),
            ));
        }
    }
    if properties.is_empty() {
        return Err(StyleError::validation(ctx.definition, "dynamic class binds no properties"));
    }
    if ctx.config.shorthand_behavior == ShorthandBehavior::Forbid {
        let names: Vec<String> = properties.iter().map(|(property, _)| dash_case(property)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        check_forbidden(ctx.definition, &names)?;
    }

    let mut bindings = Vec::with_capacity(properties.len());
    let mut entries = ClassEntries::new();

    for (property, param) in properties {
        let property = dash_case(property);
        if !params.contains(param) {
            return Err(StyleError::validation(
                ctx.definition,
                format!("'{}' is bound to undeclared parameter '{}'", property, param),
            ));
        }
        if property.starts_with(':') || property.starts_with('@') {
            return Err(StyleError::validation(
                ctx.definition,
                format!("dynamic classes take unconditional properties only, got '{}'", property),
            ));
        }
        ctx.validate(&property)?;

        let custom_property = custom_property_name(&ctx.config.class_prefix, &property);
        let value = NormalizedValue::Single(format!("var({})", custom_property));
        let entry = build_entry(ctx.config, &property, &value, None, None);
        insert_slot(&mut entries, canonical_key(&property, None), StyleSlot::Atomic(entry));

        bindings.push(DynamicBinding {
            property,
            param: param.clone(),
            custom_property,
        });
    }

    Ok(DynamicClass {
        params: params.to_vec(),
        bindings,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(params: &[&str], properties: &[(&str, &str)]) -> StyleResult<DynamicClass> {
        let config = StyleConfig::default();
        let mut warnings = Vec::new();
        let mut ctx = ProcessContext::new(&config, "fade", &mut warnings);
        let properties: Vec<(String, String)> =
            properties.iter().map(|(p, a)| (p.to_string(), a.to_string())).collect();
        process(&mut ctx, &strings(params), &properties)
    }

    #[test]
    fn test_var_value() {
        let class = run(&["opacity"], &[("opacity", "opacity")]).unwrap();
        assert_eq!(class.bindings[0].custom_property, "--x-opacity");
        let StyleSlot::Atomic(entry) = &class.entries["opacity"] else { panic!("expected atomic") };
        assert_eq!(entry.value, "var(--x-opacity)");
        assert!(entry.ltr_css.ends_with("{opacity:var(--x-opacity)}"));
    }

    #[test]
    fn test_camel_case_property() {
        let class = run(&["color"], &[("backgroundColor", "color")]).unwrap();
        assert_eq!(class.bindings[0].property, "background-color");
        assert_eq!(class.bindings[0].custom_property, "--x-background-color");
    }

    #[test]
    fn test_validation() {
        assert!(run(&[], &[("opacity", "opacity")]).is_err());
        assert!(run(&["a", "a"], &[("opacity", "a")]).is_err());
        assert!(run(&["a"], &[("opacity", "b")]).is_err());
        assert!(run(&["a"], &[("opacty", "a")]).is_err());
        assert!(run(&["a"], &[]).is_err());
    }

    #[test]
    fn test_forbid_policy() {
        let properties: Vec<(String, String)> = [("margin", "m"), ("marginTop", "m")]
            .iter()
            .map(|(p, a)| (p.to_string(), a.to_string()))
            .collect();

        let config = StyleConfig::default().with_shorthand_behavior(ShorthandBehavior::Forbid);
        let mut warnings = Vec::new();
        let mut ctx = ProcessContext::new(&config, "spaced", &mut warnings);
        let err = process(&mut ctx, &strings(&["m"]), &properties).unwrap_err();
        assert!(err.to_string().contains("'margin'"));

        assert!(run(&["m"], &[("margin", "m"), ("marginTop", "m")]).is_ok());
    }
}
