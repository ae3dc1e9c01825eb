//! Declaration Processors
//!
//! Turn a resolved declaration list into a class's atomic entries.
//! `simple` handles plain values and unsets, `conditional` handles
//! condition maps, `pseudo_element` handles `::before`-style property
//! groups and `dynamic` handles runtime-bound properties.

pub mod conditional;
pub mod dynamic;
pub mod pseudo_element;
pub mod simple;

use tessera_css::properties::{dash_case, is_shorthand};
use tessera_css::selector::{is_conditional_map, split_at_rules, split_pseudo_element};
use tessera_css::{atomic_class_name, priority, DeclValue, NormalizedValue};

use crate::config::{ShorthandBehavior, StyleConfig};
use crate::entry::{AtomicClassEntry, ClassEntries};
use crate::error::{PolicyWarning, StyleError, StyleResult};
use crate::rtl::{ltr_value, rtl_values};
use crate::shorthand::{check_forbidden, expand, expansion_targets};
use crate::validate::{check_prefix, validate_property};

/// State shared by the processors while compiling one definition
pub struct ProcessContext<'a> {
    pub config: &'a StyleConfig,
    /// Name of the definition being compiled, for diagnostics
    pub definition: &'a str,
    pub warnings: &'a mut Vec<PolicyWarning>,
}

impl<'a> ProcessContext<'a> {
    pub fn new(config: &'a StyleConfig, definition: &'a str, warnings: &'a mut Vec<PolicyWarning>) -> Self {
        Self { config, definition, warnings }
    }

    pub(crate) fn validate(&mut self, property: &str) -> StyleResult<()> {
        validate_property(self.config, self.definition, property, self.warnings)
    }

    pub(crate) fn check_prefixes(&mut self, property: &str, value: &NormalizedValue) {
        for v in value.values() {
            check_prefix(self.config, self.definition, property, v, self.warnings);
        }
    }
}

/// Process a class's declarations (references already resolved).
/// Later declarations replace earlier ones with the same canonical key.
pub fn process_declarations(
    ctx: &mut ProcessContext<'_>,
    declarations: &[(String, DeclValue)],
) -> StyleResult<ClassEntries> {
    check_policy(ctx, declarations)?;

    let mut entries = ClassEntries::new();
    for (key, value) in declarations {
        if key.starts_with("::") {
            pseudo_element::process(ctx, key, value, &mut entries)?;
            continue;
        }
        process_property(ctx, &dash_case(key), None, value, &mut entries)?;
    }
    Ok(entries)
}

/// Process one property, optionally scoped to a pseudo-element
pub(crate) fn process_property(
    ctx: &mut ProcessContext<'_>,
    property: &str,
    pseudo_element: Option<&str>,
    value: &DeclValue,
    entries: &mut ClassEntries,
) -> StyleResult<()> {
    if property.starts_with(':') || property.starts_with('@') {
        return Err(StyleError::validation(
            ctx.definition,
            format!(
                "condition '{}' must be nested inside a property value, not used as a property",
                property
            ),
        ));
    }
    ctx.validate(property)?;

    match value {
        DeclValue::Map(map) if is_conditional_map(map) => {
            conditional::process(ctx, property, pseudo_element, map, entries)
        }
        DeclValue::Map(_) => Err(StyleError::validation(
            ctx.definition,
            format!(
                "value of '{}' is a nested property group; expected a value or a map of conditions",
                property
            ),
        )),
        _ => simple::process(ctx, property, pseudo_element, value, entries),
    }
}

/// Run the `forbid` check over the property names of one declaration set
pub(crate) fn check_policy(ctx: &ProcessContext<'_>, declarations: &[(String, DeclValue)]) -> StyleResult<()> {
    if ctx.config.shorthand_behavior != ShorthandBehavior::Forbid {
        return Ok(());
    }
    let names: Vec<String> = declarations
        .iter()
        .filter(|(key, _)| !key.starts_with(':') && !key.starts_with('@'))
        .map(|(key, _)| dash_case(key))
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    check_forbidden(ctx.definition, &names)
}

/// Longhand `(property, value)` pairs for a normalized value under the
/// configured shorthand policy
pub(crate) fn apply_shorthand_policy(
    ctx: &ProcessContext<'_>,
    property: &str,
    value: &NormalizedValue,
) -> Vec<(String, NormalizedValue)> {
    let unchanged = || vec![(property.to_string(), value.clone())];

    if ctx.config.shorthand_behavior != ShorthandBehavior::Flatten || !is_shorthand(property) {
        return unchanged();
    }

    let NormalizedValue::Single(text) = value else {
        log::debug!("{}: keeping fallback list for shorthand '{}'", ctx.definition, property);
        return unchanged();
    };

    match expand(property, text) {
        Some(parts) => parts
            .into_iter()
            .map(|(name, v)| (name, NormalizedValue::Single(v)))
            .collect(),
        None => {
            log::debug!(
                "{}: shorthand '{}: {}' has no safe expansion, keeping it",
                ctx.definition,
                property,
                text
            );
            unchanged()
        }
    }
}

/// Properties an unset marker applies to under the configured policy
pub(crate) fn unset_targets(ctx: &ProcessContext<'_>, property: &str) -> Vec<String> {
    if ctx.config.shorthand_behavior == ShorthandBehavior::Flatten {
        if let Some(targets) = expansion_targets(property) {
            return targets;
        }
    }
    vec![property.to_string()]
}

/// Unset marker carrying its selector scope
pub(crate) fn null_entry(property: &str, suffix: Option<&str>, at_rule: Option<&str>) -> AtomicClassEntry {
    let mut entry = AtomicClassEntry::null(property);
    entry.selector_suffix = suffix.filter(|s| !s.is_empty()).map(str::to_string);
    entry.pseudo_element = entry
        .selector_suffix
        .as_deref()
        .and_then(|s| split_pseudo_element(s).0);
    entry.at_rule = at_rule.map(str::to_string);
    entry
}

/// Build the atomic entry for one property/value under a selector scope
pub(crate) fn build_entry(
    config: &StyleConfig,
    property: &str,
    value: &NormalizedValue,
    suffix: Option<&str>,
    at_rule: Option<&str>,
) -> AtomicClassEntry {
    let suffix = suffix.filter(|s| !s.is_empty());
    let at_rule = at_rule.filter(|a| !a.is_empty());
    let pseudo_element = suffix.and_then(|s| split_pseudo_element(s).0);
    let hash_value = value.hash_text();

    let class_name = atomic_class_name(
        &config.class_prefix,
        property,
        &hash_value,
        suffix,
        pseudo_element.as_deref(),
        at_rule,
    );

    let mut selector = format!(".{}", class_name);
    if at_rule.is_some() && !config.use_css_layers {
        selector.push_str(&format!(".{}", class_name));
    }
    selector.push_str(suffix.unwrap_or(""));

    let ltr: Vec<String> = value.values().iter().map(|v| ltr_value(property, v)).collect();
    let ltr_css = wrap_at_rules(
        at_rule,
        format!("{}{{{}}}", selector, declaration_block(config, property, &ltr)),
    );

    let rtl_css = rtl_values(property, value.values(), config.legacy_value_flipping).map(
        |(rtl_property, rtl)| {
            wrap_at_rules(
                at_rule,
                format!(
                    "html[dir=\"rtl\"] {}{{{}}}",
                    selector,
                    declaration_block(config, &rtl_property, &rtl)
                ),
            )
        },
    );

    AtomicClassEntry {
        class_name: Some(class_name),
        property: property.to_string(),
        value: hash_value,
        selector_suffix: suffix.map(str::to_string),
        pseudo_element,
        at_rule: at_rule.map(str::to_string),
        ltr_css,
        rtl_css,
        priority: priority(property, suffix, at_rule),
        is_null: false,
    }
}

/// `prop:v1;prop:v2`, each preceded by the prefixer's output
fn declaration_block(config: &StyleConfig, property: &str, values: &[String]) -> String {
    let mut parts = Vec::with_capacity(values.len());
    for value in values {
        if let Some(prefixed) = config.prefixed(property, value) {
            parts.push(prefixed);
        }
        parts.push(format!("{}:{}", property, value));
    }
    parts.join(";")
}

/// Wrap a rule in its at-rules, outermost first
pub(crate) fn wrap_at_rules(at_rule: Option<&str>, rule: String) -> String {
    match at_rule {
        Some(at_rule) => split_at_rules(at_rule)
            .iter()
            .rev()
            .fold(rule, |inner, at| format!("{}{{{}}}", at, inner)),
        None => rule,
    }
}
