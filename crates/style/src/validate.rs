//! Property name validation, suggestions and policy warnings

use tessera_css::properties::{is_custom_property, is_known_property, known_properties, unprefixed};

use crate::config::StyleConfig;
use crate::error::{PolicyWarning, StyleError, StyleResult, WarningKind};

const MAX_SUGGESTIONS: usize = 3;

/// Fail on unknown properties; record deprecation warnings
pub fn validate_property(
    config: &StyleConfig,
    definition: &str,
    property: &str,
    warnings: &mut Vec<PolicyWarning>,
) -> StyleResult<()> {
    if !is_accepted(config, property) {
        return Err(StyleError::Validation {
            definition: definition.to_string(),
            message: format!("unknown CSS property '{}'", property),
            suggestions: suggestions(property),
        });
    }

    if config.is_deprecated(property) {
        warn(
            warnings,
            PolicyWarning {
                kind: WarningKind::DeprecatedProperty,
                definition: definition.to_string(),
                property: property.to_string(),
                message: format!("'{}' is deprecated", property),
            },
        );
    }
    Ok(())
}

/// Warn when a vendor-prefixed property is already produced by the prefixer
pub fn check_prefix(
    config: &StyleConfig,
    definition: &str,
    property: &str,
    value: &str,
    warnings: &mut Vec<PolicyWarning>,
) {
    let Some(standard) = unprefixed(property) else {
        return;
    };
    let covered = config
        .prefixed(standard, value)
        .is_some_and(|text| text.contains(property));
    if covered {
        warn(
            warnings,
            PolicyWarning {
                kind: WarningKind::UnnecessaryPrefix,
                definition: definition.to_string(),
                property: property.to_string(),
                message: format!(
                    "'{}' is added by the configured prefixer; use '{}' instead",
                    property, standard
                ),
            },
        );
    }
}

fn is_accepted(config: &StyleConfig, property: &str) -> bool {
    is_custom_property(property)
        || is_known_property(property)
        || config.allowed_properties.contains(property)
        || unprefixed(property).is_some_and(is_known_property)
}

fn warn(warnings: &mut Vec<PolicyWarning>, warning: PolicyWarning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}

/// Up to three known properties close to `property`
pub fn suggestions(property: &str) -> Vec<String> {
    closest(property, known_properties())
}

/// Up to three candidates within edit distance of `name`, or containing it
pub fn closest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let limit = (name.len() / 3).max(2);
    let mut candidates: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter_map(|known| {
            let distance = strsim::levenshtein(name, known);
            let related = known.contains(name) || name.contains(known);
            if distance <= limit {
                Some((distance, known))
            } else if related && name.len() > 2 {
                Some((limit + 1, known))
            } else {
                None
            }
        })
        .collect();

    candidates.sort();
    candidates.dedup_by(|a, b| a.1 == b.1);
    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name.to_string())
        .collect()
}
