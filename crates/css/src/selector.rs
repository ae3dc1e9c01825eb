//! Selector Composer
//!
//! Parses and combines condition keys: pseudo-classes, pseudo-elements,
//! at-rules (`@media`, `@container`, `@supports`) and contextual selectors.

use smallvec::SmallVec;

use crate::error::{CssError, CssResult};
use crate::value::DeclValue;

/// Key meaning "no condition"
pub const DEFAULT_CONDITION: &str = "default";

/// Marker class used by contextual selectors when no custom marker is given
pub const DEFAULT_MARKER: &str = "x-default-marker";

/// Kind of a single condition key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    /// `"default"`
    Default,
    /// `:hover`, `:where(...)`, ...
    PseudoClass,
    /// `::before`, `::placeholder`, ...
    PseudoElement,
    /// `@media ...`, `@container ...`, `@supports ...`
    AtRule,
}

/// Classify a condition key. Returns `None` for anything that is not a condition
/// (e.g. a property name).
pub fn condition_kind(key: &str) -> Option<ConditionKind> {
    if key == DEFAULT_CONDITION {
        Some(ConditionKind::Default)
    } else if key.starts_with("::") {
        Some(ConditionKind::PseudoElement)
    } else if key.starts_with(':') {
        Some(ConditionKind::PseudoClass)
    } else if key.starts_with('@') {
        Some(ConditionKind::AtRule)
    } else {
        None
    }
}

/// A combined selector split into its pseudo suffix and at-rule prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSelector {
    /// Pseudo-class/pseudo-element suffix (e.g. `:hover`)
    pub suffix: Option<String>,
    /// At-rule prefix, possibly several stacked at-rules
    pub at_rule: Option<String>,
}

impl ParsedSelector {
    /// Canonical text of the selector, at-rule first
    pub fn canonical_key(&self) -> String {
        let mut key = String::new();
        if let Some(at_rule) = &self.at_rule {
            key.push_str(at_rule);
        }
        if let Some(suffix) = &self.suffix {
            key.push_str(suffix);
        }
        key
    }
}

/// Split a combined selector such as `@supports (x)@media (y):hover`.
///
/// Inputs starting with `@` are scanned with a parenthesis depth counter so
/// colons inside at-rule conditions (including nested functions like
/// `oklch()`) are skipped; the first top-level `:` starts the suffix.
/// Inputs without a leading `@` are a suffix only.
pub fn parse_combined(selector: &str) -> CssResult<ParsedSelector> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Ok(ParsedSelector::default());
    }

    if !selector.starts_with('@') {
        check_balanced(selector)?;
        return Ok(ParsedSelector {
            suffix: Some(selector.to_string()),
            at_rule: None,
        });
    }

    let mut depth = 0usize;
    let mut split_at = None;
    for (i, c) in selector.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(CssError::invalid_selector(selector, "unexpected ')'"));
                }
                depth -= 1;
            }
            ':' if depth == 0 => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (at_rule, suffix) = match split_at {
        Some(i) => (&selector[..i], Some(&selector[i..])),
        None => (selector, None),
    };

    check_balanced(at_rule)?;
    if let Some(suffix) = suffix {
        check_balanced(suffix)?;
    }

    let at_rule = normalize_at_rule(at_rule);
    if at_rule.len() <= 1 {
        return Err(CssError::invalid_selector(selector, "empty at-rule"));
    }

    Ok(ParsedSelector {
        suffix: suffix.map(str::to_string),
        at_rule: Some(at_rule),
    })
}

/// Split stacked at-rules (`@supports (x)@media (y)`) into their parts
pub fn split_at_rules(at_rule: &str) -> SmallVec<[String; 2]> {
    let mut parts = SmallVec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in at_rule.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '@' if depth == 0 && i > start => {
                parts.push(at_rule[start..i].trim().to_string());
                start = i;
            }
            _ => {}
        }
    }
    let last = at_rule[start..].trim();
    if !last.is_empty() {
        parts.push(last.to_string());
    }
    parts
}

/// Separate a leading-or-embedded pseudo-element (`::before`) from the
/// remaining pseudo-classes of a suffix
pub fn split_pseudo_element(suffix: &str) -> (Option<String>, String) {
    let bytes = suffix.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                let mut end = i + 2;
                let mut inner_depth = 0usize;
                while end < bytes.len() {
                    match bytes[end] {
                        b'(' => inner_depth += 1,
                        b')' => inner_depth = inner_depth.saturating_sub(1),
                        b':' if inner_depth == 0 => break,
                        _ => {}
                    }
                    end += 1;
                }
                let pseudo = suffix[i..end].to_string();
                let rest = format!("{}{}", &suffix[..i], &suffix[end..]);
                return (Some(pseudo), rest);
            }
            _ => {}
        }
        i += 1;
    }

    (None, suffix.to_string())
}

/// Combine a parent selector with a child condition. `"default"` is
/// transparent; anything else is appended textually.
pub fn combine(parent: &str, child: &str) -> String {
    if child == DEFAULT_CONDITION {
        parent.to_string()
    } else {
        format!("{}{}", parent, child)
    }
}

/// Whether a map value is a set of conditions rather than a property group:
/// it has a `"default"` key, or every key is a selector or at-rule.
pub fn is_conditional_map(entries: &[(String, DeclValue)]) -> bool {
    if entries.is_empty() {
        return false;
    }
    entries.iter().any(|(k, _)| k == DEFAULT_CONDITION)
        || entries.iter().all(|(k, _)| k.starts_with(':') || k.starts_with('@'))
}

fn check_balanced(text: &str) -> CssResult<()> {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CssError::invalid_selector(text, "unexpected ')'"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CssError::invalid_selector(text, "missing ')'"));
    }
    Ok(())
}

/// Collapse whitespace runs and trim spaces inside parentheses
fn normalize_at_rule(at_rule: &str) -> String {
    let mut out = String::with_capacity(at_rule.len());
    let mut pending_space = false;

    for c in at_rule.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.ends_with('(') && c != ')' {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn marker_selector(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    if !pseudo.starts_with(':') || pseudo.starts_with("::") {
        return Err(CssError::invalid_selector(
            pseudo,
            "contextual selectors take a pseudo-class such as ':hover'",
        ));
    }
    check_balanced(pseudo)?;
    Ok(format!(".{}{}", marker.unwrap_or(DEFAULT_MARKER), pseudo))
}

/// Matches when an ancestor carrying the marker is in the given state
pub fn ancestor(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    let target = marker_selector(pseudo, marker)?;
    Ok(format!(":where({} *)", target))
}

/// Matches when a descendant carrying the marker is in the given state
pub fn descendant(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    let target = marker_selector(pseudo, marker)?;
    Ok(format!(":where(:has({}))", target))
}

/// Matches when a preceding sibling carrying the marker is in the given state
pub fn sibling_before(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    let target = marker_selector(pseudo, marker)?;
    Ok(format!(":where({} ~ *)", target))
}

/// Matches when a following sibling carrying the marker is in the given state
pub fn sibling_after(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    let target = marker_selector(pseudo, marker)?;
    Ok(format!(":where(:has(~ {}))", target))
}

/// Matches when any sibling carrying the marker is in the given state
pub fn any_sibling(pseudo: &str, marker: Option<&str>) -> CssResult<String> {
    let target = marker_selector(pseudo, marker)?;
    Ok(format!(":where({} ~ *, :has(~ {}))", target, target))
}
