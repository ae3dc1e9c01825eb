//! Shorthand Expander
//!
//! Splits known shorthands into longhands (`flatten`) and detects
//! shorthand/longhand collisions (`forbid`).

use tessera_css::properties::{all_longhands, is_shorthand};

use crate::error::{StyleError, StyleResult};

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// How a shorthand distributes its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    /// 1-4 values for four edges or corners
    FourSides(&'static [&'static str; 4]),
    /// 1-2 values for a pair
    Pair(&'static [&'static str; 2]),
    /// `start / end`
    SlashPair(&'static [&'static str; 2]),
    /// `<width> <style> <color>` in any order
    BorderSide(&'static [&'static str; 3]),
    /// `border`, applied to all four sides
    Border,
    /// `flex`
    Flex,
}

fn expansion(property: &str) -> Option<Expansion> {
    use Expansion::*;
    let kind = match property {
        "margin" => FourSides(&["margin-top", "margin-right", "margin-bottom", "margin-left"]),
        "padding" => FourSides(&["padding-top", "padding-right", "padding-bottom", "padding-left"]),
        "inset" => FourSides(&["top", "right", "bottom", "left"]),
        "scroll-margin" => FourSides(&[
            "scroll-margin-top",
            "scroll-margin-right",
            "scroll-margin-bottom",
            "scroll-margin-left",
        ]),
        "scroll-padding" => FourSides(&[
            "scroll-padding-top",
            "scroll-padding-right",
            "scroll-padding-bottom",
            "scroll-padding-left",
        ]),
        "border-width" => FourSides(&[
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ]),
        "border-style" => FourSides(&[
            "border-top-style",
            "border-right-style",
            "border-bottom-style",
            "border-left-style",
        ]),
        "border-color" => FourSides(&[
            "border-top-color",
            "border-right-color",
            "border-bottom-color",
            "border-left-color",
        ]),
        "border-radius" => FourSides(&[
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-right-radius",
            "border-bottom-left-radius",
        ]),
        "margin-inline" => Pair(&["margin-inline-start", "margin-inline-end"]),
        "margin-block" => Pair(&["margin-block-start", "margin-block-end"]),
        "padding-inline" => Pair(&["padding-inline-start", "padding-inline-end"]),
        "padding-block" => Pair(&["padding-block-start", "padding-block-end"]),
        "inset-inline" => Pair(&["inset-inline-start", "inset-inline-end"]),
        "inset-block" => Pair(&["inset-block-start", "inset-block-end"]),
        "gap" => Pair(&["row-gap", "column-gap"]),
        "overflow" => Pair(&["overflow-x", "overflow-y"]),
        "overscroll-behavior" => Pair(&["overscroll-behavior-x", "overscroll-behavior-y"]),
        "place-content" => Pair(&["align-content", "justify-content"]),
        "place-items" => Pair(&["align-items", "justify-items"]),
        "place-self" => Pair(&["align-self", "justify-self"]),
        "grid-row" => SlashPair(&["grid-row-start", "grid-row-end"]),
        "grid-column" => SlashPair(&["grid-column-start", "grid-column-end"]),
        "border-top" => BorderSide(&["border-top-width", "border-top-style", "border-top-color"]),
        "border-right" => {
            BorderSide(&["border-right-width", "border-right-style", "border-right-color"])
        }
        "border-bottom" => {
            BorderSide(&["border-bottom-width", "border-bottom-style", "border-bottom-color"])
        }
        "border-left" => BorderSide(&["border-left-width", "border-left-style", "border-left-color"]),
        "border-inline-start" => BorderSide(&[
            "border-inline-start-width",
            "border-inline-start-style",
            "border-inline-start-color",
        ]),
        "border-inline-end" => BorderSide(&[
            "border-inline-end-width",
            "border-inline-end-style",
            "border-inline-end-color",
        ]),
        "border-block-start" => BorderSide(&[
            "border-block-start-width",
            "border-block-start-style",
            "border-block-start-color",
        ]),
        "border-block-end" => BorderSide(&[
            "border-block-end-width",
            "border-block-end-style",
            "border-block-end-color",
        ]),
        "outline" => BorderSide(&["outline-width", "outline-style", "outline-color"]),
        "border" => Border,
        "flex" => Flex,
        _ => return None,
    };
    Some(kind)
}

/// Longhands a shorthand expands to, in emission order
pub fn expansion_targets(property: &str) -> Option<Vec<String>> {
    let targets = match expansion(property)? {
        Expansion::FourSides(names) => names.iter().map(|n| n.to_string()).collect(),
        Expansion::Pair(names) | Expansion::SlashPair(names) => {
            names.iter().map(|n| n.to_string()).collect()
        }
        Expansion::BorderSide(names) => names.iter().map(|n| n.to_string()).collect(),
        Expansion::Border => border_longhands(),
        Expansion::Flex => vec!["flex-grow".into(), "flex-shrink".into(), "flex-basis".into()],
    };
    Some(targets)
}

fn border_longhands() -> Vec<String> {
    let mut names = Vec::with_capacity(12);
    for part in ["width", "style", "color"] {
        for side in SIDES {
            names.push(format!("border-{}-{}", side, part));
        }
    }
    names
}

/// Expand a normalized shorthand value into longhand declarations.
///
/// Returns `None` when the property has no expansion or the value cannot be
/// split safely (custom properties, unexpected arity); the caller keeps the
/// shorthand as written.
pub fn expand(property: &str, value: &str) -> Option<Vec<(String, String)>> {
    let kind = expansion(property)?;
    if value.contains("var(") {
        return None;
    }

    let (body, important) = split_important(value);
    let words = split_top_level(body, ' ');

    let values: Vec<String> = match kind {
        Expansion::FourSides(_) => {
            if body.contains('/') {
                return None;
            }
            four_sides(&words)?.iter().map(|s| s.to_string()).collect()
        }
        Expansion::Pair(_) => match words.as_slice() {
            [both] => vec![both.to_string(), both.to_string()],
            [first, second] => vec![first.to_string(), second.to_string()],
            _ => return None,
        },
        Expansion::SlashPair(_) => {
            let parts = split_top_level(body, '/');
            match parts.as_slice() {
                [start] => vec![start.to_string(), "auto".to_string()],
                [start, end] => vec![start.to_string(), end.to_string()],
                _ => return None,
            }
        }
        Expansion::BorderSide(_) => border_side(&words)?.to_vec(),
        Expansion::Border => {
            let [width, style, color] = border_side(&words)?;
            let mut out = Vec::with_capacity(12);
            for part in [width, style, color] {
                out.extend(std::iter::repeat(part).take(4));
            }
            out
        }
        Expansion::Flex => flex(&words)?.to_vec(),
    };

    let targets = expansion_targets(property)?;
    Some(
        targets
            .into_iter()
            .zip(values)
            .map(|(name, v)| {
                let v = if important { format!("{}!important", v) } else { v };
                (name, v)
            })
            .collect(),
    )
}

fn four_sides<'a>(words: &[&'a str]) -> Option<[&'a str; 4]> {
    match *words {
        [all] => Some([all, all, all, all]),
        [vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        [top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        [top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => None,
    }
}

fn border_side(words: &[&str]) -> Option<[String; 3]> {
    if words.is_empty() || words.len() > 3 {
        return None;
    }
    if words == ["none"] {
        return Some(["medium".into(), "none".into(), "currentcolor".into()]);
    }

    let mut width = None;
    let mut style = None;
    let mut color = None;
    for word in words {
        let slot = if BORDER_STYLES.contains(word) {
            &mut style
        } else if is_length(word) || BORDER_WIDTH_KEYWORDS.contains(word) {
            &mut width
        } else {
            &mut color
        };
        if slot.is_some() {
            return None;
        }
        *slot = Some(word.to_string());
    }

    Some([
        width.unwrap_or_else(|| "medium".into()),
        style.unwrap_or_else(|| "none".into()),
        color.unwrap_or_else(|| "currentcolor".into()),
    ])
}

fn flex(words: &[&str]) -> Option<[String; 3]> {
    let owned = |a: &str, b: &str, c: &str| Some([a.to_string(), b.to_string(), c.to_string()]);
    match *words {
        ["none"] => owned("0", "0", "auto"),
        ["auto"] => owned("1", "1", "auto"),
        ["initial"] => owned("0", "1", "auto"),
        [grow] if is_number(grow) => owned(grow, "1", "0%"),
        [basis] => owned("1", "1", basis),
        [grow, shrink] if is_number(grow) && is_number(shrink) => owned(grow, shrink, "0%"),
        [grow, basis] if is_number(grow) => owned(grow, "1", basis),
        [grow, shrink, basis] if is_number(grow) && is_number(shrink) => owned(grow, shrink, basis),
        _ => None,
    }
}

fn is_number(word: &str) -> bool {
    word.parse::<f64>().is_ok()
}

fn is_length(word: &str) -> bool {
    if word == "0" {
        return true;
    }
    let starts_numeric = word
        .trim_start_matches(['-', '+'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    starts_numeric && !is_number(word) || word.starts_with("calc(")
}

fn split_important(value: &str) -> (&str, bool) {
    match value.strip_suffix("!important") {
        Some(body) => (body.trim_end(), true),
        None => (value, false),
    }
}

/// Split on `separator` outside parentheses and quotes
pub(crate) fn split_top_level(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ if c == separator && depth == 0 => {
                    let part = value[start..i].trim();
                    if !part.is_empty() {
                        parts.push(part);
                    }
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    let last = value[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// Reject a declaration set that uses a shorthand together with any
/// property it sets
pub fn check_forbidden(definition: &str, properties: &[&str]) -> StyleResult<()> {
    for shorthand in properties.iter().filter(|p| is_shorthand(p)) {
        let covered = all_longhands(shorthand);
        if let Some(longhand) = properties.iter().find(|p| covered.contains(p)) {
            return Err(StyleError::validation(
                definition,
                format!(
                    "shorthand '{}' is not allowed together with '{}'; use longhands only",
                    shorthand, longhand
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }

    #[test]
    fn test_margin_single_value() {
        assert_eq!(
            expand("margin", "16px").unwrap(),
            pairs(&[
                ("margin-top", "16px"),
                ("margin-right", "16px"),
                ("margin-bottom", "16px"),
                ("margin-left", "16px"),
            ])
        );
    }

    #[test]
    fn test_padding_three_values() {
        let parts = expand("padding", "1px 2px 3px").unwrap();
        assert_eq!(parts[1], ("padding-right".to_string(), "2px".to_string()));
        assert_eq!(parts[3], ("padding-left".to_string(), "2px".to_string()));
    }

    #[test]
    fn test_function_values_stay_whole() {
        let parts = expand("margin", "calc(1px + 2px) 0").unwrap();
        assert_eq!(parts[0].1, "calc(1px + 2px)");
        assert_eq!(parts[1].1, "0");
    }

    #[test]
    fn test_important_is_kept() {
        let parts = expand("gap", "4px 8px!important").unwrap();
        assert_eq!(parts, pairs(&[("row-gap", "4px!important"), ("column-gap", "8px!important")]));
    }

    #[test]
    fn test_border_side() {
        let parts = expand("border-bottom", "1px solid").unwrap();
        assert_eq!(
            parts,
            pairs(&[
                ("border-bottom-width", "1px"),
                ("border-bottom-style", "solid"),
                ("border-bottom-color", "currentcolor"),
            ])
        );
        assert_eq!(expand("outline", "red dashed").unwrap()[0].1, "medium");
    }

    #[test]
    fn test_border_all_sides() {
        let parts = expand("border", "2px dotted #000").unwrap();
        assert_eq!(parts.len(), 12);
        assert_eq!(parts[0], ("border-top-width".to_string(), "2px".to_string()));
        assert_eq!(parts[11], ("border-left-color".to_string(), "#000".to_string()));
    }

    #[test]
    fn test_flex_forms() {
        assert_eq!(expand("flex", "1").unwrap()[2].1, "0%");
        assert_eq!(expand("flex", "none").unwrap()[0].1, "0");
        assert_eq!(expand("flex", "2 100px").unwrap()[2].1, "100px");
        assert_eq!(expand("flex", "auto").unwrap()[2].1, "auto");
    }

    #[test]
    fn test_grid_row() {
        assert_eq!(
            expand("grid-row", "1 / 3").unwrap(),
            pairs(&[("grid-row-start", "1"), ("grid-row-end", "3")])
        );
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(expand("margin", "var(--space)"), None);
        assert_eq!(expand("background", "red"), None);
        assert_eq!(expand("border-radius", "4px / 2px"), None);
        assert_eq!(expand("margin", "1px 2px 3px 4px 5px"), None);
        assert_eq!(expand("color", "red"), None);
    }

    #[test]
    fn test_targets() {
        assert_eq!(expansion_targets("border").map(|t| t.len()), Some(12));
        assert_eq!(expansion_targets("inset").unwrap()[0], "top");
    }

    #[test]
    fn test_forbid() {
        assert!(check_forbidden("a", &["margin", "padding-top"]).is_ok());
        let err = check_forbidden("a", &["margin", "margin-top"]).unwrap_err();
        assert!(err.to_string().contains("'margin'"));
        assert!(check_forbidden("a", &["border-color", "border"]).is_err());
        assert!(check_forbidden("a", &["border", "border-bottom-color"]).is_err());
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a b(c d) 'e f'", ' '), vec!["a", "b(c d)", "'e f'"]);
        assert_eq!(split_top_level("1 / span 2", '/'), vec!["1", "span 2"]);
    }
}
