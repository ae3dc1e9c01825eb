//! RTL Mirror
//!
//! Direction-sensitive declarations get a right-to-left twin. Logical
//! keywords (`float: start`) also resolve to a physical LTR value.

use crate::shorthand::split_top_level;

/// Resolve logical keywords to their LTR physical value
pub fn ltr_value(property: &str, value: &str) -> String {
    match property {
        "float" | "clear" => map_keyword(value, logical_to_ltr),
        "background-position" | "background-position-x" => map_words(value, logical_to_ltr),
        _ => value.to_string(),
    }
}

/// The RTL `(property, value)` for a declaration, or `None` when the
/// declaration reads the same in both directions
pub fn rtl_declaration(property: &str, value: &str, legacy: bool) -> Option<(String, String)> {
    let mirrored = match property {
        "float" | "clear" => map_keyword(value, logical_to_rtl),
        "background-position" | "background-position-x" => map_words(value, logical_to_rtl),
        "box-shadow" | "text-shadow" => flip_shadows(value)?,
        "cursor" => map_keyword(value, flip_cursor),
        _ => value.to_string(),
    };

    // Physical keywords only flip when no logical keyword was resolved
    let (rtl_property, rtl_value) = if legacy && mirrored == value {
        (flip_property(property), flip_legacy_value(property, value))
    } else if legacy {
        (flip_property(property), mirrored)
    } else {
        (property.to_string(), mirrored)
    };

    let ltr = ltr_value(property, value);
    if rtl_property == property && rtl_value == ltr {
        None
    } else {
        Some((rtl_property, rtl_value))
    }
}

/// Mirror every value of a (possibly fallback) declaration. Values that
/// read the same in both directions are repeated as their LTR form.
pub fn rtl_values(property: &str, values: &[String], legacy: bool) -> Option<(String, Vec<String>)> {
    let mirrored: Vec<Option<(String, String)>> =
        values.iter().map(|v| rtl_declaration(property, v, legacy)).collect();
    if mirrored.iter().all(Option::is_none) {
        return None;
    }

    let rtl_property = if legacy { flip_property(property) } else { property.to_string() };
    let rtl = values
        .iter()
        .zip(mirrored)
        .map(|(v, m)| m.map(|(_, v)| v).unwrap_or_else(|| ltr_value(property, v)))
        .collect();
    Some((rtl_property, rtl))
}

fn logical_to_ltr(word: &str) -> Option<&'static str> {
    match word {
        "start" | "inline-start" => Some("left"),
        "end" | "inline-end" => Some("right"),
        _ => None,
    }
}

fn logical_to_rtl(word: &str) -> Option<&'static str> {
    match word {
        "start" | "inline-start" => Some("right"),
        "end" | "inline-end" => Some("left"),
        _ => None,
    }
}

fn flip_cursor(word: &str) -> Option<&'static str> {
    match word {
        "e-resize" => Some("w-resize"),
        "w-resize" => Some("e-resize"),
        "ne-resize" => Some("nw-resize"),
        "nw-resize" => Some("ne-resize"),
        "se-resize" => Some("sw-resize"),
        "sw-resize" => Some("se-resize"),
        "nesw-resize" => Some("nwse-resize"),
        "nwse-resize" => Some("nesw-resize"),
        _ => None,
    }
}

fn flip_left_right(word: &str) -> Option<&'static str> {
    match word {
        "left" => Some("right"),
        "right" => Some("left"),
        _ => None,
    }
}

/// Map a whole single-keyword value, keeping `!important`
fn map_keyword(value: &str, map: fn(&str) -> Option<&'static str>) -> String {
    let (body, important) = match value.strip_suffix("!important") {
        Some(body) => (body, "!important"),
        None => (value, ""),
    };
    match map(body) {
        Some(mapped) => format!("{}{}", mapped, important),
        None => value.to_string(),
    }
}

/// Map every keyword of a space/comma separated value
fn map_words(value: &str, map: fn(&str) -> Option<&'static str>) -> String {
    split_top_level(value, ',')
        .into_iter()
        .map(|layer| {
            split_top_level(layer, ' ')
                .into_iter()
                .map(|word| map(word).unwrap_or(word))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Negate the horizontal offset of each shadow
fn flip_shadows(value: &str) -> Option<String> {
    if value == "none" || value.contains("var(") {
        return None;
    }

    let shadows: Vec<String> = split_top_level(value, ',')
        .into_iter()
        .map(|shadow| {
            let mut words: Vec<String> = split_top_level(shadow, ' ').into_iter().map(String::from).collect();
            if let Some(offset) = words.iter_mut().find(|w| starts_numeric(w)) {
                *offset = negate(offset);
            }
            words.join(" ")
        })
        .collect();
    Some(shadows.join(","))
}

fn starts_numeric(word: &str) -> bool {
    word.trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn negate(length: &str) -> String {
    if let Some(positive) = length.strip_prefix('-') {
        return positive.to_string();
    }
    let is_zero = length
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .parse::<f64>()
        .is_ok_and(|n| n == 0.0);
    if is_zero {
        length.to_string()
    } else {
        format!("-{}", length)
    }
}

/// Swap physical left/right in a property name
fn flip_property(property: &str) -> String {
    if property.contains("left") {
        property.replacen("left", "right", 1)
    } else if property.contains("right") {
        property.replacen("right", "left", 1)
    } else {
        property.to_string()
    }
}

fn flip_legacy_value(property: &str, value: &str) -> String {
    match property {
        "float" | "clear" | "text-align" => map_keyword(value, flip_left_right),
        "background-position" | "background-position-x" => map_words(value, flip_left_right),
        "margin" | "padding" | "inset" | "border-width" | "border-style" | "border-color"
        | "scroll-margin" | "scroll-padding" => {
            let words = split_top_level(value, ' ');
            match words.as_slice() {
                [top, right, bottom, left] => format!("{} {} {} {}", top, left, bottom, right),
                _ => value.to_string(),
            }
        }
        "border-radius" => {
            let words = split_top_level(value, ' ');
            match words.as_slice() {
                [tl, tr, br, bl] => format!("{} {} {} {}", tr, tl, bl, br),
                [tl, tr_bl, br] => format!("{} {} {} {}", tr_bl, tl, tr_bl, br),
                [first, second] => format!("{} {}", second, first),
                _ => value.to_string(),
            }
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_float() {
        assert_eq!(ltr_value("float", "start"), "left");
        assert_eq!(
            rtl_declaration("float", "start", false),
            Some(("float".to_string(), "right".to_string()))
        );
        assert_eq!(rtl_declaration("float", "none", false), None);
    }

    #[test]
    fn test_shadow_offsets() {
        assert_eq!(
            rtl_declaration("box-shadow", "1px 2px 3px red,inset -4px 0 #000", false),
            Some(("box-shadow".to_string(), "-1px 2px 3px red,inset 4px 0 #000".to_string()))
        );
        assert_eq!(rtl_declaration("box-shadow", "0 2px red", false), None);
        assert_eq!(rtl_declaration("text-shadow", "none", false), None);
    }

    #[test]
    fn test_fallback_values() {
        let values = vec!["start".to_string(), "none".to_string()];
        assert_eq!(
            rtl_values("float", &values, false),
            Some(("float".to_string(), vec!["right".to_string(), "none".to_string()]))
        );
        assert_eq!(rtl_values("color", &["red".to_string()], false), None);
    }

    #[test]
    fn test_cursor() {
        assert_eq!(
            rtl_declaration("cursor", "ne-resize", false),
            Some(("cursor".to_string(), "nw-resize".to_string()))
        );
        assert_eq!(rtl_declaration("cursor", "pointer", false), None);
    }

    #[test]
    fn test_background_position_keywords() {
        assert_eq!(ltr_value("background-position", "start top"), "left top");
        assert_eq!(
            rtl_declaration("background-position", "start top", false),
            Some(("background-position".to_string(), "right top".to_string()))
        );
    }

    #[test]
    fn test_physical_properties_untouched_by_default() {
        assert_eq!(rtl_declaration("margin-left", "4px", false), None);
        assert_eq!(rtl_declaration("text-align", "left", false), None);
    }

    #[test]
    fn test_legacy_flipping() {
        assert_eq!(
            rtl_declaration("margin-left", "4px", true),
            Some(("margin-right".to_string(), "4px".to_string()))
        );
        assert_eq!(
            rtl_declaration("text-align", "left", true),
            Some(("text-align".to_string(), "right".to_string()))
        );
        assert_eq!(
            rtl_declaration("padding", "1px 2px 3px 4px", true),
            Some(("padding".to_string(), "1px 4px 3px 2px".to_string()))
        );
        assert_eq!(
            rtl_declaration("border-top-left-radius", "2px", true),
            Some(("border-top-right-radius".to_string(), "2px".to_string()))
        );
        assert_eq!(rtl_declaration("color", "red", true), None);
        assert_eq!(
            rtl_declaration("float", "start", true),
            Some(("float".to_string(), "right".to_string()))
        );
    }
}
