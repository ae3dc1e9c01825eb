//! Value Normalizer
//!
//! Canonicalizes property values so that equivalent inputs produce the same
//! text, and therefore the same content-addressed class name.

use crate::error::{CssError, CssResult};
use crate::properties::{dash_case, is_custom_property, is_length_property, is_time_property};
use crate::tokenizer::{tokenize, Token};
use crate::value::{DeclValue, NormalizedValue, Scalar};

/// Functions whose arguments are kept as written (apart from whitespace)
const VERBATIM_FUNCTIONS: &[&str] = &["calc", "clamp", "min", "max"];

/// Functions that may appear unquoted as a `content` value
const CONTENT_FUNCTIONS: &[&str] = &[
    "attr",
    "counter",
    "counters",
    "var",
    "url",
    "image-set",
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
];

/// Keywords that may appear unquoted as a `content` value
const CONTENT_KEYWORDS: &[&str] = &[
    "open-quote",
    "close-quote",
    "no-open-quote",
    "no-close-quote",
    "none",
    "normal",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

const ANGLE_UNITS: &[&str] = &["deg", "grad", "rad", "turn"];

const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "lh", "rlh", "cap", "ic", "vw", "vh", "vi", "vb", "vmin",
    "vmax", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
    "cm", "mm", "q", "in", "pt", "pc",
];

/// Normalize a raw string value for a property
pub fn normalize_str(property: &str, raw: &str) -> CssResult<String> {
    let trimmed = raw.trim();

    let (body, important) = split_important(trimmed);

    if property == "content" && !is_css_content(body) {
        let quoted = quote_text(body);
        return Ok(if important { format!("{}!important", quoted) } else { quoted });
    }

    let tokens = tokenize(body)?;
    let mut out = serialize_tokens(property, &tokens);

    if important {
        out.push_str("!important");
    }
    Ok(out)
}

/// Normalize a numeric value for a property, adding units where the
/// property requires them
pub fn normalize_number(property: &str, value: f64) -> CssResult<String> {
    if !value.is_finite() {
        return Err(CssError::invalid_value(property, value.to_string(), "number is not finite"));
    }

    let text = format_number(value);
    if is_custom_property(property) {
        return Ok(text);
    }

    let with_unit = if is_time_property(property) {
        format!("{}ms", text)
    } else if is_length_property(property) && value != 0.0 {
        format!("{}px", text)
    } else {
        text
    };

    normalize_str(property, &with_unit)
}

/// Normalize a resolved scalar
pub fn normalize_scalar(property: &str, value: &Scalar) -> CssResult<String> {
    match value {
        Scalar::Str(s) => normalize_str(property, s),
        Scalar::Number(n) => normalize_number(property, *n),
        Scalar::Ref(r) => Err(CssError::invalid_value(
            property,
            r.to_string(),
            "reference was not resolved before normalization",
        )),
    }
}

/// Normalize a leaf declaration value (scalar or fallback list).
/// Maps and nulls are handled by the declaration processors.
pub fn normalize_leaf(property: &str, value: &DeclValue) -> CssResult<NormalizedValue> {
    match value {
        DeclValue::Scalar(s) => Ok(NormalizedValue::Single(normalize_scalar(property, s)?)),
        DeclValue::Fallback(list) => {
            let values = normalize_list(property, list)?;
            Ok(fallbacks_in_emission_order(values))
        }
        DeclValue::FirstThatWorks(list) => {
            let values = normalize_list(property, list)?;
            Ok(first_that_works(values))
        }
        DeclValue::Map(_) | DeclValue::Null => Err(CssError::invalid_value(
            property,
            format!("{:?}", value),
            "expected a scalar or a fallback list",
        )),
    }
}

fn normalize_list(property: &str, list: &[Scalar]) -> CssResult<Vec<String>> {
    if list.is_empty() {
        return Err(CssError::invalid_value(property, "[]", "fallback list is empty"));
    }
    list.iter().map(|s| normalize_scalar(property, s)).collect()
}

/// Reverse a preference-ordered list so the most preferred value is declared last
fn fallbacks_in_emission_order(mut values: Vec<String>) -> NormalizedValue {
    if values.len() == 1 {
        return NormalizedValue::Single(values.remove(0));
    }
    values.reverse();
    NormalizedValue::Fallbacks(values)
}

/// Fold a run of `var(--x)` values (and the literal after them) into one
/// nested `var()`; everything else stays a separate fallback declaration.
fn first_that_works(values: Vec<String>) -> NormalizedValue {
    let Some(first_var) = values.iter().position(|v| is_plain_var(v)) else {
        return fallbacks_in_emission_order(values);
    };

    let mut preferred: Vec<String> = values[..first_var].to_vec();
    let rest = &values[first_var..];
    let chain_end = rest
        .iter()
        .position(|v| !is_plain_var(v))
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    let (chain, remaining) = rest.split_at(chain_end);

    let mut folded: Option<String> = None;
    for value in chain.iter().rev() {
        folded = Some(match folded {
            None => value.clone(),
            Some(inner) => format!("var({}, {})", var_name(value), inner),
        });
    }

    if let Some(folded) = folded {
        preferred.push(folded);
    }
    preferred.extend(remaining.iter().cloned());
    fallbacks_in_emission_order(preferred)
}

/// `var(--name)` without its own fallback
pub fn is_plain_var(value: &str) -> bool {
    value
        .strip_prefix("var(")
        .and_then(|v| v.strip_suffix(')'))
        .is_some_and(|inner| {
            inner.starts_with("--") && !inner.contains([',', '(', ')', ' '])
        })
}

fn var_name(value: &str) -> &str {
    value
        .strip_prefix("var(")
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value)
}

fn split_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    if let Some(stripped) = lower.strip_suffix("important") {
        let before = stripped.trim_end();
        if let Some(body) = before.strip_suffix('!') {
            return (value[..body.len()].trim_end(), true);
        }
    }
    (value, false)
}

/// Whether a `content` value is already CSS: a sequence of strings,
/// content functions and content keywords. Anything else is plain text.
fn is_css_content(value: &str) -> bool {
    let Ok(tokens) = tokenize(value) else {
        return false;
    };

    let mut depth = 0usize;
    let mut items = 0usize;
    for token in &tokens {
        if depth > 0 {
            match token {
                Token::Function(_) | Token::LeftParen => depth += 1,
                Token::RightParen => depth -= 1,
                _ => {}
            }
            continue;
        }
        match token {
            Token::Whitespace => continue,
            Token::String { .. } | Token::Url(_) => {}
            // Alternative text separator
            Token::Delim('/') if items > 0 => continue,
            Token::Function(name) if CONTENT_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(name)) => depth += 1,
            Token::Ident(word) if CONTENT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) => {}
            _ => return false,
        }
        items += 1;
    }
    items > 0
}

fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Re-serialize tokens with canonical whitespace and numbers
fn serialize_tokens(property: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    // Function stack; `true` marks a verbatim function scope
    let mut verbatim_stack: Vec<bool> = Vec::new();
    let dash_case_idents = matches!(property, "transition-property" | "will-change");
    let quotes_property = matches!(property, "content" | "quotes");

    for token in tokens {
        if matches!(token, Token::Whitespace) {
            pending_space = true;
            continue;
        }

        let suppress = out.is_empty()
            || out.ends_with('(')
            || out.ends_with(',')
            || matches!(token, Token::RightParen | Token::Comma);
        if pending_space && !suppress {
            out.push(' ');
        }
        pending_space = false;

        let verbatim = verbatim_stack.iter().any(|v| *v);

        match token {
            Token::Ident(name) => {
                if dash_case_idents && !is_custom_property(name) {
                    out.push_str(&dash_case(name));
                } else {
                    out.push_str(name);
                }
            }
            Token::Function(name) => {
                let is_verbatim = VERBATIM_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(name));
                verbatim_stack.push(is_verbatim);
                out.push_str(name);
                out.push('(');
            }
            Token::LeftParen => {
                verbatim_stack.push(false);
                out.push('(');
            }
            Token::RightParen => {
                verbatim_stack.pop();
                out.push(')');
            }
            Token::Hash(value) => {
                out.push('#');
                out.push_str(value);
            }
            Token::String { quote, raw } => {
                if quotes_property && *quote == '\'' && raw.is_empty() {
                    out.push_str("\"\"");
                } else {
                    out.push(*quote);
                    out.push_str(raw);
                    out.push(*quote);
                }
            }
            Token::Url(url) => {
                out.push_str("url(");
                out.push_str(url);
                out.push(')');
            }
            Token::Number(text) => {
                if verbatim {
                    out.push_str(text);
                } else {
                    out.push_str(&normalize_number_text(text));
                }
            }
            Token::Percentage(text) => {
                if verbatim {
                    out.push_str(text);
                } else {
                    out.push_str(&normalize_number_text(text));
                }
                out.push('%');
            }
            Token::Dimension(text, unit) => {
                if verbatim {
                    out.push_str(text);
                    out.push_str(unit);
                } else {
                    out.push_str(&normalize_dimension(text, unit));
                }
            }
            Token::Comma => out.push(','),
            Token::Delim(c) => out.push(*c),
            Token::Whitespace | Token::Eof => {}
        }
    }

    out
}

fn normalize_dimension(text: &str, unit: &str) -> String {
    let lower = unit.to_ascii_lowercase();
    let value: f64 = text.parse().unwrap_or(f64::NAN);

    if lower == "ms" {
        if value == 0.0 {
            return "0s".to_string();
        }
        if value.abs() >= 10.0 {
            return format!("{}s", normalize_number_text(&format_number(value / 1000.0)));
        }
        return format!("{}ms", normalize_number_text(text));
    }

    if value == 0.0 {
        if ANGLE_UNITS.contains(&lower.as_str()) {
            return "0deg".to_string();
        }
        if lower == "s" {
            return "0s".to_string();
        }
        if LENGTH_UNITS.contains(&lower.as_str()) {
            return "0".to_string();
        }
    }

    format!("{}{}", normalize_number_text(text), unit)
}

/// Canonical text for a number as written: no `+` sign, no leading zero
/// before the decimal point, no trailing fractional zeros
pub fn normalize_number_text(text: &str) -> String {
    if text.contains(['e', 'E']) {
        return text.to_string();
    }

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');

    if int_part.is_empty() && frac_part.is_empty() {
        return "0".to_string();
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Format a float rounded to 4 decimal places, without trailing zeros
pub fn format_number(value: f64) -> String {
    // Past 1e15 an f64 has no fractional digits left to round
    if value.abs() >= 1e15 {
        return format!("{}", value);
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{}", rounded as i64);
    }
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(property: &str, value: &str) -> String {
        normalize_str(property, value).unwrap()
    }

    #[test]
    fn test_collapse_function_whitespace() {
        assert_eq!(
            norm("transform", "rotate(10deg)  translate3d( 0 , 0 , 0 )"),
            "rotate(10deg) translate3d(0,0,0)"
        );
    }

    #[test]
    fn test_zero_units() {
        assert_eq!(norm("margin", "0px"), "0");
        assert_eq!(norm("margin", "0.0em"), "0");
        assert_eq!(norm("transition-duration", "0ms"), "0s");
        assert_eq!(norm("rotate", "0rad"), "0deg");
        assert_eq!(norm("rotate", "0turn"), "0deg");
        assert_eq!(norm("rotate", "0grad"), "0deg");
        assert_eq!(norm("flex-basis", "0%"), "0%");
        assert_eq!(norm("grid-template-columns", "0fr 1fr"), "0fr 1fr");
    }

    #[test]
    fn test_leading_zero() {
        assert_eq!(norm("transition-duration", "0.01s"), ".01s");
        assert_eq!(norm("opacity", "0.50"), ".5");
        assert_eq!(norm("margin", "-0.5px"), "-.5px");
        assert_eq!(
            norm("transition-timing-function", "cubic-bezier(0.25, 0.1, 0.25, 1.0)"),
            "cubic-bezier(.25,.1,.25,1)"
        );
    }

    #[test]
    fn test_milliseconds() {
        assert_eq!(norm("transition-duration", "1234ms"), "1.234s");
        assert_eq!(norm("transition-duration", "10ms"), ".01s");
        assert_eq!(norm("transition-duration", "500ms"), ".5s");
        assert_eq!(norm("transition-duration", "5ms"), "5ms");
        assert_eq!(norm("transition", "opacity 300ms ease, transform 2000ms"), "opacity .3s ease,transform 2s");
    }

    #[test]
    fn test_calc_is_verbatim() {
        assert_eq!(norm("width", "calc(100%  -  0px)"), "calc(100% - 0px)");
        assert_eq!(norm("width", "calc( 0.5rem + 10px )"), "calc(0.5rem + 10px)");
        assert_eq!(
            norm("width", "clamp(1rem, calc(0.5rem + 2vw), 3rem)"),
            "clamp(1rem,calc(0.5rem + 2vw),3rem)"
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(normalize_number("margin", 16.0).unwrap(), "16px");
        assert_eq!(normalize_number("margin", 0.0).unwrap(), "0");
        assert_eq!(normalize_number("opacity", 0.5).unwrap(), ".5");
        assert_eq!(normalize_number("z-index", 10.0).unwrap(), "10");
        assert_eq!(normalize_number("line-height", 1.25).unwrap(), "1.25");
        assert_eq!(normalize_number("width", 1.0 / 3.0).unwrap(), ".3333px");
        assert_eq!(normalize_number("transition-duration", 250.0).unwrap(), ".25s");
        assert_eq!(normalize_number("--size", 4.0).unwrap(), "4");
        assert!(normalize_number("width", f64::NAN).is_err());
    }

    #[test]
    fn test_content_quoting() {
        assert_eq!(norm("content", ""), "\"\"");
        assert_eq!(norm("content", "''"), "\"\"");
        assert_eq!(norm("content", "hello world"), "\"hello world\"");
        assert_eq!(norm("content", "say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(norm("content", "\"already\""), "\"already\"");
        assert_eq!(norm("content", "attr(data-label)"), "attr(data-label)");
        assert_eq!(norm("content", "counter(item)"), "counter(item)");
        assert_eq!(norm("content", "counters(item, \".\")"), "counters(item,\".\")");
        assert_eq!(norm("content", "var(--icon)"), "var(--icon)");
        assert_eq!(norm("content", "open-quote"), "open-quote");
        assert_eq!(norm("content", "no-close-quote"), "no-close-quote");
        assert_eq!(norm("content", "counter(item) \". \""), "counter(item) \". \"");
        assert_eq!(norm("content", "\"(\" attr(title) \")\""), "\"(\" attr(title) \")\"");
        assert_eq!(norm("content", "open-quote attr(a) close-quote"), "open-quote attr(a) close-quote");
        assert_eq!(norm("content", "attr(a) and more"), "\"attr(a) and more\"");
        assert_eq!(norm("content", "it's"), "\"it's\"");
    }

    #[test]
    fn test_quotes_empty_string() {
        assert_eq!(norm("quotes", "'' ''"), "\"\" \"\"");
    }

    #[test]
    fn test_transition_property_casing() {
        assert_eq!(
            norm("transition-property", "background_color, opacity"),
            "background-color,opacity"
        );
        assert_eq!(norm("transition-property", "borderColor"), "border-color");
        assert_eq!(norm("will-change", "--my_var, box_shadow"), "--my_var,box-shadow");
    }

    #[test]
    fn test_important() {
        assert_eq!(norm("color", "red !important"), "red!important");
        assert_eq!(norm("color", "red!important"), "red!important");
        assert_eq!(norm("margin", "0px  ! important"), "0!important");
    }

    #[test]
    fn test_idempotent() {
        let cases = [
            ("transform", "rotate(10deg)  translate3d( 0 , 0 , 0 )"),
            ("transition", "opacity 1234ms cubic-bezier(0.4, 0, 0.2, 1)"),
            ("margin", "0px 0.5em"),
            ("content", "hello"),
            ("content", "''"),
            ("width", "calc(100% - 10px)"),
            ("color", "red !important"),
            ("transition-property", "background_color"),
            ("transition-duration", "10ms"),
        ];
        for (property, value) in cases {
            let once = norm(property, value);
            assert_eq!(norm(property, &once), once, "{}: {}", property, value);
        }
    }

    #[test]
    fn test_fallback_list_reversed() {
        let value = DeclValue::fallback(["sticky", "-webkit-sticky", "fixed"]);
        let normalized = normalize_leaf("position", &value).unwrap();
        assert_eq!(
            normalized.to_declarations("position"),
            "position:fixed;position:-webkit-sticky;position:sticky"
        );
    }

    #[test]
    fn test_first_that_works_nests_vars() {
        let value = DeclValue::first_that_works(["var(--a)", "var(--b)", "red"]);
        assert_eq!(
            normalize_leaf("color", &value).unwrap(),
            NormalizedValue::Single("var(--a, var(--b, red))".to_string())
        );

        let value = DeclValue::first_that_works(["color-mix(in srgb, red, blue)", "var(--a)", "red", "blue"]);
        assert_eq!(
            normalize_leaf("color", &value).unwrap(),
            NormalizedValue::Fallbacks(vec![
                "blue".to_string(),
                "var(--a, red)".to_string(),
                "color-mix(in srgb,red,blue)".to_string(),
            ])
        );

        let value = DeclValue::first_that_works(["sticky", "fixed"]);
        assert_eq!(
            normalize_leaf("position", &value).unwrap(),
            NormalizedValue::Fallbacks(vec!["fixed".to_string(), "sticky".to_string()])
        );
    }

    #[test]
    fn test_unresolved_reference_is_error() {
        let value = Scalar::Ref(crate::value::TokenRef::var("colors", "primary"));
        assert!(normalize_scalar("color", &value).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.123456), "0.1235");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(-0.00001), "0");
    }

    #[test]
    fn test_huge_numbers_stay_finite() {
        let text = format_number(1e306);
        assert!(text.starts_with("1000"));
        assert!(!text.contains("inf"));

        let width = normalize_number("width", -1e306).unwrap();
        assert!(width.starts_with("-1000"));
        assert!(width.ends_with("px"));
    }
}
