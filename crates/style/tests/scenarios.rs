//! End-to-end compile and resolve scenarios

use tessera_css::{atomic_class_name, normalize_str};
use tessera_style::{
    ancestor, decl, ClassRef, CompiledStyles, DeclValue, RuleRegistry, ShorthandBehavior, StyleConfig, StyleError,
    StyleSheet, StyleSlot, WarningKind,
};

fn compile(sheet: &StyleSheet) -> CompiledStyles {
    sheet.compile(&StyleConfig::default()).unwrap()
}

fn class_names(styles: &CompiledStyles, class: &str, key: &str) -> Vec<String> {
    styles.class(class).unwrap()[key]
        .entries()
        .filter_map(|e| e.class_name.clone())
        .collect()
}

fn position(css: &str, needle: &str) -> usize {
    css.find(needle).unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, css))
}

#[test]
fn test_class_names_are_deterministic() {
    let a = atomic_class_name("x", "color", "red", Some(":hover"), None, None);
    let b = atomic_class_name("x", "color", "red", Some(":hover"), None, None);
    assert_eq!(a, b);

    let mut sheet = StyleSheet::new();
    sheet
        .define_class("one", [decl("color", "red")])
        .define_class("two", [decl("color", "red"), decl("display", "block")]);
    let styles = compile(&sheet);
    assert_eq!(class_names(&styles, "one", "color"), class_names(&styles, "two", "color"));
    assert_eq!(styles.css().matches("{color:red}").count(), 1);
}

#[test]
fn test_normalization_is_idempotent() {
    let cases = [
        ("margin", "0px"),
        ("transition", "opacity 300ms ease,  transform 2000ms"),
        ("transform", "rotate( 10deg )  translateX(1.50px)"),
        ("width", "calc( 100%  -  4px )"),
        ("content", "hello"),
        ("color", "RED !important"),
    ];
    for (property, value) in cases {
        let once = normalize_str(property, value).unwrap();
        let twice = normalize_str(property, &once).unwrap();
        assert_eq!(once, twice, "{}: {}", property, value);
    }
}

#[test]
fn test_merge_last_wins_and_skips() {
    let mut sheet = StyleSheet::new();
    sheet
        .define_class("a", [decl("color", "red"), decl("display", "flex")])
        .define_class("b", [decl("color", "blue")]);
    let styles = compile(&sheet);

    let merged = styles.resolve(&["a".into(), "b".into()]).unwrap();
    let classes: Vec<&str> = merged.class_string.split(' ').collect();
    assert!(classes.contains(&class_names(&styles, "b", "color")[0].as_str()));
    assert!(!classes.contains(&class_names(&styles, "a", "color")[0].as_str()));
    assert!(classes.contains(&class_names(&styles, "a", "display")[0].as_str()));

    let skipped = styles
        .resolve(&["a".into(), "b".into(), ClassRef::None, ClassRef::when(false, "a")])
        .unwrap();
    assert_eq!(merged, skipped);
}

#[test]
fn test_unset_removes_property() {
    let mut sheet = StyleSheet::new();
    sheet
        .define_class("red", [decl("color", "red")])
        .define_class("plain", [decl("color", DeclValue::Null)]);
    let styles = compile(&sheet);
    let merged = styles.resolve(&["red".into(), "plain".into()]).unwrap();
    assert_eq!(merged.class_string, "");
}

#[test]
fn test_priority_ordering() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "box",
        [decl("color", "red"), decl("z-index", 10), decl("display", "flex")],
    );
    let css = compile(&sheet).css();
    let display = position(&css, "{display:flex}");
    let z_index = position(&css, "{z-index:10}");
    let color = position(&css, "{color:red}");
    assert!(display < z_index && z_index < color, "{}", css);
}

#[test]
fn test_zero_values() {
    let mut sheet = StyleSheet::new();
    sheet
        .define_class("a", [decl("margin", 0)])
        .define_class("b", [decl("margin", "0px")])
        .define_class("c", [decl("transition-duration", "0ms")]);
    let styles = compile(&sheet);
    assert_eq!(class_names(&styles, "a", "margin"), class_names(&styles, "b", "margin"));
    let css = styles.css();
    assert!(css.contains("{margin:0}"));
    assert!(css.contains("{transition-duration:0s}"));
}

#[test]
fn test_fallback_list() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "header",
        [decl("position", DeclValue::fallback(["sticky", "-webkit-sticky", "fixed"]))],
    );
    let css = compile(&sheet).css();
    assert!(css.contains("{position:fixed;position:-webkit-sticky;position:sticky}"), "{}", css);
}

#[test]
fn test_conditional_flattening() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "link",
        [decl("color", DeclValue::map([("default", "blue"), (":hover", "darkblue")]))],
    );
    let styles = compile(&sheet);
    let css = styles.css();

    let blue = atomic_class_name("x", "color", "blue", None, None, None);
    let hover = atomic_class_name("x", "color", "darkblue", Some(":hover"), None, None);
    assert!(css.contains(&format!(".{}{{color:blue}}", blue)));
    assert!(css.contains(&format!(".{}:hover{{color:darkblue}}", hover)));
    assert_eq!(class_names(&styles, "link", "color"), vec![blue, hover]);
}

#[test]
fn test_identical_at_rules_last_declared_wins() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "title",
        [decl(
            "font-size",
            DeclValue::map([
                ("default", "16px"),
                ("@media (min-width: 640px)", "18px"),
                ("@media ( min-width:  640px )", "20px"),
            ]),
        )],
    );
    let css = compile(&sheet).css();
    assert!(css.contains("{font-size:20px}"));
    assert!(!css.contains("{font-size:18px}"));
}

#[test]
fn test_shorthand_cascade() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "card",
        [decl("border-color", "red"), decl("border-bottom", "1px solid")],
    );
    let css = compile(&sheet).css();
    assert!(position(&css, "{border-bottom:1px solid}") < position(&css, "{border-color:red}"));
}

#[test]
fn test_dynamic_class() {
    let mut sheet = StyleSheet::new();
    sheet.define_dynamic("fade", &["opacity"], &[("opacity", "opacity")]);
    let styles = compile(&sheet);

    let css = styles.css();
    assert!(css.contains("@property --x-opacity{syntax:'*';inherits:false}"));
    assert!(css.contains("{opacity:var(--x-opacity)}"));

    let resolved = styles.resolve(&[ClassRef::dynamic("fade", ["0.5"])]).unwrap();
    assert_eq!(resolved.inline_style.as_deref(), Some("--x-opacity: 0.5"));
    assert!(!resolved.class_string.is_empty());
}

#[test]
fn test_layers_and_specificity_hack() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "print",
        [decl("color", DeclValue::map([("default", "black"), ("@media print", "gray")]))],
    );
    let media = atomic_class_name("x", "color", "gray", None, None, Some("@media print"));

    let hacked = sheet.compile(&StyleConfig::default()).unwrap().css();
    assert!(hacked.contains(&format!("@media print{{.{0}.{0}{{color:gray}}}}", media)));

    let layered = sheet.compile(&StyleConfig::default().with_css_layers(true)).unwrap().css();
    assert!(layered.starts_with("@layer priority1, priority2, priority3;"));
    assert!(layered.contains(&format!("@layer priority3{{@media print{{.{}{{color:gray}}}}}}", media)));
}

#[test]
fn test_rtl_twin_follows_rule() {
    let mut sheet = StyleSheet::new();
    sheet.define_class("aside", [decl("float", "start")]);
    let styles = compile(&sheet);
    let class = &class_names(&styles, "aside", "float")[0];
    let rules: Vec<&str> = styles.rules().iter().map(|r| r.css_text.as_str()).collect();
    assert_eq!(
        rules,
        vec![
            format!(".{}{{float:left}}", class).as_str(),
            format!("html[dir=\"rtl\"] .{}{{float:right}}", class).as_str(),
        ]
    );
}

#[test]
fn test_flatten_and_forbid() {
    let mut sheet = StyleSheet::new();
    sheet.define_class("box", [decl("margin", "1px 2px")]);
    let flat = sheet
        .compile(&StyleConfig::default().with_shorthand_behavior(ShorthandBehavior::Flatten))
        .unwrap();
    let keys: Vec<&String> = flat.class("box").unwrap().keys().collect();
    assert_eq!(keys, ["margin-top", "margin-right", "margin-bottom", "margin-left"]);

    let mut mixed = StyleSheet::new();
    mixed.define_class("box", [decl("margin", "1px"), decl("margin-top", "2px")]);
    let forbid = StyleConfig::default().with_shorthand_behavior(ShorthandBehavior::Forbid);
    assert!(matches!(mixed.compile(&forbid), Err(StyleError::Validation { .. })));
    assert!(mixed.compile(&StyleConfig::default()).is_ok());
}

#[test]
fn test_unknown_property_suggestions() {
    let mut sheet = StyleSheet::new();
    sheet.define_class("text", [decl("colr", "red")]);
    let err = sheet.compile(&StyleConfig::default()).unwrap_err();
    assert!(err.suggestions().iter().any(|s| s == "color"), "{}", err);
}

#[test]
fn test_prefixer_and_warnings() {
    let config = StyleConfig::default()
        .with_vendor_prefixer(|property, value| {
            (property == "user-select").then(|| format!("-webkit-user-select:{}", value))
        })
        .with_deprecation_checker(|property| property == "clip");

    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "chip",
        [
            decl("user-select", "none"),
            decl("-webkit-user-select", "none"),
            decl("clip", "auto"),
        ],
    );
    let styles = sheet.compile(&config).unwrap();
    assert!(styles.css().contains("{-webkit-user-select:none;user-select:none}"));

    let kinds: Vec<WarningKind> = styles.warnings().iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&WarningKind::DeprecatedProperty));
    assert!(kinds.contains(&WarningKind::UnnecessaryPrefix));
    for warning in styles.warnings() {
        assert!(!styles.css().contains(&warning.message));
    }
}

#[test]
fn test_contextual_selector() {
    let parent_hover = ancestor(":hover", None).unwrap();
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "icon",
        [decl("opacity", DeclValue::map([("default", "0"), (parent_hover.as_str(), "1")]))],
    );
    let css = compile(&sheet).css();
    assert!(css.contains(":where(.x-default-marker:hover *){opacity:1}"), "{}", css);
}

#[test]
fn test_pseudo_element_group() {
    let mut sheet = StyleSheet::new();
    sheet.define_class(
        "quote",
        [decl(
            "::before",
            DeclValue::map([("content", "“"), ("color", "gray")]),
        )],
    );
    let styles = compile(&sheet);
    let entries = styles.class("quote").unwrap();
    assert!(matches!(entries["color:::before"], StyleSlot::Atomic(_)));
    assert!(styles.css().contains("::before{color:gray}"));
}

#[test]
fn test_themes_last_wins_per_namespace() {
    let mut sheet = StyleSheet::new();
    sheet
        .define_vars("colors", [("bg", "white")])
        .define_theme("colors", "dark", [("bg", "black")])
        .define_theme("colors", "dim", [("bg", "gray")]);
    let styles = compile(&sheet);

    let resolved = styles
        .resolve(&[ClassRef::theme("colors", "dark"), ClassRef::theme("colors", "dim")])
        .unwrap();
    assert_eq!(resolved.class_string, styles.theme("colors", "dim").unwrap());
}

#[test]
fn test_shared_registry() {
    let mut registry = RuleRegistry::new();
    let mut first = StyleSheet::new();
    first.define_class("a", [decl("color", "red")]);
    let mut second = StyleSheet::new();
    second.define_class("b", [decl("color", "red"), decl("display", "grid")]);

    first.compile_into(&StyleConfig::default(), &mut registry).unwrap();
    assert_eq!(registry.len(), 1);
    let styles = second.compile_into(&StyleConfig::default(), &mut registry).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(styles.rules().len(), 2);
}

#[test]
fn test_resolve_is_pure() {
    let mut sheet = StyleSheet::new();
    sheet
        .define_class("a", [decl("color", DeclValue::map([("default", "red"), (":focus", "blue")]))])
        .define_dynamic("w", &["width"], &[("width", "width")]);
    let styles = compile(&sheet);
    let refs = ["a".into(), ClassRef::dynamic("w", [12])];
    let first = styles.resolve(&refs).unwrap();
    for _ in 0..3 {
        assert_eq!(styles.resolve(&refs).unwrap(), first);
    }
    assert_eq!(first.inline_style.as_deref(), Some("--x-width: 12px"));
}
