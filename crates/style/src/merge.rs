//! Style Merger
//!
//! Composes compiled classes at render time. The last ref that defines a
//! canonical property key wins; conditional bundles merge per condition.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tessera_css::normalize::format_number;
use tessera_css::properties::{is_length_property, is_time_property};
use tessera_css::selector::DEFAULT_CONDITION;
use tessera_css::Scalar;

use crate::compiler::CompiledStyles;
use crate::entry::{AtomicClassEntry, ClassEntries, StyleSlot};
use crate::error::{StyleError, StyleResult};

/// A reference to something that contributes classes
#[derive(Debug, Clone, PartialEq)]
pub enum ClassRef {
    Class(String),
    /// Dynamic class with one argument per parameter, in order
    Dynamic(String, Vec<Scalar>),
    /// `(namespace, theme)`
    Theme(String, String),
    /// Skipped
    None,
}

impl ClassRef {
    pub fn dynamic<S, I>(name: impl Into<String>, args: I) -> Self
    where
        S: Into<Scalar>,
        I: IntoIterator<Item = S>,
    {
        ClassRef::Dynamic(name.into(), args.into_iter().map(Into::into).collect())
    }

    pub fn theme(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ClassRef::Theme(namespace.into(), name.into())
    }

    /// `r` when `condition` holds, otherwise a skipped ref
    pub fn when(condition: bool, r: impl Into<ClassRef>) -> Self {
        if condition {
            r.into()
        } else {
            ClassRef::None
        }
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        ClassRef::Class(name.to_string())
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        ClassRef::Class(name)
    }
}

impl<T: Into<ClassRef>> From<Option<T>> for ClassRef {
    fn from(value: Option<T>) -> Self {
        value.map_or(ClassRef::None, Into::into)
    }
}

/// Result of merging class refs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Space-separated class names
    pub class_string: String,
    /// `--x-prop: value` pairs joined by `; `
    pub inline_style: Option<String>,
}

enum Merged<'a> {
    Atomic(&'a AtomicClassEntry),
    Bundle(IndexMap<&'a str, &'a AtomicClassEntry>),
}

/// Accumulates class refs in order
pub struct StyleMerger<'a> {
    styles: &'a CompiledStyles,
    slots: IndexMap<&'a str, Merged<'a>>,
    /// Namespace to theme class
    themes: IndexMap<String, &'a str>,
    /// Custom property to value
    inline: IndexMap<String, String>,
}

impl<'a> StyleMerger<'a> {
    pub fn new(styles: &'a CompiledStyles) -> Self {
        Self {
            styles,
            slots: IndexMap::new(),
            themes: IndexMap::new(),
            inline: IndexMap::new(),
        }
    }

    pub fn apply(&mut self, class_ref: &ClassRef) -> StyleResult<()> {
        let styles = self.styles;
        match class_ref {
            ClassRef::None => Ok(()),
            ClassRef::Class(name) => {
                let Some(entries) = styles.classes.get(name) else {
                    let reason = if styles.dynamics.contains_key(name) {
                        "dynamic class used without arguments"
                    } else {
                        "no class with this name"
                    };
                    return Err(StyleError::resolve(name, reason));
                };
                self.apply_entries(entries);
                Ok(())
            }
            ClassRef::Dynamic(name, args) => self.apply_dynamic(name, args),
            ClassRef::Theme(namespace, theme) => {
                let key = format!("{}.{}", namespace, theme);
                let Some(class) = styles.themes.get(&key) else {
                    return Err(StyleError::resolve(key, "no theme with this name"));
                };
                self.themes.shift_remove(namespace.as_str());
                self.themes.insert(namespace.clone(), class);
                Ok(())
            }
        }
    }

    fn apply_entries(&mut self, entries: &'a ClassEntries) {
        for (key, slot) in entries {
            match slot {
                StyleSlot::Atomic(entry) => {
                    self.slots.shift_remove(key.as_str());
                    if !entry.is_null {
                        self.slots.insert(key.as_str(), Merged::Atomic(entry));
                    }
                }
                StyleSlot::Bundle(bundle) => {
                    let mut conditions = match self.slots.shift_remove(key.as_str()) {
                        Some(Merged::Bundle(conditions)) => conditions,
                        Some(Merged::Atomic(entry)) => IndexMap::from([(DEFAULT_CONDITION, entry)]),
                        None => IndexMap::new(),
                    };
                    for (condition, entry) in bundle {
                        conditions.shift_remove(condition.as_str());
                        if !entry.is_null {
                            conditions.insert(condition.as_str(), entry);
                        }
                    }
                    if !conditions.is_empty() {
                        self.slots.insert(key.as_str(), Merged::Bundle(conditions));
                    }
                }
            }
        }
    }

    fn apply_dynamic(&mut self, name: &str, args: &[Scalar]) -> StyleResult<()> {
        let styles = self.styles;
        let Some(class) = styles.dynamics.get(name) else {
            return Err(StyleError::resolve(name, "no dynamic class with this name"));
        };
        if args.len() != class.params.len() {
            return Err(StyleError::resolve(
                name,
                format!("expected {} arguments, got {}", class.params.len(), args.len()),
            ));
        }

        self.apply_entries(&class.entries);
        for binding in &class.bindings {
            let Some(index) = class.params.iter().position(|p| *p == binding.param) else {
                continue;
            };
            let value = inline_value(&binding.property, &args[index])
                .ok_or_else(|| StyleError::resolve(name, format!("argument for '{}' is not a value", binding.param)))?;
            self.inline.shift_remove(&binding.custom_property);
            self.inline.insert(binding.custom_property.clone(), value);
        }
        Ok(())
    }

    pub fn finish(self) -> ResolvedStyle {
        let mut classes: SmallVec<[&str; 16]> = SmallVec::new();
        for slot in self.slots.values() {
            match slot {
                Merged::Atomic(entry) => classes.extend(entry.class_name.as_deref()),
                Merged::Bundle(conditions) => {
                    classes.extend(conditions.values().filter_map(|e| e.class_name.as_deref()))
                }
            }
        }
        classes.extend(self.themes.values().copied());

        let inline_style = if self.inline.is_empty() {
            None
        } else {
            Some(
                self.inline
                    .iter()
                    .map(|(property, value)| format!("{}: {}", property, value))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        ResolvedStyle {
            class_string: classes.join(" "),
            inline_style,
        }
    }
}

/// Inline value of a dynamic argument. Numbers get the property's unit.
fn inline_value(property: &str, arg: &Scalar) -> Option<String> {
    match arg {
        Scalar::Str(s) => Some(s.trim().to_string()),
        Scalar::Number(n) if !n.is_finite() => None,
        Scalar::Number(n) => {
            let text = format_number(*n);
            Some(if is_time_property(property) {
                format!("{}ms", text)
            } else if is_length_property(property) && *n != 0.0 {
                format!("{}px", text)
            } else {
                text
            })
        }
        Scalar::Ref(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::sheet::{decl, StyleSheet};
    use tessera_css::DeclValue;

    fn styles() -> CompiledStyles {
        let mut sheet = StyleSheet::new();
        sheet
            .define_class("red", [decl("color", "red")])
            .define_class("blue", [decl("color", "blue")])
            .define_class("unset", [decl("color", DeclValue::Null)])
            .define_class("hover", [decl("color", DeclValue::map([("default", "black"), (":hover", "gray")]))])
            .define_class("focus", [decl("color", DeclValue::map([(":focus", "green")]))])
            .define_dynamic("fade", &["opacity"], &[("opacity", "opacity")])
            .define_dynamic("sized", &["w"], &[("width", "w")]);
        sheet.compile(&StyleConfig::default()).unwrap()
    }

    fn class_of(styles: &CompiledStyles, name: &str) -> String {
        styles.class(name).unwrap()["color"]
            .entries()
            .filter_map(|e| e.class_name.clone())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_last_wins() {
        let styles = styles();
        let resolved = styles.resolve(&["red".into(), "blue".into()]).unwrap();
        assert_eq!(resolved.class_string, class_of(&styles, "blue"));
        assert_eq!(resolved.inline_style, None);
    }

    #[test]
    fn test_skipped_refs() {
        let styles = styles();
        let plain = styles.resolve(&["red".into(), "blue".into()]).unwrap();
        let with_none = styles
            .resolve(&[
                "red".into(),
                "blue".into(),
                ClassRef::None,
                ClassRef::when(false, "red"),
                Option::<&str>::None.into(),
            ])
            .unwrap();
        assert_eq!(plain, with_none);
    }

    #[test]
    fn test_null_removes() {
        let styles = styles();
        let resolved = styles.resolve(&["red".into(), "unset".into()]).unwrap();
        assert_eq!(resolved.class_string, "");
    }

    #[test]
    fn test_bundle_merges_per_condition() {
        let styles = styles();
        let resolved = styles.resolve(&["hover".into(), "focus".into()]).unwrap();
        let classes: Vec<&str> = resolved.class_string.split(' ').collect();
        assert_eq!(classes.len(), 3);
        for class in class_of(&styles, "hover").split(' ').chain(class_of(&styles, "focus").split(' ')) {
            assert!(classes.contains(&class));
        }
    }

    #[test]
    fn test_atomic_becomes_default_condition() {
        let styles = styles();
        let resolved = styles.resolve(&["red".into(), "focus".into()]).unwrap();
        assert_eq!(
            resolved.class_string,
            format!("{} {}", class_of(&styles, "red"), class_of(&styles, "focus"))
        );
    }

    #[test]
    fn test_dynamic_inline_style() {
        let styles = styles();
        let resolved = styles.resolve(&[ClassRef::dynamic("fade", ["0.5"])]).unwrap();
        assert_eq!(resolved.inline_style.as_deref(), Some("--x-opacity: 0.5"));

        let resolved = styles
            .resolve(&[ClassRef::dynamic("sized", [10]), ClassRef::dynamic("sized", [20])])
            .unwrap();
        assert_eq!(resolved.inline_style.as_deref(), Some("--x-width: 20px"));
    }

    #[test]
    fn test_resolve_errors() {
        let styles = styles();
        assert!(matches!(styles.resolve(&["missing".into()]), Err(StyleError::Resolve { .. })));
        assert!(matches!(styles.resolve(&["fade".into()]), Err(StyleError::Resolve { .. })));
        assert!(matches!(
            styles.resolve(&[ClassRef::dynamic("fade", ["1", "2"])]),
            Err(StyleError::Resolve { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let styles = styles();
        let refs = ["hover".into(), ClassRef::dynamic("fade", [0.25])];
        assert_eq!(styles.resolve(&refs).unwrap(), styles.resolve(&refs).unwrap());
    }
}
