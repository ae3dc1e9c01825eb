//! Style Compiler
//!
//! Pass 2 over a [`StyleSheet`]: walks the definitions in registration
//! order, resolves references against what is already compiled, builds
//! atomic entries and registers every emitted rule.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tessera_css::properties::dash_case;
use tessera_css::selector::parse_combined;
use tessera_css::{content_hash, normalize_leaf, DeclValue, NormalizedValue, RefKind, Scalar, TokenRef};

use crate::config::StyleConfig;
use crate::emit::{emit, CssRule};
use crate::entry::{ClassEntries, DynamicClass};
use crate::error::{PolicyWarning, ReferenceProblem, SourceLocation, StyleError, StyleResult};
use crate::merge::{ClassRef, ResolvedStyle, StyleMerger};
use crate::processors::conditional::{flatten, FlatCondition};
use crate::processors::{dynamic, process_declarations, wrap_at_rules, ProcessContext};
use crate::registry::{RegisteredRule, RuleKind, RuleRegistry};
use crate::sheet::{Declaration, DynamicSource, Entity, PropertyList, Registered, StyleSheet, VarValue};
use crate::validate::closest;

/// Properties accepted inside `@position-try`
const POSITION_TRY_PROPERTIES: &[&str] = &[
    "position-anchor",
    "position-area",
    "inset",
    "inset-block",
    "inset-block-start",
    "inset-block-end",
    "inset-inline",
    "inset-inline-start",
    "inset-inline-end",
    "top",
    "right",
    "bottom",
    "left",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "margin-block",
    "margin-block-start",
    "margin-block-end",
    "margin-inline",
    "margin-inline-start",
    "margin-inline-end",
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "block-size",
    "inline-size",
    "min-block-size",
    "min-inline-size",
    "max-block-size",
    "max-inline-size",
    "align-self",
    "justify-self",
    "place-self",
];

/// View-transition pseudo-element parts, in emission order
const VIEW_TRANSITION_PARTS: &[&str] = &["group", "image-pair", "old", "new"];

/// Custom property name of a var
pub fn var_name(prefix: &str, namespace: &str, name: &str) -> String {
    format!("--{}", content_hash(prefix, &format!("{}.{}", namespace, name)))
}

/// Class name of a marker. Deterministic, so contextual selector keys can
/// be built before the sheet is compiled.
pub fn marker_class_name(prefix: &str, namespace: &str, name: &str) -> String {
    content_hash(prefix, &format!("marker:{}.{}", namespace, name))
}

/// Output of a compile: entries per class, identities of every named
/// entity and the ordered CSS rules
#[derive(Debug, Clone, Default)]
pub struct CompiledStyles {
    pub(crate) classes: FxHashMap<String, ClassEntries>,
    pub(crate) dynamics: FxHashMap<String, DynamicClass>,
    /// `namespace.theme` to theme class
    pub(crate) themes: FxHashMap<String, String>,
    /// `namespace.name` to custom property
    pub(crate) vars: FxHashMap<String, String>,
    pub(crate) keyframes: FxHashMap<String, String>,
    pub(crate) position_tries: FxHashMap<String, String>,
    pub(crate) view_transitions: FxHashMap<String, String>,
    /// `namespace.name` to marker class
    pub(crate) markers: FxHashMap<String, String>,
    rules: Vec<CssRule>,
    warnings: Vec<PolicyWarning>,
}

impl CompiledStyles {
    pub fn class(&self, name: &str) -> Option<&ClassEntries> {
        self.classes.get(name)
    }

    pub fn dynamic(&self, name: &str) -> Option<&DynamicClass> {
        self.dynamics.get(name)
    }

    /// Custom property name of a var (`--x1a2b3c4`)
    pub fn var(&self, namespace: &str, name: &str) -> Option<&str> {
        self.vars.get(&format!("{}.{}", namespace, name)).map(String::as_str)
    }

    /// Animation name of a keyframes definition
    pub fn keyframes(&self, name: &str) -> Option<&str> {
        self.keyframes.get(name).map(String::as_str)
    }

    pub fn position_try(&self, name: &str) -> Option<&str> {
        self.position_tries.get(name).map(String::as_str)
    }

    pub fn view_transition(&self, name: &str) -> Option<&str> {
        self.view_transitions.get(name).map(String::as_str)
    }

    pub fn marker(&self, namespace: &str, name: &str) -> Option<&str> {
        self.markers.get(&format!("{}.{}", namespace, name)).map(String::as_str)
    }

    pub fn theme(&self, namespace: &str, name: &str) -> Option<&str> {
        self.themes.get(&format!("{}.{}", namespace, name)).map(String::as_str)
    }

    /// Ordered, deduplicated rules
    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// All rules as one stylesheet, one rule per line
    pub fn css(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.css_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn warnings(&self) -> &[PolicyWarning] {
        &self.warnings
    }

    /// Merge class refs into a class string and inline style
    pub fn resolve(&self, refs: &[ClassRef]) -> StyleResult<ResolvedStyle> {
        let mut merger = StyleMerger::new(self);
        for class_ref in refs {
            merger.apply(class_ref)?;
        }
        Ok(merger.finish())
    }
}

impl StyleSheet {
    /// Compile into a fresh registry
    pub fn compile(&self, config: &StyleConfig) -> StyleResult<CompiledStyles> {
        let mut registry = RuleRegistry::new();
        self.compile_into(config, &mut registry)
    }

    /// Compile into a shared registry. The emitted rules cover everything
    /// the registry holds, including rules from earlier compiles.
    pub fn compile_into(&self, config: &StyleConfig, registry: &mut RuleRegistry) -> StyleResult<CompiledStyles> {
        config.validate()?;
        if let Some((label, location)) = self.duplicates.first() {
            return Err(StyleError::validation(
                label.clone(),
                format!("defined more than once (again at {})", location),
            ));
        }

        log::debug!("Compiling {} definitions", self.len());
        let mut compiler = Compiler {
            sheet: self,
            config,
            registry: &mut *registry,
            consts: FxHashMap::default(),
            var_groups: FxHashMap::default(),
            class_declarations: FxHashMap::default(),
            output: CompiledStyles::default(),
        };
        for entity in self.entities() {
            compiler.compile_entity(entity)?;
        }

        let mut output = compiler.output;
        output.rules = emit(registry, config.use_css_layers);
        log::debug!("Emitted {} rules", output.rules.len());
        Ok(output)
    }
}

struct Compiler<'a> {
    sheet: &'a StyleSheet,
    config: &'a StyleConfig,
    registry: &'a mut RuleRegistry,
    /// `namespace.name` to resolved scalar
    consts: FxHashMap<String, Scalar>,
    /// Var names per namespace, for theme checks
    var_groups: FxHashMap<String, Vec<String>>,
    /// Resolved declarations per class, for includes
    class_declarations: FxHashMap<String, PropertyList>,
    output: CompiledStyles,
}

impl<'a> Compiler<'a> {
    fn compile_entity(&mut self, entity: Entity<'a>) -> StyleResult<()> {
        match entity {
            Entity::Class(name, def) => self.compile_class(name, def),
            Entity::Dynamic(name, def) => self.compile_dynamic(name, def),
            Entity::Vars(namespace, def) => self.compile_vars(namespace, def),
            Entity::Consts(namespace, def) => self.compile_consts(namespace, def),
            Entity::Theme((namespace, theme), def) => self.compile_theme(namespace, theme, def),
            Entity::Keyframes(name, def) => self.compile_keyframes(name, def),
            Entity::PositionTry(name, def) => self.compile_position_try(name, def),
            Entity::ViewTransition(name, def) => self.compile_view_transition(name, def),
            Entity::Marker((namespace, name), _) => {
                let class = marker_class_name(&self.config.class_prefix, namespace, name);
                self.output.markers.insert(format!("{}.{}", namespace, name), class);
                Ok(())
            }
        }
    }

    fn prefix(&self) -> &str {
        &self.config.class_prefix
    }

    fn register(&mut self, key: String, kind: RuleKind, css_text: String) {
        self.registry.insert(key, RegisteredRule::block(kind, css_text));
    }

    fn compile_class(&mut self, name: &str, def: &Registered<Vec<Declaration>>) -> StyleResult<()> {
        let mut declarations = PropertyList::new();
        for declaration in &def.body {
            match declaration {
                Declaration::Property(property, value) => {
                    declarations.push((property.clone(), self.resolve_value(value, name, &def.location)?));
                }
                Declaration::Include(other) => match self.class_declarations.get(other) {
                    Some(included) => declarations.extend(included.iter().cloned()),
                    None => {
                        if self.sheet.classes.contains_key(other) {
                            return Err(StyleError::reference(
                                name,
                                &def.location,
                                format!("class {}", other),
                                ReferenceProblem::DefinedLater,
                            ));
                        }
                        let known = self.sheet.classes.keys().map(String::as_str);
                        return Err(StyleError::reference(
                            name,
                            &def.location,
                            format!("class {}", other),
                            ReferenceProblem::Undefined,
                        )
                        .with_suggestions(closest(other, known)));
                    }
                },
            }
        }

        let mut warnings = Vec::new();
        let mut ctx = ProcessContext::new(self.config, name, &mut warnings);
        let entries = process_declarations(&mut ctx, &declarations)?;

        // Nothing is registered until the whole class has compiled
        for slot in entries.values() {
            for entry in slot.entries() {
                self.registry.insert_entry(entry);
            }
        }
        self.output.warnings.extend(warnings);
        self.class_declarations.insert(name.to_string(), declarations);
        self.output.classes.insert(name.to_string(), entries);
        Ok(())
    }

    fn compile_dynamic(&mut self, name: &str, def: &Registered<DynamicSource>) -> StyleResult<()> {
        let mut warnings = Vec::new();
        let mut ctx = ProcessContext::new(self.config, name, &mut warnings);
        let class = dynamic::process(&mut ctx, &def.body.params, &def.body.properties)?;

        for binding in &class.bindings {
            let css = format!("@property {}{{syntax:'*';inherits:false}}", binding.custom_property);
            self.register(binding.custom_property.clone(), RuleKind::DynamicProperty, css);
        }
        for slot in class.entries.values() {
            for entry in slot.entries() {
                self.registry.insert_entry(entry);
            }
        }
        self.output.warnings.extend(warnings);
        self.output.dynamics.insert(name.to_string(), class);
        Ok(())
    }

    fn compile_vars(&mut self, namespace: &str, def: &Registered<Vec<(String, VarValue)>>) -> StyleResult<()> {
        let mut names: Vec<String> = Vec::with_capacity(def.body.len());
        for (name, _) in &def.body {
            if names.contains(name) {
                return Err(StyleError::validation(
                    namespace,
                    format!("var '{}' is defined more than once", name),
                ));
            }
            names.push(name.clone());
        }

        // Identities first, so vars in one group may refer to each other
        for name in &names {
            let var = var_name(self.prefix(), namespace, name);
            self.output.vars.insert(format!("{}.{}", namespace, name), var);
        }
        self.var_groups.insert(namespace.to_string(), names);

        let mut typed_rules: Vec<(String, String)> = Vec::new();
        let mut blocks: IndexMap<Option<String>, Vec<String>> = IndexMap::new();
        for (name, var) in &def.body {
            let label = format!("{}.{}", namespace, name);
            let custom_property = var_name(self.prefix(), namespace, name);
            let value = self.resolve_value(&var.value, &label, &def.location)?;
            let conditions = var_conditions(&label, &custom_property, &value)?;

            if let Some(typed) = &var.typed {
                let mut css = format!(
                    "@property {}{{syntax:'{}';inherits:{}",
                    custom_property, typed.syntax, typed.inherits
                );
                if let Some((_, initial)) = conditions.iter().find(|(at_rule, _)| at_rule.is_none()) {
                    css.push_str(&format!(";initial-value:{}", initial));
                }
                css.push('}');
                typed_rules.push((custom_property.clone(), css));
            }

            for (at_rule, text) in conditions {
                blocks
                    .entry(at_rule)
                    .or_default()
                    .push(format!("{}:{}", custom_property, text));
            }
        }

        // Nothing is registered until the whole group has compiled
        for (custom_property, css) in typed_rules {
            self.register(custom_property, RuleKind::TypedProperty, css);
        }
        blocks.sort_by(|a, _, b, _| a.is_some().cmp(&b.is_some()));
        for (at_rule, declarations) in blocks {
            let css = wrap_at_rules(at_rule.as_deref(), format!(":root{{{}}}", declarations.join(";")));
            let key = content_hash(self.prefix(), &css);
            self.register(key, RuleKind::RootVars, css);
        }
        Ok(())
    }

    fn compile_consts(&mut self, namespace: &str, def: &Registered<Vec<(String, Scalar)>>) -> StyleResult<()> {
        for (name, value) in &def.body {
            let label = format!("{}.{}", namespace, name);
            let resolved = self.resolve_scalar(value, &label, &def.location)?;
            self.consts.insert(label, resolved);
        }
        Ok(())
    }

    fn compile_theme(&mut self, namespace: &str, theme: &str, def: &Registered<PropertyList>) -> StyleResult<()> {
        let label = format!("{}.{}", namespace, theme);
        let Some(names) = self.var_groups.get(namespace) else {
            let reason = if self.sheet.vars.contains_key(namespace) {
                ReferenceProblem::DefinedLater
            } else {
                ReferenceProblem::Undefined
            };
            return Err(StyleError::reference(
                &label,
                &def.location,
                format!("vars {}", namespace),
                reason,
            ));
        };

        if let Some((unknown, _)) = def.body.iter().find(|(name, _)| !names.contains(name)) {
            return Err(StyleError::validation(
                &label,
                format!("'{}' is not a var of '{}'", unknown, namespace),
            ));
        }

        let mut blocks: IndexMap<Option<String>, Vec<String>> = IndexMap::new();
        for (name, value) in &def.body {
            let custom_property = var_name(self.prefix(), namespace, name);
            let value = self.resolve_value(value, &label, &def.location)?;
            for (at_rule, text) in var_conditions(&label, &custom_property, &value)? {
                blocks
                    .entry(at_rule)
                    .or_default()
                    .push(format!("{}:{}", custom_property, text));
            }
        }
        blocks.sort_by(|a, _, b, _| a.is_some().cmp(&b.is_some()));
        for declarations in blocks.values_mut() {
            declarations.sort();
        }

        let identity: String = blocks
            .iter()
            .map(|(at_rule, declarations)| {
                format!("{}{{{}}}", at_rule.as_deref().unwrap_or(""), declarations.join(";"))
            })
            .collect();
        let class = content_hash(self.prefix(), &format!("theme:{}:{}", namespace, identity));

        let css: String = blocks
            .iter()
            .map(|(at_rule, declarations)| {
                wrap_at_rules(
                    at_rule.as_deref(),
                    format!(".{0},.{0}:root{{{1}}}", class, declarations.join(";")),
                )
            })
            .collect();
        self.register(class.clone(), RuleKind::Theme, css);
        self.output.themes.insert(label, class);
        Ok(())
    }

    fn compile_keyframes(&mut self, name: &str, def: &Registered<Vec<(String, PropertyList)>>) -> StyleResult<()> {
        let mut warnings = Vec::new();
        let mut body = String::new();
        for (selector, properties) in &def.body {
            let declarations = self.plain_block(name, &def.location, properties, &mut warnings)?;
            body.push_str(&format!("{}{{{}}}", frame_selector(selector), declarations.join(";")));
        }

        let animation = format!("{}-B", content_hash(self.prefix(), &body));
        self.register(animation.clone(), RuleKind::Keyframes, format!("@keyframes {}{{{}}}", animation, body));
        self.output.warnings.extend(warnings);
        self.output.keyframes.insert(name.to_string(), animation);
        Ok(())
    }

    fn compile_position_try(&mut self, name: &str, def: &Registered<PropertyList>) -> StyleResult<()> {
        if let Some((property, _)) = def
            .body
            .iter()
            .find(|(property, _)| !POSITION_TRY_PROPERTIES.contains(&dash_case(property).as_str()))
        {
            return Err(StyleError::validation(
                name,
                format!(
                    "'{}' is not allowed in @position-try; use positioning, inset, margin, sizing or self-alignment properties",
                    dash_case(property)
                ),
            ));
        }

        let mut warnings = Vec::new();
        let declarations = self.plain_block(name, &def.location, &def.body, &mut warnings)?;
        let body = declarations.join(";");
        let ident = format!("--{}", content_hash(self.prefix(), &body));
        self.register(ident.clone(), RuleKind::PositionTry, format!("@position-try {}{{{}}}", ident, body));
        self.output.warnings.extend(warnings);
        self.output.position_tries.insert(name.to_string(), ident);
        Ok(())
    }

    fn compile_view_transition(
        &mut self,
        name: &str,
        def: &Registered<Vec<(String, PropertyList)>>,
    ) -> StyleResult<()> {
        let mut warnings = Vec::new();
        let mut parts: FxHashMap<&str, Vec<String>> = FxHashMap::default();
        for (part, properties) in &def.body {
            let Some(part) = VIEW_TRANSITION_PARTS.iter().find(|p| **p == part.as_str()) else {
                return Err(StyleError::validation(
                    name,
                    format!(
                        "unknown view-transition part '{}' (expected {})",
                        part,
                        VIEW_TRANSITION_PARTS.join(", ")
                    ),
                ));
            };
            let declarations = self.plain_block(name, &def.location, properties, &mut warnings)?;
            parts.insert(*part, declarations);
        }

        let ordered: Vec<(&str, String)> = VIEW_TRANSITION_PARTS
            .iter()
            .filter_map(|part| parts.get(part).map(|d| (*part, d.join(";"))))
            .collect();
        let identity: String = ordered
            .iter()
            .map(|(part, body)| format!("{}{{{}}}", part, body))
            .collect();
        let class = content_hash(self.prefix(), &format!("view-transition:{}", identity));
        let css: String = ordered
            .iter()
            .map(|(part, body)| format!("::view-transition-{}(*.{}){{{}}}", part, class, body))
            .collect();

        self.register(class.clone(), RuleKind::ViewTransition, css);
        self.output.warnings.extend(warnings);
        self.output.view_transitions.insert(name.to_string(), class);
        Ok(())
    }

    /// Validated, normalized `property:value` declarations sorted by
    /// property. Conditions and unsets are rejected.
    fn plain_block(
        &self,
        definition: &str,
        location: &SourceLocation,
        properties: &PropertyList,
        warnings: &mut Vec<PolicyWarning>,
    ) -> StyleResult<Vec<String>> {
        let mut ctx = ProcessContext::new(self.config, definition, warnings);
        let mut declarations: IndexMap<String, String> = IndexMap::new();
        for (key, value) in properties {
            let property = dash_case(key);
            ctx.validate(&property)?;
            let value = self.resolve_value(value, definition, location)?;
            if matches!(value, DeclValue::Map(_) | DeclValue::Null) {
                return Err(StyleError::validation(
                    definition,
                    format!("'{}' takes a plain value here", property),
                ));
            }
            let normalized = normalize_leaf(&property, &value)?;
            ctx.check_prefixes(&property, &normalized);
            declarations.insert(property.clone(), normalized.to_declarations(&property));
        }
        declarations.sort_keys();
        Ok(declarations.into_values().collect())
    }

    fn resolve_value(&self, value: &DeclValue, definition: &str, location: &SourceLocation) -> StyleResult<DeclValue> {
        Ok(match value {
            DeclValue::Scalar(scalar) => DeclValue::Scalar(self.resolve_scalar(scalar, definition, location)?),
            DeclValue::Map(entries) => DeclValue::Map(
                entries
                    .iter()
                    .map(|(key, inner)| Ok((key.clone(), self.resolve_value(inner, definition, location)?)))
                    .collect::<StyleResult<_>>()?,
            ),
            DeclValue::Fallback(list) => DeclValue::Fallback(self.resolve_list(list, definition, location)?),
            DeclValue::FirstThatWorks(list) => {
                DeclValue::FirstThatWorks(self.resolve_list(list, definition, location)?)
            }
            DeclValue::Null => DeclValue::Null,
        })
    }

    fn resolve_list(&self, list: &[Scalar], definition: &str, location: &SourceLocation) -> StyleResult<Vec<Scalar>> {
        list.iter()
            .map(|scalar| self.resolve_scalar(scalar, definition, location))
            .collect()
    }

    fn resolve_scalar(&self, scalar: &Scalar, definition: &str, location: &SourceLocation) -> StyleResult<Scalar> {
        match scalar {
            Scalar::Ref(target) => self.lookup(target, definition, location),
            other => Ok(other.clone()),
        }
    }

    /// Literal a reference stands for. Only entities compiled so far are
    /// visible.
    fn lookup(&self, target: &TokenRef, definition: &str, location: &SourceLocation) -> StyleResult<Scalar> {
        let key = target.qualified_name();
        let found = match target.kind {
            RefKind::Var => self.output.vars.get(&key).map(|var| Scalar::Str(format!("var({})", var))),
            RefKind::Const => self.consts.get(&key).cloned(),
            RefKind::Keyframes => self.output.keyframes.get(&key).cloned().map(Scalar::Str),
            RefKind::PositionTry => self.output.position_tries.get(&key).cloned().map(Scalar::Str),
            RefKind::ViewTransition => self.output.view_transitions.get(&key).cloned().map(Scalar::Str),
            RefKind::Marker => self.output.markers.get(&key).cloned().map(Scalar::Str),
        };
        found.ok_or_else(|| {
            let target_name = target.to_string();
            if self.sheet.is_defined(target) {
                return StyleError::reference(definition, location, target_name, ReferenceProblem::DefinedLater);
            }
            let names = self.sheet.names(target.kind);
            StyleError::reference(definition, location, target_name, ReferenceProblem::Undefined)
                .with_suggestions(closest(&key, names.iter().map(String::as_str)))
        })
    }
}

/// `(at-rule, value)` pairs of a var value. Vars take at-rule conditions
/// only; the default value has no at-rule.
fn var_conditions(definition: &str, custom_property: &str, value: &DeclValue) -> StyleResult<Vec<(Option<String>, String)>> {
    match value {
        DeclValue::Null => Err(StyleError::validation(definition, "vars cannot be unset")),
        DeclValue::Map(map) => {
            let mut out = Vec::new();
            for FlatCondition { condition, value } in flatten(definition, custom_property, map)? {
                let parsed = parse_combined(&condition)?;
                if let Some(suffix) = parsed.suffix {
                    return Err(StyleError::validation(
                        definition,
                        format!("vars take at-rule conditions only, got '{}'", suffix),
                    ));
                }
                if value.is_null() {
                    return Err(StyleError::validation(definition, "vars cannot be unset"));
                }
                out.push((parsed.at_rule, var_text(definition, custom_property, value)?));
            }
            Ok(out)
        }
        _ => Ok(vec![(None, var_text(definition, custom_property, value)?)]),
    }
}

fn var_text(definition: &str, custom_property: &str, value: &DeclValue) -> StyleResult<String> {
    match normalize_leaf(custom_property, value)? {
        NormalizedValue::Single(text) => Ok(text),
        NormalizedValue::Fallbacks(_) => Err(StyleError::validation(
            definition,
            "vars take a single value, not a fallback list",
        )),
    }
}

/// `from`, `to` and percentages, lowercased with list separators tightened
fn frame_selector(selector: &str) -> String {
    selector
        .split(',')
        .map(|part| part.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{decl, include};

    fn compile(sheet: &StyleSheet) -> CompiledStyles {
        sheet.compile(&StyleConfig::default()).unwrap()
    }

    #[test]
    fn test_var_reference() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_vars("colors", [("primary", "blue")])
            .define_class("button", [decl("color", TokenRef::var("colors", "primary"))]);
        let styles = compile(&sheet);

        let var = styles.var("colors", "primary").unwrap().to_string();
        assert!(var.starts_with("--x"));
        assert!(styles.css().contains(&format!(":root{{{}:blue}}", var)));
        assert!(styles.css().contains(&format!("{{color:var({})}}", var)));
    }

    #[test]
    fn test_forward_reference() {
        let mut sheet = StyleSheet::new();
        sheet
            .at(SourceLocation::new("app.rs", 1, 1))
            .define_class("button", [decl("color", TokenRef::var("colors", "primary"))])
            .define_vars("colors", [("primary", "blue")]);
        let err = sheet.compile(&StyleConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StyleError::Reference { reason: ReferenceProblem::DefinedLater, .. }
        ));
    }

    #[test]
    fn test_undefined_reference() {
        let mut sheet = StyleSheet::new();
        sheet.define_class("button", [decl("animation-name", TokenRef::keyframes("spin"))]);
        let err = sheet.compile(&StyleConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StyleError::Reference { reason: ReferenceProblem::Undefined, .. }
        ));
    }

    #[test]
    fn test_undefined_reference_suggests() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_vars("colors", [("primary", "blue")])
            .define_class("button", [decl("color", TokenRef::var("colors", "primray"))])
            .define_class("link", [decl("color", "red")]);
        let err = sheet.compile(&StyleConfig::default()).unwrap_err();
        assert_eq!(err.suggestions(), ["colors.primary".to_string()]);

        let mut sheet = StyleSheet::new();
        sheet
            .define_class("button", [decl("color", "red")])
            .define_class("link", [include("buton")]);
        let err = sheet.compile(&StyleConfig::default()).unwrap_err();
        assert!(matches!(err, StyleError::Reference { reason: ReferenceProblem::Undefined, .. }));
        assert_eq!(err.suggestions(), ["button".to_string()]);
    }

    #[test]
    fn test_consts_inline() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_consts("space", [("md", 16)])
            .define_class("card", [decl("padding", TokenRef::constant("space", "md"))]);
        let styles = compile(&sheet);
        assert!(styles.css().contains("{padding:16px}"));
    }

    #[test]
    fn test_var_at_rule_block() {
        let mut sheet = StyleSheet::new();
        sheet.define_vars(
            "colors",
            [(
                "text",
                DeclValue::map([("default", "black"), ("@media (prefers-color-scheme: dark)", "white")]),
            )],
        );
        let styles = compile(&sheet);
        let var = styles.var("colors", "text").unwrap();
        assert!(styles.css().contains(&format!(
            "@media (prefers-color-scheme: dark){{:root{{{}:white}}}}",
            var
        )));
    }

    #[test]
    fn test_var_rejects_pseudo_condition() {
        let mut sheet = StyleSheet::new();
        sheet.define_vars("colors", [("text", DeclValue::map([("default", "black"), (":hover", "red")]))]);
        assert!(matches!(
            sheet.compile(&StyleConfig::default()),
            Err(StyleError::Validation { .. })
        ));
    }

    #[test]
    fn test_typed_var() {
        let mut sheet = StyleSheet::new();
        sheet.define_vars("colors", [("accent", VarValue::typed("<color>", "red"))]);
        let styles = compile(&sheet);
        let var = styles.var("colors", "accent").unwrap();
        assert_eq!(
            styles.rules()[0].css_text,
            format!("@property {}{{syntax:'<color>';inherits:true;initial-value:red}}", var)
        );
    }

    #[test]
    fn test_keyframes_identity() {
        let mut a = StyleSheet::new();
        a.define_keyframes("fade", [("from", [("opacity", 0)]), ("to", [("opacity", 1)])]);
        let mut b = StyleSheet::new();
        b.define_keyframes("appear", [("FROM", [("opacity", 0)]), ("to", [("opacity", 1)])]);

        let a = compile(&a);
        let b = compile(&b);
        let name = a.keyframes("fade").unwrap();
        assert!(name.ends_with("-B"));
        assert_eq!(Some(name), b.keyframes("appear"));
        assert_eq!(a.css(), format!("@keyframes {}{{from{{opacity:0}}to{{opacity:1}}}}", name));
    }

    #[test]
    fn test_position_try_restrictions() {
        let mut sheet = StyleSheet::new();
        sheet.define_position_try("below", [("top", "anchor(bottom)"), ("positionArea", "bottom")]);
        let styles = compile(&sheet);
        let ident = styles.position_try("below").unwrap();
        assert!(ident.starts_with("--x"));
        assert!(styles.css().starts_with(&format!("@position-try {}{{", ident)));

        let mut bad = StyleSheet::new();
        bad.define_position_try("below", [("color", "red")]);
        assert!(matches!(bad.compile(&StyleConfig::default()), Err(StyleError::Validation { .. })));
    }

    #[test]
    fn test_view_transition() {
        let mut sheet = StyleSheet::new();
        sheet.define_view_transition(
            "slide",
            [("old", [("animation-duration", "200ms")]), ("group", [("animation-duration", "1s")])],
        );
        let styles = compile(&sheet);
        let class = styles.view_transition("slide").unwrap();
        assert_eq!(
            styles.css(),
            format!(
                "::view-transition-group(*.{0}){{animation-duration:1s}}::view-transition-old(*.{0}){{animation-duration:.2s}}",
                class
            )
        );

        let mut bad = StyleSheet::new();
        bad.define_view_transition("slide", [("middle", [("opacity", 0)])]);
        assert!(bad.compile(&StyleConfig::default()).is_err());
    }

    #[test]
    fn test_theme_subset() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_vars("colors", [("bg", "white"), ("fg", "black")])
            .define_theme("colors", "dark", [("bg", "black")]);
        let styles = compile(&sheet);
        let class = styles.theme("colors", "dark").unwrap();
        let var = styles.var("colors", "bg").unwrap();
        let last = styles.rules().last().unwrap();
        assert_eq!(last.css_text, format!(".{0},.{0}:root{{{1}:black}}", class, var));

        let mut bad = StyleSheet::new();
        bad.define_vars("colors", [("bg", "white")])
            .define_theme("colors", "dark", [("border", "black")]);
        assert!(matches!(bad.compile(&StyleConfig::default()), Err(StyleError::Validation { .. })));
    }

    #[test]
    fn test_include() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_class("base", [decl("color", "red"), decl("display", "block")])
            .define_class("button", [include("base"), decl("color", "blue")]);
        let styles = compile(&sheet);
        let button = styles.class("button").unwrap();
        assert_eq!(button.len(), 2);
        assert_eq!(button["color"].entries().next().unwrap().value, "blue");

        let mut forward = StyleSheet::new();
        forward
            .define_class("button", [include("base")])
            .define_class("base", [decl("color", "red")]);
        assert!(matches!(
            forward.compile(&StyleConfig::default()),
            Err(StyleError::Reference { reason: ReferenceProblem::DefinedLater, .. })
        ));
    }

    #[test]
    fn test_failed_class_registers_nothing() {
        let mut sheet = StyleSheet::new();
        sheet.define_class("broken", [decl("color", "red"), decl("colr", "blue")]);
        let mut registry = RuleRegistry::new();
        assert!(sheet.compile_into(&StyleConfig::default(), &mut registry).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_var_group_registers_nothing() {
        let mut sheet = StyleSheet::new();
        sheet.define_vars(
            "colors",
            [
                ("accent", VarValue::typed("<color>", "red")),
                ("bad", VarValue::from(DeclValue::Null)),
            ],
        );
        let mut registry = RuleRegistry::new();
        assert!(sheet.compile_into(&StyleConfig::default(), &mut registry).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_definition() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_class("a", [decl("color", "red")])
            .define_class("a", [decl("color", "blue")]);
        assert!(matches!(sheet.compile(&StyleConfig::default()), Err(StyleError::Validation { .. })));
    }

    #[test]
    fn test_marker_reference() {
        let mut sheet = StyleSheet::new();
        sheet.define_marker("card", "root");
        let styles = compile(&sheet);
        assert_eq!(
            styles.marker("card", "root"),
            Some(marker_class_name("x", "card", "root").as_str())
        );
    }
}
