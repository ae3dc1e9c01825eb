//! Style Sheet builder
//!
//! Registration API for every named entity (pass 1). Each definition gets
//! a sequence number and the current source location; references are
//! only resolved when the sheet is compiled.

use indexmap::IndexMap;
use tessera_css::{DeclValue, RefKind, Scalar, TokenRef};

use crate::error::SourceLocation;

/// Ordered `(property, value)` list
pub type PropertyList = Vec<(String, DeclValue)>;

/// One entry of a class definition
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Property(String, DeclValue),
    /// Splice an earlier class's declarations here
    Include(String),
}

/// `property: value` declaration
pub fn decl(property: impl Into<String>, value: impl Into<DeclValue>) -> Declaration {
    Declaration::Property(property.into(), value.into())
}

/// Include another class's declarations
pub fn include(class: impl Into<String>) -> Declaration {
    Declaration::Include(class.into())
}

/// `@property` typing of a var
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarType {
    /// CSS syntax descriptor, e.g. `<color>`
    pub syntax: String,
    pub inherits: bool,
}

/// Value of a var, optionally typed
#[derive(Debug, Clone, PartialEq)]
pub struct VarValue {
    pub value: DeclValue,
    pub typed: Option<VarType>,
}

impl VarValue {
    /// A var that also registers `@property` with the given syntax
    pub fn typed(syntax: impl Into<String>, value: impl Into<DeclValue>) -> Self {
        Self {
            value: value.into(),
            typed: Some(VarType { syntax: syntax.into(), inherits: true }),
        }
    }

    pub fn inherits(mut self, inherits: bool) -> Self {
        if let Some(typed) = &mut self.typed {
            typed.inherits = inherits;
        }
        self
    }
}

impl From<DeclValue> for VarValue {
    fn from(value: DeclValue) -> Self {
        Self { value, typed: None }
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        DeclValue::from(value).into()
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        DeclValue::from(value).into()
    }
}

impl From<f64> for VarValue {
    fn from(value: f64) -> Self {
        DeclValue::from(value).into()
    }
}

impl From<i32> for VarValue {
    fn from(value: i32) -> Self {
        DeclValue::from(value).into()
    }
}

impl From<TokenRef> for VarValue {
    fn from(value: TokenRef) -> Self {
        DeclValue::from(value).into()
    }
}

/// A dynamic class before compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSource {
    pub params: Vec<String>,
    /// `(property, parameter)`
    pub properties: Vec<(String, String)>,
}

/// A registered definition
#[derive(Debug, Clone, PartialEq)]
pub struct Registered<T> {
    /// Registration order across all entity kinds
    pub seq: usize,
    pub location: SourceLocation,
    pub body: T,
}

/// A registered definition, borrowed from the sheet
#[derive(Debug, Clone, Copy)]
pub(crate) enum Entity<'a> {
    Class(&'a str, &'a Registered<Vec<Declaration>>),
    Dynamic(&'a str, &'a Registered<DynamicSource>),
    Vars(&'a str, &'a Registered<Vec<(String, VarValue)>>),
    Consts(&'a str, &'a Registered<Vec<(String, Scalar)>>),
    Theme(&'a (String, String), &'a Registered<PropertyList>),
    Keyframes(&'a str, &'a Registered<Vec<(String, PropertyList)>>),
    PositionTry(&'a str, &'a Registered<PropertyList>),
    ViewTransition(&'a str, &'a Registered<Vec<(String, PropertyList)>>),
    Marker(&'a (String, String), &'a Registered<()>),
}

/// Collected style definitions
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    next_seq: usize,
    location: SourceLocation,
    pub(crate) classes: IndexMap<String, Registered<Vec<Declaration>>>,
    pub(crate) dynamics: IndexMap<String, Registered<DynamicSource>>,
    pub(crate) vars: IndexMap<String, Registered<Vec<(String, VarValue)>>>,
    pub(crate) consts: IndexMap<String, Registered<Vec<(String, Scalar)>>>,
    pub(crate) themes: IndexMap<(String, String), Registered<PropertyList>>,
    pub(crate) keyframes: IndexMap<String, Registered<Vec<(String, PropertyList)>>>,
    pub(crate) position_tries: IndexMap<String, Registered<PropertyList>>,
    pub(crate) view_transitions: IndexMap<String, Registered<Vec<(String, PropertyList)>>>,
    pub(crate) markers: IndexMap<(String, String), Registered<()>>,
    /// Names registered twice, reported at compile time
    pub(crate) duplicates: Vec<(String, SourceLocation)>,
}

fn pairs<K, V, I, T>(items: I) -> Vec<(String, T)>
where
    K: Into<String>,
    V: Into<T>,
    I: IntoIterator<Item = (K, V)>,
{
    items.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

fn nested<K, P, K2, V, I>(items: I) -> Vec<(String, PropertyList)>
where
    K: Into<String>,
    P: IntoIterator<Item = (K2, V)>,
    K2: Into<String>,
    V: Into<DeclValue>,
    I: IntoIterator<Item = (K, P)>,
{
    items.into_iter().map(|(k, props)| (k.into(), pairs(props))).collect()
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source location attached to the following definitions
    pub fn at(&mut self, location: SourceLocation) -> &mut Self {
        self.location = location;
        self
    }

    fn register<K, T>(&mut self, kind: &str, key: K, label: String, body: T) -> (K, Registered<T>)
    where
        K: std::hash::Hash + Eq,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        log::debug!("Registered {} '{}' (#{})", kind, label, seq);
        (key, Registered { seq, location: self.location.clone(), body })
    }

    fn insert<K, T>(
        map: &mut IndexMap<K, Registered<T>>,
        duplicates: &mut Vec<(String, SourceLocation)>,
        label: String,
        (key, entity): (K, Registered<T>),
    ) where
        K: std::hash::Hash + Eq,
    {
        if map.contains_key(&key) {
            duplicates.push((label, entity.location.clone()));
        }
        map.insert(key, entity);
    }

    /// Define a static class
    pub fn define_class<I>(&mut self, name: impl Into<String>, declarations: I) -> &mut Self
    where
        I: IntoIterator<Item = Declaration>,
    {
        let name = name.into();
        let entry = self.register("class", name.clone(), name.clone(), declarations.into_iter().collect());
        Self::insert(&mut self.classes, &mut self.duplicates, format!("class {}", name), entry);
        self
    }

    /// Define a dynamic class: ordered parameters and `(property, parameter)` bindings
    pub fn define_dynamic(&mut self, name: impl Into<String>, params: &[&str], properties: &[(&str, &str)]) -> &mut Self {
        let name = name.into();
        let body = DynamicSource {
            params: params.iter().map(|p| p.to_string()).collect(),
            properties: properties.iter().map(|(p, a)| (p.to_string(), a.to_string())).collect(),
        };
        let entry = self.register("dynamic class", name.clone(), name.clone(), body);
        Self::insert(&mut self.dynamics, &mut self.duplicates, format!("dynamic class {}", name), entry);
        self
    }

    /// Define a group of CSS custom properties
    pub fn define_vars<K, V, I>(&mut self, namespace: impl Into<String>, vars: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<VarValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let namespace = namespace.into();
        let entry = self.register("vars", namespace.clone(), namespace.clone(), pairs(vars));
        Self::insert(&mut self.vars, &mut self.duplicates, format!("vars {}", namespace), entry);
        self
    }

    /// Define a group of inlined constants
    pub fn define_consts<K, V, I>(&mut self, namespace: impl Into<String>, consts: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        let namespace = namespace.into();
        let entry = self.register("consts", namespace.clone(), namespace.clone(), pairs(consts));
        Self::insert(&mut self.consts, &mut self.duplicates, format!("consts {}", namespace), entry);
        self
    }

    /// Define a theme overriding vars of an earlier group
    pub fn define_theme<K, V, I>(&mut self, namespace: impl Into<String>, theme: impl Into<String>, overrides: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<DeclValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let key = (namespace.into(), theme.into());
        let label = format!("{}.{}", key.0, key.1);
        let entry = self.register("theme", key, label.clone(), pairs(overrides));
        Self::insert(&mut self.themes, &mut self.duplicates, format!("theme {}", label), entry);
        self
    }

    /// Define keyframes from `(frame selector, properties)` pairs
    pub fn define_keyframes<K, P, K2, V, I>(&mut self, name: impl Into<String>, frames: I) -> &mut Self
    where
        K: Into<String>,
        P: IntoIterator<Item = (K2, V)>,
        K2: Into<String>,
        V: Into<DeclValue>,
        I: IntoIterator<Item = (K, P)>,
    {
        let name = name.into();
        let entry = self.register("keyframes", name.clone(), name.clone(), nested(frames));
        Self::insert(&mut self.keyframes, &mut self.duplicates, format!("keyframes {}", name), entry);
        self
    }

    /// Define a `@position-try` fallback
    pub fn define_position_try<K, V, I>(&mut self, name: impl Into<String>, declarations: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<DeclValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let name = name.into();
        let entry = self.register("position-try", name.clone(), name.clone(), pairs(declarations));
        Self::insert(&mut self.position_tries, &mut self.duplicates, format!("position-try {}", name), entry);
        self
    }

    /// Define a view-transition class from `(part, properties)` pairs
    pub fn define_view_transition<K, P, K2, V, I>(&mut self, name: impl Into<String>, parts: I) -> &mut Self
    where
        K: Into<String>,
        P: IntoIterator<Item = (K2, V)>,
        K2: Into<String>,
        V: Into<DeclValue>,
        I: IntoIterator<Item = (K, P)>,
    {
        let name = name.into();
        let entry = self.register("view-transition", name.clone(), name.clone(), nested(parts));
        Self::insert(&mut self.view_transitions, &mut self.duplicates, format!("view-transition {}", name), entry);
        self
    }

    /// Define a marker class for contextual selectors
    pub fn define_marker(&mut self, namespace: impl Into<String>, name: impl Into<String>) -> &mut Self {
        let key = (namespace.into(), name.into());
        let label = format!("{}.{}", key.0, key.1);
        let entry = self.register("marker", key, label.clone(), ());
        Self::insert(&mut self.markers, &mut self.duplicates, format!("marker {}", label), entry);
        self
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.next_seq == 0
    }

    /// All definitions in registration order
    pub(crate) fn entities(&self) -> Vec<Entity<'_>> {
        let mut all: Vec<(usize, Entity<'_>)> = Vec::with_capacity(self.next_seq);
        all.extend(self.classes.iter().map(|(k, e)| (e.seq, Entity::Class(k, e))));
        all.extend(self.dynamics.iter().map(|(k, e)| (e.seq, Entity::Dynamic(k, e))));
        all.extend(self.vars.iter().map(|(k, e)| (e.seq, Entity::Vars(k, e))));
        all.extend(self.consts.iter().map(|(k, e)| (e.seq, Entity::Consts(k, e))));
        all.extend(self.themes.iter().map(|(k, e)| (e.seq, Entity::Theme(k, e))));
        all.extend(self.keyframes.iter().map(|(k, e)| (e.seq, Entity::Keyframes(k, e))));
        all.extend(self.position_tries.iter().map(|(k, e)| (e.seq, Entity::PositionTry(k, e))));
        all.extend(self.view_transitions.iter().map(|(k, e)| (e.seq, Entity::ViewTransition(k, e))));
        all.extend(self.markers.iter().map(|(k, e)| (e.seq, Entity::Marker(k, e))));
        all.sort_by_key(|(seq, _)| *seq);
        all.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Whether a referenced entity exists anywhere in the sheet
    /// Qualified names of every entity of `kind`, in registration order
    pub(crate) fn names(&self, kind: RefKind) -> Vec<String> {
        fn grouped<T>(groups: &IndexMap<String, Registered<Vec<(String, T)>>>) -> Vec<String> {
            groups
                .iter()
                .flat_map(|(namespace, group)| group.body.iter().map(move |(name, _)| format!("{}.{}", namespace, name)))
                .collect()
        }
        match kind {
            RefKind::Var => grouped(&self.vars),
            RefKind::Const => grouped(&self.consts),
            RefKind::Keyframes => self.keyframes.keys().cloned().collect(),
            RefKind::PositionTry => self.position_tries.keys().cloned().collect(),
            RefKind::ViewTransition => self.view_transitions.keys().cloned().collect(),
            RefKind::Marker => self
                .markers
                .keys()
                .map(|(namespace, name)| format!("{}.{}", namespace, name))
                .collect(),
        }
    }

    pub(crate) fn is_defined(&self, target: &TokenRef) -> bool {
        let namespace = target.namespace.as_str();
        let name = target.name.as_str();
        match target.kind {
            RefKind::Var => self
                .vars
                .get(namespace)
                .is_some_and(|group| group.body.iter().any(|(n, _)| n == name)),
            RefKind::Const => self
                .consts
                .get(namespace)
                .is_some_and(|group| group.body.iter().any(|(n, _)| n == name)),
            RefKind::Keyframes => self.keyframes.contains_key(name),
            RefKind::PositionTry => self.position_tries.contains_key(name),
            RefKind::ViewTransition => self.view_transitions.contains_key(name),
            RefKind::Marker => self
                .markers
                .contains_key(&(namespace.to_string(), name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let mut sheet = StyleSheet::new();
        sheet
            .define_vars("colors", [("primary", "blue")])
            .define_class("button", [decl("color", "red")])
            .define_keyframes("fade", [("from", [("opacity", 0)]), ("to", [("opacity", 1)])]);

        assert_eq!(sheet.len(), 3);
        let kinds: Vec<&str> = sheet
            .entities()
            .iter()
            .map(|entity| match entity {
                Entity::Vars(..) => "vars",
                Entity::Class(..) => "class",
                Entity::Keyframes(..) => "keyframes",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["vars", "class", "keyframes"]);
    }

    #[test]
    fn test_location_is_attached() {
        let mut sheet = StyleSheet::new();
        sheet
            .at(SourceLocation::new("app.rs", 4, 2))
            .define_class("button", [decl("color", "red")]);
        assert_eq!(sheet.classes["button"].location, SourceLocation::new("app.rs", 4, 2));
    }

    #[test]
    fn test_duplicates_recorded() {
        let mut sheet = StyleSheet::new();
        sheet.define_class("a", [decl("color", "red")]);
        sheet.define_class("a", [decl("color", "blue")]);
        assert_eq!(sheet.duplicates.len(), 1);
        assert_eq!(sheet.duplicates[0].0, "class a");
    }

    #[test]
    fn test_is_defined() {
        let mut sheet = StyleSheet::new();
        sheet.define_vars("colors", [("primary", "blue")]);
        assert!(sheet.is_defined(&TokenRef::var("colors", "primary")));
        assert!(!sheet.is_defined(&TokenRef::var("colors", "secondary")));
        assert!(!sheet.is_defined(&TokenRef::keyframes("fade")));
    }

    #[test]
    fn test_typed_var() {
        let value = VarValue::typed("<color>", "red").inherits(false);
        assert_eq!(value.typed, Some(VarType { syntax: "<color>".into(), inherits: false }));
    }
}
