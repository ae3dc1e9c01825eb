//! Declaration Values
//!
//! The input value model handed to the compiler by a front-end: scalars,
//! conditional maps, fallback lists and explicit unset markers.

use std::fmt;

/// Kind of named entity a [`TokenRef`] points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// A custom property from a `vars` group
    Var,
    /// An inlined constant
    Const,
    /// A keyframes animation name
    Keyframes,
    /// A `@position-try` dashed ident
    PositionTry,
    /// A view-transition class
    ViewTransition,
    /// A contextual-selector marker class
    Marker,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Var => "var",
            RefKind::Const => "const",
            RefKind::Keyframes => "keyframes",
            RefKind::PositionTry => "position-try",
            RefKind::ViewTransition => "view-transition",
            RefKind::Marker => "marker",
        }
    }
}

/// Reference to a named entity, resolved during compilation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub kind: RefKind,
    /// Namespace of the entity. Empty for keyframes, position-try and view transitions.
    pub namespace: String,
    pub name: String,
}

impl TokenRef {
    pub fn var(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: RefKind::Var, namespace: namespace.into(), name: name.into() }
    }

    pub fn constant(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: RefKind::Const, namespace: namespace.into(), name: name.into() }
    }

    pub fn keyframes(name: impl Into<String>) -> Self {
        Self { kind: RefKind::Keyframes, namespace: String::new(), name: name.into() }
    }

    pub fn position_try(name: impl Into<String>) -> Self {
        Self { kind: RefKind::PositionTry, namespace: String::new(), name: name.into() }
    }

    pub fn view_transition(name: impl Into<String>) -> Self {
        Self { kind: RefKind::ViewTransition, namespace: String::new(), name: name.into() }
    }

    pub fn marker(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: RefKind::Marker, namespace: namespace.into(), name: name.into() }
    }

    /// Qualified `namespace.name` (or just `name` without a namespace)
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.qualified_name())
    }
}

/// A single value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Number(f64),
    Ref(TokenRef),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<TokenRef> for Scalar {
    fn from(r: TokenRef) -> Self {
        Scalar::Ref(r)
    }
}

/// A declaration value
#[derive(Debug, Clone, PartialEq)]
pub enum DeclValue {
    /// Plain value
    Scalar(Scalar),
    /// Ordered map: either a set of conditions or a nested property group
    Map(Vec<(String, DeclValue)>),
    /// Plain fallback list, most preferred first
    Fallback(Vec<Scalar>),
    /// Explicitly marked fallback list, folding CSS variables into nested var()
    FirstThatWorks(Vec<Scalar>),
    /// Explicit unset
    Null,
}

impl DeclValue {
    /// Build a map value from ordered pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<DeclValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        DeclValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn fallback<S: Into<Scalar>, I: IntoIterator<Item = S>>(values: I) -> Self {
        DeclValue::Fallback(values.into_iter().map(Into::into).collect())
    }

    pub fn first_that_works<S: Into<Scalar>, I: IntoIterator<Item = S>>(values: I) -> Self {
        DeclValue::FirstThatWorks(values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DeclValue::Null)
    }

    /// Visit every scalar in this value, depth first
    pub fn for_each_scalar<F: FnMut(&Scalar)>(&self, f: &mut F) {
        match self {
            DeclValue::Scalar(s) => f(s),
            DeclValue::Map(entries) => {
                for (_, v) in entries {
                    v.for_each_scalar(f);
                }
            }
            DeclValue::Fallback(list) | DeclValue::FirstThatWorks(list) => {
                list.iter().for_each(|s| f(s));
            }
            DeclValue::Null => {}
        }
    }
}

impl From<Scalar> for DeclValue {
    fn from(value: Scalar) -> Self {
        DeclValue::Scalar(value)
    }
}

impl From<&str> for DeclValue {
    fn from(value: &str) -> Self {
        DeclValue::Scalar(value.into())
    }
}

impl From<String> for DeclValue {
    fn from(value: String) -> Self {
        DeclValue::Scalar(value.into())
    }
}

impl From<f64> for DeclValue {
    fn from(value: f64) -> Self {
        DeclValue::Scalar(value.into())
    }
}

impl From<i32> for DeclValue {
    fn from(value: i32) -> Self {
        DeclValue::Scalar(value.into())
    }
}

impl From<TokenRef> for DeclValue {
    fn from(value: TokenRef) -> Self {
        DeclValue::Scalar(value.into())
    }
}

/// Result of normalizing a value: one value, or several declarations
/// already in emission order (least preferred first)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedValue {
    Single(String),
    Fallbacks(Vec<String>),
}

impl NormalizedValue {
    /// Declaration block body for a property, e.g. `position:fixed;position:sticky`
    pub fn to_declarations(&self, property: &str) -> String {
        match self {
            NormalizedValue::Single(v) => format!("{}:{}", property, v),
            NormalizedValue::Fallbacks(values) => values
                .iter()
                .map(|v| format!("{}:{}", property, v))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }

    /// Text used for hashing and as the entry's value
    pub fn hash_text(&self) -> String {
        match self {
            NormalizedValue::Single(v) => v.clone(),
            NormalizedValue::Fallbacks(values) => values.join(", "),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            NormalizedValue::Single(v) => std::slice::from_ref(v),
            NormalizedValue::Fallbacks(values) => values,
        }
    }
}
