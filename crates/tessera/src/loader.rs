//! JSON definition loader
//!
//! Reads a document of the form
//!
//! ```json
//! {
//!   "config": { "shorthand_behavior": "flatten", "use_css_layers": true },
//!   "definitions": [
//!     { "kind": "vars", "namespace": "colors", "values": { "primary": "blue" } },
//!     { "kind": "class", "name": "button",
//!       "declarations": { "color": { "$var": "colors.primary" }, "padding": 4 } }
//!   ]
//! }
//! ```
//!
//! Definitions are registered in document order. Object keys keep their
//! written order, which matters for last-wins declarations.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use tessera_css::{DeclValue, RefKind, Scalar, TokenRef};
use tessera_style::{Declaration, ShorthandBehavior, SourceLocation, StyleConfig, StyleError, StyleSheet, VarValue};

/// Declaration key that splices other classes in place
const INCLUDE_KEY: &str = "$include";

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Definition #{index}: {message}")]
    Invalid { index: usize, message: String },

    #[error(transparent)]
    Style(#[from] StyleError),
}

#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub config: ConfigInput,
    #[serde(default)]
    pub definitions: Vec<DefinitionInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigInput {
    pub shorthand_behavior: Option<String>,
    pub use_css_layers: Option<bool>,
    pub class_prefix: Option<String>,
    pub legacy_value_flipping: Option<bool>,
    pub allowed_properties: Vec<String>,
}

impl ConfigInput {
    pub fn into_config(self) -> LoadResult<StyleConfig> {
        let mut config = StyleConfig::default();
        if let Some(behavior) = self.shorthand_behavior {
            config = config.with_shorthand_behavior(behavior.parse::<ShorthandBehavior>()?);
        }
        if let Some(enabled) = self.use_css_layers {
            config = config.with_css_layers(enabled);
        }
        if let Some(prefix) = self.class_prefix {
            config = config.with_class_prefix(prefix);
        }
        if let Some(enabled) = self.legacy_value_flipping {
            config = config.with_legacy_value_flipping(enabled);
        }
        for property in self.allowed_properties {
            config = config.with_allowed_property(property);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefinitionInput {
    Class {
        name: String,
        #[serde(default)]
        declarations: Map<String, Value>,
    },
    Dynamic {
        name: String,
        params: Vec<String>,
        /// Property to parameter
        properties: Map<String, Value>,
    },
    Vars {
        namespace: String,
        values: Map<String, Value>,
    },
    Consts {
        namespace: String,
        values: Map<String, Value>,
    },
    Theme {
        namespace: String,
        name: String,
        overrides: Map<String, Value>,
    },
    Keyframes {
        name: String,
        frames: Map<String, Value>,
    },
    PositionTry {
        name: String,
        declarations: Map<String, Value>,
    },
    ViewTransition {
        name: String,
        parts: Map<String, Value>,
    },
    Marker {
        namespace: String,
        name: String,
    },
}

/// Parse a document into its configuration and a populated sheet.
/// Each definition's location is `<path>:<definition number>:0`.
pub fn load(source: &str, path: &str) -> LoadResult<(StyleConfig, StyleSheet)> {
    let document: Document = serde_json::from_str(source)?;
    let config = document.config.into_config()?;

    let mut sheet = StyleSheet::new();
    for (index, definition) in document.definitions.into_iter().enumerate() {
        let number = index + 1;
        sheet.at(SourceLocation::new(path, number as u32, 0));
        register(&mut sheet, definition).map_err(|message| LoadError::Invalid { index: number, message })?;
    }
    log::debug!("Loaded {} definitions from {}", sheet.len(), path);
    Ok((config, sheet))
}

fn register(sheet: &mut StyleSheet, definition: DefinitionInput) -> Result<(), String> {
    match definition {
        DefinitionInput::Class { name, declarations } => {
            let mut list = Vec::with_capacity(declarations.len());
            for (key, value) in &declarations {
                if key == INCLUDE_KEY {
                    list.extend(includes(value)?);
                } else {
                    list.push(Declaration::Property(key.clone(), decl_value(value)?));
                }
            }
            sheet.define_class(name, list);
        }
        DefinitionInput::Dynamic { name, params, properties } => {
            let mut bindings = Vec::with_capacity(properties.len());
            for (property, param) in &properties {
                let Value::String(param) = param else {
                    return Err(format!("'{}' must name a parameter", property));
                };
                bindings.push((property.as_str(), param.as_str()));
            }
            let params: Vec<&str> = params.iter().map(String::as_str).collect();
            sheet.define_dynamic(name, &params, &bindings);
        }
        DefinitionInput::Vars { namespace, values } => {
            let vars = values
                .iter()
                .map(|(name, value)| Ok((name.clone(), var_value(value)?)))
                .collect::<Result<Vec<_>, String>>()?;
            sheet.define_vars(namespace, vars);
        }
        DefinitionInput::Consts { namespace, values } => {
            let consts = values
                .iter()
                .map(|(name, value)| Ok((name.clone(), scalar(value)?)))
                .collect::<Result<Vec<_>, String>>()?;
            sheet.define_consts(namespace, consts);
        }
        DefinitionInput::Theme { namespace, name, overrides } => {
            sheet.define_theme(namespace, name, properties(&overrides)?);
        }
        DefinitionInput::Keyframes { name, frames } => {
            sheet.define_keyframes(name, nested(&frames)?);
        }
        DefinitionInput::PositionTry { name, declarations } => {
            sheet.define_position_try(name, properties(&declarations)?);
        }
        DefinitionInput::ViewTransition { name, parts } => {
            sheet.define_view_transition(name, nested(&parts)?);
        }
        DefinitionInput::Marker { namespace, name } => {
            sheet.define_marker(namespace, name);
        }
    }
    Ok(())
}

fn includes(value: &Value) -> Result<Vec<Declaration>, String> {
    match value {
        Value::String(name) => Ok(vec![Declaration::Include(name.clone())]),
        Value::Array(names) => names
            .iter()
            .map(|name| match name {
                Value::String(name) => Ok(Declaration::Include(name.clone())),
                other => Err(format!("{} expects class names, got {}", INCLUDE_KEY, other)),
            })
            .collect(),
        other => Err(format!("{} expects class names, got {}", INCLUDE_KEY, other)),
    }
}

fn properties(map: &Map<String, Value>) -> Result<Vec<(String, DeclValue)>, String> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), decl_value(value)?)))
        .collect()
}

fn nested(map: &Map<String, Value>) -> Result<Vec<(String, Vec<(String, DeclValue)>)>, String> {
    map.iter()
        .map(|(key, value)| match value {
            Value::Object(inner) => Ok((key.clone(), properties(inner)?)),
            other => Err(format!("'{}' expects an object of properties, got {}", key, other)),
        })
        .collect()
}

fn var_value(value: &Value) -> Result<VarValue, String> {
    if let Value::Object(map) = value {
        if let Some(syntax) = map.get("$typed") {
            let Value::String(syntax) = syntax else {
                return Err("$typed expects a syntax string".to_string());
            };
            let inner = map
                .get("value")
                .ok_or_else(|| "typed var needs a \"value\"".to_string())?;
            let inherits = map.get("inherits").and_then(Value::as_bool).unwrap_or(true);
            return Ok(VarValue::typed(syntax.clone(), decl_value(inner)?).inherits(inherits));
        }
    }
    Ok(decl_value(value)?.into())
}

/// JSON to declaration value: arrays are fallback lists, `{"$var": ..}`
/// style objects are references, other objects are condition maps
fn decl_value(value: &Value) -> Result<DeclValue, String> {
    match value {
        Value::Null => Ok(DeclValue::Null),
        Value::String(_) | Value::Number(_) => Ok(DeclValue::Scalar(scalar(value)?)),
        Value::Array(items) => Ok(DeclValue::Fallback(
            items.iter().map(scalar).collect::<Result<_, _>>()?,
        )),
        Value::Object(map) => {
            if let Some(items) = map.get("$first_that_works") {
                let Value::Array(items) = items else {
                    return Err("$first_that_works expects an array".to_string());
                };
                return Ok(DeclValue::FirstThatWorks(
                    items.iter().map(scalar).collect::<Result<_, _>>()?,
                ));
            }
            if let Some(target) = token_ref(map)? {
                return Ok(DeclValue::Scalar(Scalar::Ref(target)));
            }
            Ok(DeclValue::Map(properties(map)?))
        }
        Value::Bool(b) => Err(format!("unexpected boolean {}", b)),
    }
}

fn scalar(value: &Value) -> Result<Scalar, String> {
    match value {
        Value::String(s) => Ok(Scalar::Str(s.clone())),
        Value::Number(n) => n
            .as_f64()
            .map(Scalar::Number)
            .ok_or_else(|| format!("number {} is out of range", n)),
        Value::Object(map) => token_ref(map)?
            .map(Scalar::Ref)
            .ok_or_else(|| format!("expected a value, got {}", value)),
        other => Err(format!("expected a string or number, got {}", other)),
    }
}

fn token_ref(map: &Map<String, Value>) -> Result<Option<TokenRef>, String> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((key, target)) = map.iter().next() else {
        return Ok(None);
    };
    let kind = match key.as_str() {
        "$var" => RefKind::Var,
        "$const" => RefKind::Const,
        "$keyframes" => RefKind::Keyframes,
        "$position_try" => RefKind::PositionTry,
        "$view_transition" => RefKind::ViewTransition,
        "$marker" => RefKind::Marker,
        _ => return Ok(None),
    };
    let Value::String(target) = target else {
        return Err(format!("{} expects a string", key));
    };

    let (namespace, name) = match kind {
        RefKind::Var | RefKind::Const | RefKind::Marker => target
            .split_once('.')
            .ok_or_else(|| format!("{} expects 'namespace.name', got '{}'", key, target))?,
        _ => ("", target.as_str()),
    };
    Ok(Some(TokenRef {
        kind,
        namespace: namespace.to_string(),
        name: name.to_string(),
    }))
}
