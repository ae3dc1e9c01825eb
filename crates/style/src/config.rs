//! Compiler configuration

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{StyleError, StyleResult};

/// Returns extra prefixed declaration text (e.g. `-webkit-user-select:none`)
/// for a standard `(property, value)` pair, or `None`.
pub type VendorPrefixer = Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// Returns true when a property is deprecated
pub type DeprecationChecker = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Policy for shorthand properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShorthandBehavior {
    /// Keep shorthands; priority ordering resolves collisions
    #[default]
    Accept,
    /// Expand known shorthands into longhands
    Flatten,
    /// Reject a shorthand used together with one of its longhands
    Forbid,
}

impl FromStr for ShorthandBehavior {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "flatten" => Ok(Self::Flatten),
            "forbid" => Ok(Self::Forbid),
            other => Err(StyleError::validation(
                "config",
                format!("unknown shorthand behavior '{}' (expected accept, flatten or forbid)", other),
            )),
        }
    }
}

/// Compiler configuration
#[derive(Clone)]
pub struct StyleConfig {
    pub shorthand_behavior: ShorthandBehavior,
    /// Bucket rules into `@layer`s instead of doubling at-rule selectors
    pub use_css_layers: bool,
    pub vendor_prefixer: Option<VendorPrefixer>,
    pub deprecation_checker: Option<DeprecationChecker>,
    /// Otherwise unknown properties that are accepted
    pub allowed_properties: FxHashSet<String>,
    /// Leading letter(s) of every generated identifier
    pub class_prefix: String,
    /// Also mirror physical left/right properties and values for RTL
    pub legacy_value_flipping: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            shorthand_behavior: ShorthandBehavior::Accept,
            use_css_layers: false,
            vendor_prefixer: None,
            deprecation_checker: None,
            allowed_properties: FxHashSet::default(),
            class_prefix: "x".to_string(),
            legacy_value_flipping: false,
        }
    }
}

impl fmt::Debug for StyleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleConfig")
            .field("shorthand_behavior", &self.shorthand_behavior)
            .field("use_css_layers", &self.use_css_layers)
            .field("vendor_prefixer", &self.vendor_prefixer.is_some())
            .field("deprecation_checker", &self.deprecation_checker.is_some())
            .field("allowed_properties", &self.allowed_properties)
            .field("class_prefix", &self.class_prefix)
            .field("legacy_value_flipping", &self.legacy_value_flipping)
            .finish()
    }
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shorthand_behavior(mut self, behavior: ShorthandBehavior) -> Self {
        self.shorthand_behavior = behavior;
        self
    }

    pub fn with_css_layers(mut self, enabled: bool) -> Self {
        self.use_css_layers = enabled;
        self
    }

    pub fn with_vendor_prefixer<F>(mut self, prefixer: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.vendor_prefixer = Some(Arc::new(prefixer));
        self
    }

    pub fn with_deprecation_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.deprecation_checker = Some(Arc::new(checker));
        self
    }

    pub fn with_allowed_property(mut self, property: impl Into<String>) -> Self {
        self.allowed_properties.insert(property.into());
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_legacy_value_flipping(mut self, enabled: bool) -> Self {
        self.legacy_value_flipping = enabled;
        self
    }

    /// Check that generated identifiers will be valid CSS identifiers
    pub fn validate(&self) -> StyleResult<()> {
        let valid_start = self
            .class_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = self
            .class_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid_start || !valid_rest {
            return Err(StyleError::validation(
                "config",
                format!(
                    "class prefix '{}' must start with a letter and contain only letters, digits, '-' or '_'",
                    self.class_prefix
                ),
            ));
        }
        Ok(())
    }

    pub(crate) fn prefixed(&self, property: &str, value: &str) -> Option<String> {
        self.vendor_prefixer.as_ref().and_then(|prefixer| prefixer(property, value))
    }

    pub(crate) fn is_deprecated(&self, property: &str) -> bool {
        self.deprecation_checker.as_ref().is_some_and(|checker| checker(property))
    }
}
