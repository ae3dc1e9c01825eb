//! Compiler error types and policy warnings

use std::fmt;

use tessera_css::CssError;
use thiserror::Error;

/// Compiler result type
pub type StyleResult<T> = Result<T, StyleError>;

/// Where a definition was written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    /// Line number (1-indexed, 0 when unknown)
    pub line: u32,
    /// Column number (1-indexed, 0 when unknown)
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self { file: file.into(), line, column }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Compile errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    /// Invalid input: unknown property, disallowed property, malformed definition
    #[error("{definition}: {message}{}", suggestion_hint(.suggestions))]
    Validation {
        definition: String,
        message: String,
        suggestions: Vec<String>,
    },

    /// Reference to something not defined, or defined later
    #[error("{location}: '{definition}' references {target}{reason}{}", suggestion_hint(.suggestions))]
    Reference {
        definition: String,
        location: SourceLocation,
        target: String,
        reason: ReferenceProblem,
        suggestions: Vec<String>,
    },

    /// Runtime resolution of class refs failed
    #[error("Cannot resolve '{name}': {reason}")]
    Resolve { name: String, reason: String },

    #[error(transparent)]
    Css(#[from] CssError),
}

/// Why a reference failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblem {
    /// Target exists but is registered after the referrer
    DefinedLater,
    /// Target does not exist
    Undefined,
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceProblem::DefinedLater => write!(f, " before its definition"),
            ReferenceProblem::Undefined => write!(f, ", which is not defined"),
        }
    }
}

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

impl StyleError {
    pub fn validation(definition: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            definition: definition.into(),
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn reference(
        definition: impl Into<String>,
        location: &SourceLocation,
        target: impl Into<String>,
        reason: ReferenceProblem,
    ) -> Self {
        Self::Reference {
            definition: definition.into(),
            location: location.clone(),
            target: target.into(),
            reason,
            suggestions: Vec::new(),
        }
    }

    /// Attach suggestions to a validation or reference error
    pub fn with_suggestions(mut self, names: Vec<String>) -> Self {
        if let Self::Validation { suggestions, .. } | Self::Reference { suggestions, .. } = &mut self {
            *suggestions = names;
        }
        self
    }

    pub fn resolve(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolve { name: name.into(), reason: reason.into() }
    }

    /// Suggestions attached to a validation or reference error
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Validation { suggestions, .. } | Self::Reference { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

/// Kind of non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    DeprecatedProperty,
    UnnecessaryPrefix,
}

/// Non-fatal diagnostic collected during compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyWarning {
    pub kind: WarningKind,
    pub definition: String,
    pub property: String,
    pub message: String,
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.definition, self.message)
    }
}
