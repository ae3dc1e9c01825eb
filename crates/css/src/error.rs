//! Error types for value and selector processing

use std::fmt;
use thiserror::Error;

/// Result type for value and selector operations
pub type CssResult<T> = Result<T, CssError>;

/// Position inside a value or selector string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while tokenizing or normalizing values and selectors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssError {
    #[error("Unterminated string in '{input}' at {location}")]
    UnterminatedString {
        input: String,
        location: SourceLocation,
    },

    #[error("Unbalanced parentheses in '{input}' at {location}")]
    UnbalancedParens {
        input: String,
        location: SourceLocation,
    },

    #[error("Invalid number '{number}' at {location}")]
    InvalidNumber {
        number: String,
        location: SourceLocation,
    },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        selector: String,
        reason: String,
    },

    #[error("Invalid value '{value}' for property '{property}': {reason}")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },
}

impl CssError {
    /// Get the location inside the input, when the error has one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::UnterminatedString { location, .. } => Some(*location),
            Self::UnbalancedParens { location, .. } => Some(*location),
            Self::InvalidNumber { location, .. } => Some(*location),
            Self::InvalidSelector { .. } | Self::InvalidValue { .. } => None,
        }
    }

    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value(
        property: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            property: property.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new(1, 5, 4);
        assert_eq!(format!("{}", loc), "1:5");
    }

    #[test]
    fn test_error_display() {
        let err = CssError::invalid_selector("@media (x", "missing ')'");
        assert_eq!(format!("{}", err), "Invalid selector '@media (x': missing ')'");
        assert_eq!(err.location(), None);
    }

    #[test]
    fn test_error_location() {
        let err = CssError::UnterminatedString {
            input: "'abc".to_string(),
            location: SourceLocation::new(1, 5, 4),
        };
        assert_eq!(err.location(), Some(SourceLocation::new(1, 5, 4)));
    }
}
