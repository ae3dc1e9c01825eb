//! Tessera CSS Primitives
//!
//! Leaf services of the atomic-CSS compiler: value model and normalization,
//! selector composition, content hashing, the property database and rule
//! priorities.

pub mod error;
pub mod hash;
pub mod normalize;
pub mod priority;
pub mod properties;
pub mod selector;
pub mod tokenizer;
pub mod value;

pub use error::{CssError, CssResult, SourceLocation};
pub use hash::{atomic_class_name, content_hash};
pub use normalize::{normalize_leaf, normalize_number, normalize_scalar, normalize_str};
pub use priority::{priority, RuleOrder};
pub use properties::{dash_case, PropertyGroup, PropertyTier};
pub use selector::{combine, is_conditional_map, parse_combined, ConditionKind, ParsedSelector};
pub use tokenizer::{tokenize, Token, Tokenizer};
pub use value::{DeclValue, NormalizedValue, RefKind, Scalar, TokenRef};
