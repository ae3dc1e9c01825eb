//! Tessera Style Compiler
//!
//! Compiles style definitions into atomic CSS rules and merges compiled
//! classes into class strings at render time.

pub mod compiler;
pub mod config;
pub mod emit;
pub mod entry;
pub mod error;
pub mod merge;
pub mod processors;
pub mod registry;
pub mod rtl;
pub mod sheet;
pub mod shorthand;
pub mod validate;

pub use compiler::{marker_class_name, var_name, CompiledStyles};
pub use config::{DeprecationChecker, ShorthandBehavior, StyleConfig, VendorPrefixer};
pub use emit::{CssRule, LAYER_ORDER};
pub use entry::{AtomicClassEntry, ClassEntries, ConditionalBundle, DynamicBinding, DynamicClass, StyleSlot};
pub use error::{PolicyWarning, ReferenceProblem, SourceLocation, StyleError, StyleResult, WarningKind};
pub use merge::{ClassRef, ResolvedStyle, StyleMerger};
pub use registry::{RegisteredRule, RuleKind, RuleRegistry};
pub use sheet::{decl, include, Declaration, PropertyList, StyleSheet, VarType, VarValue};

pub use tessera_css::selector::{ancestor, any_sibling, descendant, sibling_after, sibling_before};
pub use tessera_css::{DeclValue, Scalar, TokenRef};
