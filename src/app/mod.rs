//! Dialplan applications and their argument validators.
//!
//! The dialplan parser does not know any application grammar. It splits a
//! call into name and raw argument string using the universal rules in
//! [`builtin`], then hands the arguments to whatever [`AppValidator`] the
//! [`AppRegistry`] holds for the name. Names the registry does not know are
//! checked by [`UnknownApp`].
//!
//! # Adding an application
//!
//! ```
//! use pbxlint_core::app::{AppArgs, AppRegistry, AppValidator, Validation};
//! use pbxlint_core::file::Position;
//!
//! struct Echo;
//!
//! impl AppValidator for Echo {
//!     fn validate(&self, args: &str, _position: &Position) -> Validation {
//!         Ok(AppArgs::new(vec![args.to_string()]))
//!     }
//! }
//!
//! let mut registry = AppRegistry::new();
//! registry.register(&["Echo"], Echo);
//! assert!(registry.lookup("ECHO").is_some());
//! ```

pub mod apps;
pub mod builtin;
mod registry;
mod unknown;
pub mod v11;

pub use registry::AppRegistry;
pub use unknown::UnknownApp;

use crate::file::Position;

/// A finding produced by a validator, before it is tied to a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub context: Option<String>,
}

impl Issue {
    /// Create an issue without context.
    pub fn new(code: &'static str) -> Self {
        Self {
            code,
            context: None,
        }
    }

    /// Attach free-form context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Structured breakdown of a valid argument string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppArgs {
    /// Arguments in order, as written (not trimmed)
    pub fields: Vec<String>,
}

impl AppArgs {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

/// Outcome of validating one call: a breakdown, or what was wrong.
pub type Validation = std::result::Result<AppArgs, Vec<Issue>>;

/// Argument grammar of one application.
pub trait AppValidator {
    /// Whether `App` without `()` deserves a warning. Most applications do.
    fn requires_parens(&self) -> bool {
        true
    }

    /// Validate the raw text between the outermost parentheses.
    fn validate(&self, args: &str, position: &Position) -> Validation;
}
