//! Generic section/key-value configuration parser.
//!
//! This module reads the INI-like format shared by all PBX configuration
//! files and resolves `#include` directives on the fly.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { line }
//! line        = blank | comment | directive | header | assignment
//! comment     = [hspace] ';' { any_char }
//! block       = ';--' { any_char | newline } '--;'
//! directive   = [hspace] '#' ("include" | "tryinclude") separator target
//! target      = '"' filename '"'
//! header      = [hspace] '[' name ']' [ '(' option { ',' option } ')' ]
//! option      = '!' | template_name
//! assignment  = [hspace] key ( '=' | '=>' ) value [comment]
//! ```
//!
//! # Example
//!
//! ```text
//! [general]
//! static=yes
//!
//! #include "users.conf"
//!
//! [phone](!)
//! type => friend
//! ```

mod line;
mod model;
mod parser;

pub use model::{
    collect_sections, ConfigEvent, Entry, Section, SectionCollector, SectionHeader, SectionKey,
    Variable,
};
pub use parser::ConfigParser;

use crate::diagnostics::SharedSink;
use crate::error::Result;
use crate::file::IncludeResolver;

/// Which files are checked for blank lines at their beginning and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLineScope {
    /// Only the root file
    #[default]
    Outermost,
    /// The root file and every included file
    EveryFile,
}

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Files checked for leading/trailing blank lines
    pub blank_line_scope: BlankLineScope,
    /// Assignment keys that may be indented without a warning
    pub indentable_keys: Vec<String>,
}

impl ParserOptions {
    /// Set the blank line scope.
    pub fn with_blank_line_scope(mut self, scope: BlankLineScope) -> Self {
        self.blank_line_scope = scope;
        self
    }

    /// Allow `key` to be indented.
    pub fn with_indentable_key(mut self, key: impl Into<String>) -> Self {
        self.indentable_keys.push(key.into());
        self
    }

    /// Whether an assignment to `key` may be indented. Case-insensitive.
    pub fn is_indentable(&self, key: &str) -> bool {
        self.indentable_keys
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// Parse a root file and its includes into sections.
pub fn parse_config(
    resolver: impl IncludeResolver,
    root: &str,
    sink: SharedSink,
    options: ParserOptions,
) -> Result<Vec<Section>> {
    let parser = ConfigParser::new(resolver, sink)
        .with_options(options)
        .open(root)?;
    Ok(parser.into_sections())
}
