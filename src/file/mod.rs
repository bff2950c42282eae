//! Physical files: line positions, decoding and include resolution.
//!
//! A configuration file is read as bytes and handed out one physical line
//! at a time by [`LineReader`]. Every line becomes an immutable
//! [`Position`] that later stages attach to sections, variables, call steps
//! and diagnostics.

mod encoding;
mod reader;
mod resolver;

use std::fmt;
use std::rc::Rc;

pub use encoding::{decode_line, decode_windows_1252, LineEncoding};
pub use reader::LineReader;
pub use resolver::{FileResolver, IncludeResolver, MemoryResolver};

/// One physical line of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// File name as it was requested from the resolver
    pub filename: Rc<str>,
    /// 1-based line number within `filename`
    pub lineno: usize,
    /// Raw bytes, including the line terminator if there was one
    pub line: Vec<u8>,
    /// Decoded text without the line terminator
    pub text: String,
    /// Whether this is the final line of its stream
    pub last_line: bool,
}

impl Position {
    /// Create a position.
    pub fn new(
        filename: impl Into<Rc<str>>,
        lineno: usize,
        line: Vec<u8>,
        text: String,
        last_line: bool,
    ) -> Self {
        Self {
            filename: filename.into(),
            lineno,
            line,
            text,
            last_line,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.lineno)
    }
}
