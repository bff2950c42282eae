//! Error types for the PBX configuration linter.
//!
//! Almost everything the linter finds is reported as a coded
//! [`Diagnostic`](crate::diagnostics::Diagnostic) and never interrupts a
//! parse. [`LintError`] covers the few conditions that do stop a run: the
//! root file cannot be opened, or the command-line front end hits an I/O
//! failure outside the parser.

use thiserror::Error;

/// Result type alias using [`LintError`].
pub type Result<T> = std::result::Result<T, LintError>;

/// Unified error type for all hard failures.
#[derive(Error, Debug)]
pub enum LintError {
    // ============ Parse Errors ============
    /// The include resolver refused the root file of a parse run
    #[error("Failed to open root file '{filename}': {source}")]
    RootUnreadable {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    // ============ I/O Errors ============
    /// Generic I/O failure outside the parser (CLI paths, output)
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LintError {
    /// Create a root-file error
    pub fn root_unreadable(filename: impl Into<String>, source: std::io::Error) -> Self {
        Self::RootUnreadable {
            filename: filename.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unreadable_message() {
        let err = LintError::root_unreadable(
            "extensions.conf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to open root file 'extensions.conf': no such file"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
