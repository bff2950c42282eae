//! # Pbxlint Core
//!
//! A static syntax checker for PBX configuration files and dialplans.
//!
//! This library provides:
//! - A line reader that tolerates broken encodings and mixed line endings
//! - A section/key-value parser that follows `#include` directives
//! - A dialplan parser that turns `exten`/`same` lines into call steps
//! - A registry of per-application argument validators
//!
//! Nothing is executed. Every departure from the expected grammar is
//! reported as a coded [`Diagnostic`] and the parse carries on.
//!
//! ## Architecture
//!
//! - [`file`] - Line reading, encoding fallback and include resolution
//! - [`config`] - Generic section config parser
//! - [`dialplan`] - Dialplan parser and call steps
//! - [`app`] - Application validators and their registry
//! - [`diagnostics`] - Diagnostic codes and sinks
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! pbxlint /etc/asterisk/extensions.conf
//! pbxlint --every-file-eof sip.conf
//! ```
//!
//! ### Library
//!
//! ```
//! use pbxlint_core::{parse_dialplan, AppRegistry, Collector, MemoryResolver, ParserOptions};
//!
//! let resolver = MemoryResolver::new()
//!     .with_file("extensions.conf", b"[default]\nexten => s,1,Hangup\n".to_vec());
//! let collector = Collector::shared();
//! let registry = AppRegistry::v11();
//!
//! let dialplan = parse_dialplan(
//!     resolver,
//!     "extensions.conf",
//!     collector.clone(),
//!     &registry,
//!     ParserOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(dialplan.contexts.len(), 1);
//! assert_eq!(collector.count("W_APP_NEED_PARENS"), 1);
//! ```
//!
//! ## Diagnostic Codes
//!
//! Codes look like `W_WSH_EOL`: a severity prefix (`E` error, `W` warning,
//! `H` hint), a subsystem and a mnemonic. They are stable; see
//! [`diagnostics::codes`].

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod dialplan;
pub mod error;
pub mod file;

// Re-export main types for convenience
pub use app::AppRegistry;
pub use config::{parse_config, BlankLineScope, ConfigParser, ParserOptions, Section};
pub use diagnostics::{Collector, Diagnostic, DiagnosticSink, Severity, SharedSink};
pub use dialplan::{parse_dialplan, Dialplan, DialplanParser};
pub use error::{LintError, Result};
pub use file::{FileResolver, IncludeResolver, MemoryResolver, Position};

/// Name of the dialplan file; the CLI parses it as a dialplan automatically.
pub const DIALPLAN_FILENAME: &str = "extensions.conf";
