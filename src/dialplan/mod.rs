//! Dialplan (`extensions.conf`) parser.
//!
//! A dialplan is a section config whose regular sections are contexts of
//! call steps. `[general]` and `[globals]` are plain sections.
//!
//! # Grammar Overview
//!
//! ```text
//! step        = "exten" "=>" extension ',' priority ',' call
//!             | "same"  "=>" priority ',' call
//! priority    = number [ '(' label ')' ]
//!             | 'n' [ '(' label ')' ]
//!             | "hint"
//! call        = app_name [ '(' raw_args ')' ]
//! keyword     = "include" | "switch" | "lswitch" | "eswitch" | "ignorepat"
//! ```
//!
//! # Example
//!
//! ```text
//! [default]
//! exten => 100,hint,SIP/100
//! exten => 100,1,Answer()
//!  same => n(dial),Dial(SIP/100,30)
//!  same => n,Hangup()
//! ```

mod model;
mod parser;

pub use model::{CallStep, Dialplan, Priority};
pub use parser::{DialplanParser, CONTEXT_KEYWORDS, EXTEN, SAME};

use crate::app::AppRegistry;
use crate::config::ParserOptions;
use crate::diagnostics::SharedSink;
use crate::error::Result;
use crate::file::IncludeResolver;

/// Parse a dialplan root file and its includes.
pub fn parse_dialplan(
    resolver: impl IncludeResolver,
    root: &str,
    sink: SharedSink,
    registry: &AppRegistry,
    options: ParserOptions,
) -> Result<Dialplan> {
    let parser = DialplanParser::new(resolver, sink, registry)
        .with_options(options)
        .open(root)?;
    Ok(parser.into_dialplan())
}
