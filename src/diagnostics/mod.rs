//! Coded diagnostics and the sink that collects them.
//!
//! Components never print. Every departure from the expected grammar is
//! turned into a [`Diagnostic`] and handed to a [`DiagnosticSink`] that was
//! injected at construction time. One sink belongs to one parse run; use a
//! fresh [`Collector`] (or [`Collector::reset`]) per run.

pub mod codes;

use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::file::Position;

/// Severity encoded in the first letter of a diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Style or structure suggestion
    Hint,
    /// Probably wrong, but accepted by the PBX
    Warning,
    /// Likely rejected or misread by the PBX
    Error,
}

impl Severity {
    /// Derive the severity from a code such as `W_WSH_BOL`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.split('_').next()? {
            "E" => Some(Self::Error),
            "W" => Some(Self::Warning),
            "H" => Some(Self::Hint),
            _ => None,
        }
    }

    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single coded finding attached to a physical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Stable code, see [`codes`]
    pub code: &'static str,
    /// Line the finding refers to
    pub position: Rc<Position>,
    /// Optional free-form detail (offending name, I/O error text, ...)
    pub context: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic without context.
    pub fn new(code: &'static str, position: Rc<Position>) -> Self {
        Self {
            code,
            position,
            context: None,
        }
    }

    /// Attach free-form context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Severity derived from the code prefix. Malformed codes count as errors.
    pub fn severity(&self) -> Severity {
        Severity::from_code(self.code).unwrap_or(Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.code)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

/// Append-only destination for diagnostics.
///
/// Takes `&self` so that one sink can be shared (through `Rc`) by the line
/// readers, the config parser and the dialplan parser of a single run.
pub trait DiagnosticSink {
    /// Record one diagnostic. Order of calls is the emission order.
    fn emit(&self, diagnostic: Diagnostic);
}

/// Shared handle to the sink of the current run.
pub type SharedSink = Rc<dyn DiagnosticSink>;

/// Default sink: keeps every diagnostic in emission order.
///
/// Unless muted, each diagnostic is also echoed as a `trace` event.
#[derive(Debug, Default)]
pub struct Collector {
    records: RefCell<Vec<Diagnostic>>,
    muted: Cell<bool>,
}

impl Collector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector behind an `Rc`, ready to be injected.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Stop (or resume) echoing diagnostics to the log.
    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    /// Whether log echo is suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    /// Forget everything collected so far.
    pub fn reset(&self) {
        self.records.borrow_mut().clear();
    }

    /// Borrow the collected diagnostics.
    pub fn diagnostics(&self) -> Ref<'_, Vec<Diagnostic>> {
        self.records.borrow()
    }

    /// Move the collected diagnostics out, leaving the collector empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Number of diagnostics per code.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in self.records.borrow().iter() {
            *counts.entry(diagnostic.code).or_insert(0) += 1;
        }
        counts
    }

    /// Number of diagnostics with the given code.
    pub fn count(&self, code: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.code == code)
            .count()
    }

    /// Highest severity seen, if anything was collected.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.records.borrow().iter().map(Diagnostic::severity).max()
    }
}

impl DiagnosticSink for Collector {
    fn emit(&self, diagnostic: Diagnostic) {
        if !self.muted.get() {
            tracing::trace!(
                code = diagnostic.code,
                file = %diagnostic.position.filename,
                line = diagnostic.position.lineno,
                "diagnostic"
            );
        }
        self.records.borrow_mut().push(diagnostic);
    }
}
