//! Lazy byte-stream line reader with one line of lookahead.

use std::io::{self, BufRead};
use std::rc::Rc;

use super::encoding::{decode_line, has_control_chars, strip_line_ending, LineEncoding};
use super::Position;
use crate::diagnostics::{codes, Diagnostic, SharedSink};

/// Reads one byte stream and yields one [`Position`] per physical line.
///
/// The reader always holds the next raw line in `lookahead` so that it can
/// tell whether the line it is about to yield is the last one. Encoding
/// problems are reported to the sink as the affected line is yielded.
pub struct LineReader<'a> {
    filename: Rc<str>,
    stream: Box<dyn BufRead + 'a>,
    sink: SharedSink,
    /// Number of the most recently yielded line
    lineno: usize,
    lookahead: Option<Vec<u8>>,
    primed: bool,
    exhausted: bool,
    failure: Option<io::Error>,
}

impl<'a> LineReader<'a> {
    /// Create a reader over `stream`, reporting to `sink`.
    pub fn new(filename: impl Into<Rc<str>>, stream: Box<dyn BufRead + 'a>, sink: SharedSink) -> Self {
        Self {
            filename: filename.into(),
            stream,
            sink,
            lineno: 0,
            lookahead: None,
            primed: false,
            exhausted: false,
            failure: None,
        }
    }

    /// Name of the file being read, as it was requested.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Line number of the most recently yielded line (0 before the first).
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    fn read_raw(&mut self) -> Option<Vec<u8>> {
        if self.exhausted {
            return None;
        }
        let mut buf = Vec::new();
        match self.stream.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.exhausted = true;
                None
            }
            Ok(_) => Some(buf),
            Err(err) => {
                tracing::warn!(file = %self.filename, error = %err, "read failed, skipping rest of file");
                self.exhausted = true;
                self.failure = Some(err);
                None
            }
        }
    }

    /// Report a pending read failure on the line after the last yielded one.
    fn report_failure(&mut self) {
        if let Some(err) = self.failure.take() {
            let position = Rc::new(Position::new(
                self.filename.clone(),
                self.lineno + 1,
                Vec::new(),
                String::new(),
                true,
            ));
            self.sink
                .emit(Diagnostic::new(codes::E_FILE_READ_FAIL, position).with_context(err.to_string()));
        }
    }
}

impl Iterator for LineReader<'_> {
    type Item = Rc<Position>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            self.primed = true;
            self.lookahead = self.read_raw();
        }
        let Some(raw) = self.lookahead.take() else {
            self.report_failure();
            return None;
        };
        self.lookahead = self.read_raw();
        self.lineno += 1;

        let (text, encoding) = decode_line(strip_line_ending(&raw));
        let control = has_control_chars(&text);
        let position = Rc::new(Position::new(
            self.filename.clone(),
            self.lineno,
            raw,
            text,
            self.lookahead.is_none(),
        ));

        if encoding == LineEncoding::Windows1252 {
            self.sink
                .emit(Diagnostic::new(codes::E_FILE_UTF8_BAD, position.clone()));
        }
        if control {
            self.sink
                .emit(Diagnostic::new(codes::W_FILE_CTRL_CHAR, position.clone()));
        }
        if position.last_line {
            self.report_failure();
        }
        Some(position)
    }
}
