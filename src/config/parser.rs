//! Include-aware section/key-value parser.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::line::{
    classify, is_hspace, opens_block_comment, split_comment, IncludeLine, IncludeTarget,
    Separator, Statement,
};
use super::model::{collect_sections, ConfigEvent, Entry, Section, SectionHeader, SectionKey, Variable};
use super::{BlankLineScope, ParserOptions};
use crate::diagnostics::{codes, Diagnostic, SharedSink};
use crate::error::{LintError, Result};
use crate::file::{IncludeResolver, LineReader, Position};

/// One open file on the include stack.
struct IncludeFrame {
    reader: LineReader<'static>,
    /// Index of the including frame; `None` for the root file
    parent: Option<usize>,
    /// Any non-blank line (comments included) seen yet
    content_seen: bool,
    /// Any header, directive or assignment seen yet
    statement_seen: bool,
    bof_reported: bool,
    /// First line of the current run of blank lines
    blank_run: Option<Rc<Position>>,
    /// Blank lines since the last statement
    blanks_since_statement: usize,
    /// Where the open `;--` block comment started
    block_comment: Option<Rc<Position>>,
}

impl IncludeFrame {
    fn new(reader: LineReader<'static>, parent: Option<usize>) -> Self {
        Self {
            reader,
            parent,
            content_seen: false,
            statement_seen: false,
            bof_reported: false,
            blank_run: None,
            blanks_since_statement: 0,
            block_comment: None,
        }
    }

    fn filename(&self) -> &str {
        self.reader.filename()
    }
}

/// Pull-based parser over a root file and everything it includes.
///
/// Yields [`ConfigEvent`]s lazily. Includes are resolved when their directive
/// is reached and drained completely before the including file resumes. The
/// "current section" cursor is owned by the parser, not by the file, so a
/// header inside an include stays in effect after the include returns.
pub struct ConfigParser<'a> {
    resolver: Box<dyn IncludeResolver + 'a>,
    sink: SharedSink,
    options: ParserOptions,
    stack: Vec<IncludeFrame>,
    sections: HashMap<String, SectionKey>,
    current: Option<SectionKey>,
    pending: VecDeque<ConfigEvent>,
}

impl<'a> ConfigParser<'a> {
    /// Create a parser with default options. Nothing is opened yet.
    pub fn new(resolver: impl IncludeResolver + 'a, sink: SharedSink) -> Self {
        Self {
            resolver: Box::new(resolver),
            sink,
            options: ParserOptions::default(),
            stack: Vec::new(),
            sections: HashMap::new(),
            current: None,
            pending: VecDeque::new(),
        }
    }

    /// Replace the parser options.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Open the root file. A resolver failure here is the only hard error.
    pub fn open(mut self, root: &str) -> Result<Self> {
        let stream = self
            .resolver
            .resolve(root)
            .map_err(|source| LintError::root_unreadable(root, source))?;
        tracing::debug!(file = root, "opened root file");
        let reader = LineReader::new(root, stream, self.sink.clone());
        self.stack.push(IncludeFrame::new(reader, None));
        Ok(self)
    }

    /// The sink this parser reports to.
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Section the next assignment would attach to.
    pub fn current_section(&self) -> Option<SectionKey> {
        self.current
    }

    /// Current include depth (1 while reading the root file).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drain the parser and assemble sections in discovery order.
    pub fn into_sections(self) -> Vec<Section> {
        collect_sections(self)
    }

    fn emit(&self, code: &'static str, position: &Rc<Position>) {
        self.sink.emit(Diagnostic::new(code, position.clone()));
    }

    fn emit_with(&self, code: &'static str, position: &Rc<Position>, context: impl Into<String>) {
        self.sink
            .emit(Diagnostic::new(code, position.clone()).with_context(context));
    }

    fn checks_blank_runs(&self, frame: &IncludeFrame) -> bool {
        match self.options.blank_line_scope {
            BlankLineScope::Outermost => frame.parent.is_none(),
            BlankLineScope::EveryFile => true,
        }
    }

    fn process_line(&mut self, position: Rc<Position>) {
        let top = self.stack.len() - 1;

        if self.stack[top].block_comment.is_some() {
            let frame = &mut self.stack[top];
            if position.text.contains("--;") {
                frame.block_comment = None;
            }
            frame.content_seen = true;
            frame.blank_run = None;
            return;
        }

        let (content, comment) = split_comment(&position.text);
        let body = content.trim_start_matches(is_hspace);
        if body.trim_end_matches(is_hspace).is_empty() {
            if comment.is_none() {
                self.on_blank(top, &position);
                return;
            }
            let frame = &mut self.stack[top];
            frame.content_seen = true;
            frame.blank_run = None;
            if comment.is_some_and(opens_block_comment) {
                frame.block_comment = Some(position.clone());
            }
            return;
        }

        {
            let frame = &mut self.stack[top];
            frame.content_seen = true;
            frame.blank_run = None;
            if comment.is_some_and(opens_block_comment) {
                frame.block_comment = Some(position.clone());
            }
        }

        if comment.is_none() && content.ends_with(is_hspace) {
            self.emit(codes::W_WSH_EOL, &position);
        }
        let indented = body.len() != content.len();

        match classify(body) {
            Statement::Include(include) => {
                if indented {
                    self.emit(codes::W_WSH_BOL, &position);
                }
                self.on_include(top, include, &position);
            }
            Statement::UnknownDirective(keyword) => {
                self.emit_with(codes::E_CONF_DIRECTIVE_UNKNOWN, &position, format!("#{}", keyword));
            }
            Statement::Header(header) => {
                if indented {
                    self.emit(codes::W_WSH_BOL, &position);
                }
                let frame = &self.stack[top];
                if frame.statement_seen && frame.blanks_since_statement != 1 {
                    self.emit(codes::H_WSV_CTX_BETWEEN, &position);
                }
                if header.trailing {
                    self.emit(codes::E_CONF_CTX_TRAILING, &position);
                }
                self.open_section(
                    header.name,
                    header.template,
                    header.templates.iter().map(|t| t.to_string()).collect(),
                    &position,
                );
            }
            Statement::Assignment(assignment) => {
                if indented && !self.options.is_indentable(assignment.key) {
                    self.emit(codes::W_WSH_BOL, &position);
                }
                if assignment.irregular_space {
                    self.emit(codes::W_WSH_VARSET, &position);
                }
                match self.current {
                    Some(section) => {
                        self.pending.push_back(ConfigEvent::Entry(Entry::Variable(Variable {
                            key: assignment.key.to_string(),
                            value: assignment.value,
                            arrow: assignment.arrow,
                            section,
                            position: position.clone(),
                        })));
                    }
                    None => self.emit(codes::E_CONF_VAR_NO_CTX, &position),
                }
            }
            Statement::Invalid(code) => self.emit(code, &position),
        }

        // The frame may no longer be on top if an include was pushed.
        let frame = &mut self.stack[top];
        frame.statement_seen = true;
        frame.blanks_since_statement = 0;
    }

    fn on_blank(&mut self, top: usize, position: &Rc<Position>) {
        let checked = self.checks_blank_runs(&self.stack[top]);
        let frame = &mut self.stack[top];
        frame.blanks_since_statement += 1;

        if !frame.content_seen {
            if checked && !frame.bof_reported {
                frame.bof_reported = true;
                self.emit(codes::W_WSV_BOF, position);
            }
            return;
        }
        let run_start = frame.blank_run.get_or_insert_with(|| position.clone()).clone();
        if position.last_line && checked {
            self.emit(codes::W_WSV_EOF, &run_start);
        }
    }

    fn on_include(&mut self, top: usize, include: IncludeLine<'_>, position: &Rc<Position>) {
        match include.separator {
            Separator::Single => {}
            Separator::Irregular => self.emit(codes::W_WSH_INCLUDE, position),
            Separator::Control => self.emit(codes::W_WSH_CTRL, position),
        }

        let name = match include.target {
            IncludeTarget::Quoted { name, trailing } => {
                if trailing {
                    self.emit(codes::W_CONF_INCLUDE_TRAILING, position);
                }
                name
            }
            IncludeTarget::Bare(name) => {
                self.emit(codes::W_CONF_INCLUDE_QUOTES, position);
                name
            }
            IncludeTarget::Unterminated | IncludeTarget::Missing => {
                self.emit(codes::E_CONF_INCLUDE_BAD, position);
                return;
            }
        };
        if name.is_empty() {
            self.emit(codes::E_CONF_INCLUDE_BAD, position);
            return;
        }

        let mut ancestor = Some(top);
        while let Some(idx) = ancestor {
            if self.stack[idx].filename() == name {
                self.emit_with(codes::E_CONF_INCLUDE_LOOP, position, name);
                return;
            }
            ancestor = self.stack[idx].parent;
        }

        match self.resolver.resolve(name) {
            Ok(stream) => {
                tracing::debug!(file = name, from = %position, depth = self.stack.len() + 1, "entering include");
                let reader = LineReader::new(name, stream, self.sink.clone());
                self.stack.push(IncludeFrame::new(reader, Some(top)));
            }
            Err(err) if include.try_only => {
                tracing::debug!(file = name, error = %err, "skipping missing tryinclude");
            }
            Err(err) => {
                self.emit_with(codes::E_CONF_INCLUDE_FAIL, position, format!("{}: {}", name, err));
            }
        }
    }

    fn open_section(
        &mut self,
        name: &str,
        template: bool,
        templates: Vec<String>,
        position: &Rc<Position>,
    ) {
        let (key, reopened) = match self.sections.get(name) {
            Some(key) => (*key, true),
            None => {
                let key = SectionKey(self.sections.len());
                self.sections.insert(name.to_string(), key);
                tracing::debug!(section = name, at = %position, "section discovered");
                (key, false)
            }
        };
        self.current = Some(key);
        self.pending.push_back(ConfigEvent::Section(SectionHeader {
            key,
            name: name.to_string(),
            position: position.clone(),
            template,
            templates,
            reopened,
        }));
    }

    fn close_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if let Some(start) = &frame.block_comment {
                self.emit(codes::W_CONF_COMMENT_UNCLOSED, start);
            }
            tracing::debug!(file = frame.filename(), lines = frame.reader.lineno(), "leaving file");
        }
    }
}

impl Iterator for ConfigParser<'_> {
    type Item = ConfigEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let top = self.stack.last_mut()?;
            match top.reader.next() {
                Some(position) => self.process_line(position),
                None => self.close_frame(),
            }
        }
    }
}
