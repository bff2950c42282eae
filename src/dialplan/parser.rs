use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::model::{CallStep, Dialplan, Priority};
use crate::app::{builtin, AppArgs, AppRegistry, Issue};
use crate::config::{
    collect_sections, ConfigEvent, ConfigParser, Entry, ParserOptions, SectionHeader, SectionKey,
    Variable,
};
use crate::diagnostics::{codes, Diagnostic, SharedSink};
use crate::error::Result;
use crate::file::{IncludeResolver, Position};

/// Keyword declaring an extension.
pub const EXTEN: &str = "exten";
/// Keyword continuing the last extension.
pub const SAME: &str = "same";
/// Keys allowed in a context besides steps.
pub const CONTEXT_KEYWORDS: &[&str] = &["include", "switch", "lswitch", "eswitch", "ignorepat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionRole {
    General,
    Globals,
    Context,
}

/// Numbering state of one context.
#[derive(Debug, Default)]
struct ContextState {
    last_extension: Option<String>,
    last_priority: Option<u32>,
    used: HashSet<(String, u32)>,
}

/// Dialplan parser.
///
/// Wraps a [`ConfigParser`] and turns `exten`/`same` assignments in regular
/// contexts into [`CallStep`] entries. Every call is validated through the
/// [`AppRegistry`]; the issues land in the same sink as the parser's own
/// diagnostics.
pub struct DialplanParser<'a> {
    inner: ConfigParser<'a>,
    registry: &'a AppRegistry,
    sink: SharedSink,
    roles: Vec<SectionRole>,
    contexts: HashMap<SectionKey, ContextState>,
    regular_seen: bool,
}

impl<'a> DialplanParser<'a> {
    /// Create a dialplan parser. Nothing is opened yet.
    pub fn new(
        resolver: impl IncludeResolver + 'a,
        sink: SharedSink,
        registry: &'a AppRegistry,
    ) -> Self {
        let inner = ConfigParser::new(resolver, sink.clone())
            .with_options(ParserOptions::default().with_indentable_key(SAME));
        Self {
            inner,
            registry,
            sink,
            roles: Vec::new(),
            contexts: HashMap::new(),
            regular_seen: false,
        }
    }

    /// Replace the parser options. `same` stays indentable.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.inner = self.inner.with_options(options.with_indentable_key(SAME));
        self
    }

    /// Open the root file.
    pub fn open(mut self, root: &str) -> Result<Self> {
        self.inner = self.inner.open(root)?;
        Ok(self)
    }

    /// Drain the parser and split the result into general, globals and contexts.
    pub fn into_dialplan(self) -> Dialplan {
        let dialplan = Dialplan::from_sections(collect_sections(self));
        tracing::debug!(
            contexts = dialplan.contexts.len(),
            general = dialplan.general.is_some(),
            globals = dialplan.globals.is_some(),
            "dialplan assembled"
        );
        dialplan
    }

    fn emit(&self, code: &'static str, position: &Rc<Position>) {
        self.sink.emit(Diagnostic::new(code, position.clone()));
    }

    fn emit_with(&self, code: &'static str, position: &Rc<Position>, context: impl Into<String>) {
        self.sink
            .emit(Diagnostic::new(code, position.clone()).with_context(context));
    }

    fn forward(&self, issue: Issue, position: &Rc<Position>) {
        let diagnostic = Diagnostic::new(issue.code, position.clone());
        self.sink.emit(match issue.context {
            Some(context) => diagnostic.with_context(context),
            None => diagnostic,
        });
    }

    fn on_section(&mut self, header: &SectionHeader) {
        if header.reopened {
            return;
        }
        let role = if header.name.eq_ignore_ascii_case("general") {
            if header.key.0 != 0 {
                self.emit(codes::H_DP_GENERAL_MISPLACED, &header.position);
            }
            SectionRole::General
        } else if header.name.eq_ignore_ascii_case("globals") {
            if self.regular_seen {
                self.emit(codes::H_DP_GLOBALS_MISPLACED, &header.position);
            }
            SectionRole::Globals
        } else {
            self.regular_seen = true;
            SectionRole::Context
        };
        self.roles.push(role);
    }

    fn role_of(&self, key: SectionKey) -> SectionRole {
        self.roles.get(key.0).copied().unwrap_or(SectionRole::Context)
    }

    fn on_variable(&mut self, variable: Variable) -> Option<Entry> {
        if self.role_of(variable.section) != SectionRole::Context {
            return Some(Entry::Variable(variable));
        }
        let key = variable.key.to_ascii_lowercase();
        if key == EXTEN || key == SAME {
            return self.build_step(variable).map(Entry::Step);
        }
        if !CONTEXT_KEYWORDS.contains(&key.as_str()) {
            self.emit_with(codes::E_DP_KEYWORD_UNKNOWN, &variable.position, variable.key.as_str());
        }
        Some(Entry::Variable(variable))
    }

    fn build_step(&mut self, variable: Variable) -> Option<CallStep> {
        let position = variable.position;
        let section = variable.section;

        let (extension, priority_field, call_field) =
            if variable.key.eq_ignore_ascii_case(SAME) {
                let inherited = self
                    .contexts
                    .get(&section)
                    .and_then(|state| state.last_extension.clone());
                let Some(extension) = inherited else {
                    self.emit(codes::E_DP_SAME_NO_EXTEN, &position);
                    return None;
                };
                let Some((priority, call)) = variable.value.split_once(',') else {
                    self.emit_with(codes::E_DP_STEP_INCOMPLETE, &position, variable.value.as_str());
                    return None;
                };
                (extension, priority, call)
            } else {
                let mut fields = variable.value.splitn(3, ',');
                let (Some(extension), Some(priority), Some(call)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    self.emit_with(codes::E_DP_STEP_INCOMPLETE, &position, variable.value.as_str());
                    return None;
                };
                (extension.trim().to_string(), priority, call)
            };

        if extension.is_empty() {
            self.emit(codes::E_DP_EXTEN_EMPTY, &position);
            return None;
        }
        let priority_field = priority_field.trim();
        let Some(priority) = Priority::parse(priority_field) else {
            self.emit_with(codes::E_DP_PRIO_BAD, &position, priority_field);
            return None;
        };

        let number = self.number_step(section, &extension, &priority, &position);

        let (app, args, parsed) = if priority == Priority::Hint {
            (call_field.trim().to_string(), String::new(), None)
        } else {
            self.check_call(call_field, &position)
        };

        Some(CallStep {
            extension,
            priority,
            number,
            app,
            args,
            parsed,
            section,
            position,
        })
    }

    /// Resolve the numeric priority and update the context's numbering state.
    fn number_step(
        &mut self,
        section: SectionKey,
        extension: &str,
        priority: &Priority,
        position: &Rc<Position>,
    ) -> Option<u32> {
        let state = self.contexts.entry(section).or_default();
        let same_extension = state.last_extension.as_deref() == Some(extension);

        let number = match priority {
            Priority::Number(n) | Priority::Labeled(n, _) => Some(*n),
            Priority::Next | Priority::NextLabeled(_) => match state.last_priority {
                Some(last) if same_extension => last.checked_add(1),
                _ => None,
            },
            Priority::Hint => None,
        };
        let duplicate = number.is_some_and(|n| !state.used.insert((extension.to_string(), n)));

        if *priority == Priority::Hint {
            if !same_extension {
                state.last_priority = None;
            }
        } else {
            state.last_priority = number;
        }
        state.last_extension = Some(extension.to_string());

        if priority.is_next() && number.is_none() {
            self.emit(codes::E_DP_PRIO_NO_PREV, position);
        }
        if let (true, Some(n)) = (duplicate, number) {
            self.emit_with(codes::E_DP_PRIO_DUPE, position, format!("{extension},{n}"));
        }
        number
    }

    /// Split and validate an application call.
    fn check_call(
        &self,
        raw: &str,
        position: &Rc<Position>,
    ) -> (String, String, Option<AppArgs>) {
        let call = builtin::split_call(raw);
        let app = call.name.to_string();
        let args = call.args.to_string();
        for issue in call.issues.iter().cloned() {
            self.forward(issue, position);
        }
        if call.name.is_empty() {
            return (app, args, None);
        }

        if let Some(issue) = builtin::parens_issue(&call, self.registry.requires_parens(call.name)) {
            self.forward(issue, position);
        }
        if !call.parenthesized && !call.args.is_empty() {
            return (app, args, None);
        }

        match self.registry.validate(call.name, call.args, position) {
            Ok(parsed) => (app, args, Some(parsed)),
            Err(issues) => {
                for issue in issues {
                    self.forward(issue, position);
                }
                (app, args, None)
            }
        }
    }
}

impl Iterator for DialplanParser<'_> {
    type Item = ConfigEvent;

    fn next(&mut self) -> Option<ConfigEvent> {
        loop {
            match self.inner.next()? {
                ConfigEvent::Section(header) => {
                    self.on_section(&header);
                    return Some(ConfigEvent::Section(header));
                }
                ConfigEvent::Entry(Entry::Variable(variable)) => {
                    if let Some(entry) = self.on_variable(variable) {
                        return Some(ConfigEvent::Entry(entry));
                    }
                }
                event => return Some(event),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Collector;
    use crate::file::MemoryResolver;

    fn parse(data: &[u8]) -> (Dialplan, Rc<Collector>) {
        let collector = Collector::shared();
        collector.set_muted(true);
        let registry = AppRegistry::v11();
        let resolver = MemoryResolver::new().with_file("test.conf", data.to_vec());
        let dialplan = DialplanParser::new(resolver, collector.clone(), &registry)
            .open("test.conf")
            .unwrap()
            .into_dialplan();
        (dialplan, collector)
    }

    fn check_values(dialplan: &Dialplan) {
        assert_eq!(dialplan.contexts.len(), 1);
        assert_eq!(dialplan.contexts[0].len(), 4);
    }

    #[test]
    fn test_normal() {
        let (dialplan, collector) = parse(
            b"[context]\n\
exten => s,1,NoOp()\n \
same => n(label2),Verbose(foo)\n \
same => n,Hangup()\n\
exten => h,1,DumpChan()\n",
        );
        check_values(&dialplan);
        assert!(collector.is_empty(), "{:?}", collector.diagnostics());

        let steps: Vec<_> = dialplan.steps().collect();
        assert_eq!(steps[1].extension, "s");
        assert_eq!(steps[1].number, Some(2));
        assert_eq!(steps[1].priority.label(), Some("label2"));
        assert_eq!(steps[1].parsed.as_ref().unwrap().fields, vec!["foo"]);
        assert_eq!(steps[2].number, Some(3));
        assert_eq!(steps[3].extension, "h");
        assert_eq!(steps[3].position.lineno, 5);
    }

    #[test]
    fn test_normal_noop_needs_no_parens() {
        let (dialplan, collector) = parse(
            b"[context]\n\
exten => s,1,NoOp\n \
same => n(label2),Verbose(foo)\n \
same => n,Hangup()\n\
exten => h,1,DumpChan()\n",
        );
        check_values(&dialplan);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_missing_parens() {
        let (dialplan, collector) = parse(
            b"[context]\n\
exten => s,1,NoOp\n \
same => n(label2),Verbose(foo)\n \
same => n,Hangup\n\
exten => h,1,DumpChan\n",
        );
        check_values(&dialplan);
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.count(codes::W_APP_NEED_PARENS), 2);
        let lines: Vec<_> = collector
            .diagnostics()
            .iter()
            .map(|d| d.position.lineno)
            .collect();
        assert_eq!(lines, vec![4, 5]);
    }

    #[test]
    fn test_whitespace_before_application() {
        let (dialplan, collector) = parse(
            b"[context]\n\
exten => s,1,NoOp\n \
same => n(label2),  Verbose(foo)\n \
same => n,Hangup()\n\
exten => h,1,DumpChan()\n",
        );
        check_values(&dialplan);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.count(codes::W_APP_WSH), 1);
        assert_eq!(dialplan.steps().nth(1).unwrap().app, "Verbose");
    }

    #[test]
    fn test_whitespace_before_paren() {
        let (dialplan, collector) = parse(
            b"[context]\n\
exten => s,1,NoOp\n \
same => n(label2),Verbose (foo)\n \
same => n,Hangup()\n\
exten => h,1,DumpChan()\n",
        );
        check_values(&dialplan);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.count(codes::E_APP_WSH), 1);
        let step = dialplan.steps().nth(1).unwrap();
        assert_eq!(step.args, "foo");
        assert!(step.parsed.is_some());
    }

    #[test]
    fn test_general_and_globals_are_not_contexts() {
        let (dialplan, collector) = parse(
            b"[general]\n\
static=yes\n\
\n\
[globals]\n\
TRUNK=SIP/provider\n\
\n\
[default]\n\
exten => 100,1,Dial(${TRUNK}/100,30)\n",
        );
        assert_eq!(dialplan.general.as_ref().unwrap().get("static"), Some("yes"));
        assert_eq!(
            dialplan.globals.as_ref().unwrap().get("TRUNK"),
            Some("SIP/provider")
        );
        assert_eq!(dialplan.contexts.len(), 1);
        assert!(dialplan.context("default").is_some());
        assert!(collector.is_empty(), "{:?}", collector.diagnostics());
    }

    #[test]
    fn test_misplaced_general_and_globals() {
        let (dialplan, collector) = parse(
            b"[default]\n\
exten => s,1,Answer()\n\
\n\
[globals]\n\
X=1\n\
\n\
[general]\n\
static=yes\n",
        );
        assert_eq!(dialplan.contexts.len(), 1);
        assert_eq!(collector.count(codes::H_DP_GLOBALS_MISPLACED), 1);
        assert_eq!(collector.count(codes::H_DP_GENERAL_MISPLACED), 1);
    }

    #[test]
    fn test_context_keywords() {
        let (dialplan, collector) = parse(
            b"[default]\n\
include => other\n\
ignorepat => 9\n\
foo => bar\n\
exten => s,1,Answer()\n",
        );
        let context = &dialplan.contexts[0];
        assert_eq!(context.variables().count(), 3);
        assert_eq!(context.steps().count(), 1);
        assert_eq!(collector.len(), 1);
        let diagnostic = &collector.diagnostics()[0];
        assert_eq!(diagnostic.code, codes::E_DP_KEYWORD_UNKNOWN);
        assert_eq!(diagnostic.context.as_deref(), Some("foo"));
    }

    #[test]
    fn test_same_without_extension() {
        let (dialplan, collector) = parse(
            b"[one]\n\
exten => s,1,Answer()\n\
\n\
[two]\n\
same => n,Hangup()\n",
        );
        assert_eq!(dialplan.contexts[1].steps().count(), 0);
        assert_eq!(collector.count(codes::E_DP_SAME_NO_EXTEN), 1);
    }

    #[test]
    fn test_priority_errors() {
        let (dialplan, collector) = parse(
            b"[default]\n\
exten => s,n,Answer()\n\
exten => s,0,Answer()\n\
exten => s,1,Answer()\n\
exten => s,1,Hangup()\n\
exten => t,n,Hangup()\n\
exten => ,1,Hangup()\n\
exten => u,1\n\
same => 2\n",
        );
        assert_eq!(collector.count(codes::E_DP_PRIO_NO_PREV), 2);
        assert_eq!(collector.count(codes::E_DP_PRIO_BAD), 1);
        assert_eq!(collector.count(codes::E_DP_PRIO_DUPE), 1);
        assert_eq!(collector.count(codes::E_DP_EXTEN_EMPTY), 1);
        // `exten => u,1` and `same => 2`
        assert_eq!(collector.count(codes::E_DP_STEP_INCOMPLETE), 2);
        // n without a previous priority keeps the step, unnumbered
        let steps: Vec<_> = dialplan.steps().collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].number, None);
        assert_eq!(steps[3].extension, "t");
    }

    #[test]
    fn test_next_after_highest_priority() {
        let (dialplan, collector) = parse(
            b"[c]\n\
exten => s,4294967295,NoOp()\n \
same => n,Hangup()\n",
        );
        let steps: Vec<_> = dialplan.steps().collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].number, Some(u32::MAX));
        assert_eq!(steps[1].number, None);
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.count(codes::E_DP_PRIO_NO_PREV), 1);
    }

    #[test]
    fn test_unknown_application_uses_fallback() {
        let (dialplan, collector) = parse(b"[c]\nexten => s,1,Frobnicate\n");
        assert_eq!(dialplan.steps().count(), 1);
        assert_eq!(collector.count(codes::W_APP_NEED_PARENS), 1);
        assert_eq!(collector.count(codes::H_APP_MISSING), 1);
        let missing = collector
            .diagnostics()
            .iter()
            .find(|d| d.code == codes::H_APP_MISSING)
            .and_then(|d| d.context.clone());
        assert_eq!(missing.as_deref(), Some("Frobnicate"));
    }

    #[test]
    fn test_hints_are_not_validated() {
        let (dialplan, collector) = parse(
            b"[default]\n\
exten => 100,hint,SIP/100&SIP/101\n\
exten => 100,1,Dial(SIP/100)\n \
same => n,Hangup()\n",
        );
        assert!(collector.is_empty(), "{:?}", collector.diagnostics());
        let steps: Vec<_> = dialplan.steps().collect();
        assert!(steps[0].is_hint());
        assert_eq!(steps[0].app, "SIP/100&SIP/101");
        assert_eq!(steps[2].number, Some(2));
    }

    #[test]
    fn test_application_issues_keep_step() {
        let (dialplan, collector) = parse(
            b"[default]\n\
exten => s,1,Wait(soon)\n \
same => n,Frobnicate(a,b)\n \
same => n,Hangup(16)junk\n",
        );
        let steps: Vec<_> = dialplan.steps().collect();
        assert_eq!(steps.len(), 3);
        assert!(steps[0].parsed.is_none());
        assert_eq!(collector.count(codes::E_APP_ARG_BADOPT), 1);
        assert_eq!(collector.count(codes::H_APP_MISSING), 1);
        assert_eq!(collector.count(codes::E_APP_TRAILING), 1);
    }
}
