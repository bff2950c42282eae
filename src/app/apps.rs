//! Argument validators for concrete applications.
//!
//! Most applications only need an arity and a shape per argument, which
//! [`Arity`] expresses as data. The few with their own punctuation
//! (`Set`, `GotoIf`, `Verbose`) get small dedicated validators.
//!
//! Every application has a `register_*` function; [`crate::app::v11`] lists
//! them in registration order.

use super::builtin::separate_args;
use super::{AppArgs, AppRegistry, AppValidator, Issue, Validation};
use crate::diagnostics::codes;
use crate::file::Position;

/// Expected shape of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Any,
    /// Whole number
    Integer,
    /// Whole or decimal number
    Number,
}

impl ArgKind {
    fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        // Empty means "use the default"; variables are only known at runtime.
        if value.is_empty() || value.contains('$') {
            return true;
        }
        match self {
            ArgKind::Any => true,
            ArgKind::Integer => value.parse::<i64>().is_ok(),
            ArgKind::Number => value.parse::<f64>().is_ok(),
        }
    }
}

/// Table-driven validator: argument count plus per-position shape.
#[derive(Debug, Clone, Copy)]
pub struct Arity {
    min: usize,
    max: usize,
    kinds: &'static [ArgKind],
    parens_optional: bool,
}

impl Arity {
    pub const fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            kinds: &[],
            parens_optional: false,
        }
    }

    /// Shapes for the leading arguments; later arguments accept anything.
    pub const fn with_kinds(mut self, kinds: &'static [ArgKind]) -> Self {
        self.kinds = kinds;
        self
    }

    pub const fn parens_optional(mut self) -> Self {
        self.parens_optional = true;
        self
    }
}

impl AppValidator for Arity {
    fn requires_parens(&self) -> bool {
        !self.parens_optional
    }

    fn validate(&self, args: &str, _position: &Position) -> Validation {
        let fields = separate_args(args, ',').map_err(|issue| vec![issue])?;
        let mut issues = Vec::new();
        if fields.len() < self.min {
            issues.push(Issue::new(codes::E_APP_ARG_FEW).with_context(format!(
                "expected at least {}, got {}",
                self.min,
                fields.len()
            )));
        }
        if fields.len() > self.max {
            issues.push(Issue::new(codes::E_APP_ARG_MANY).with_context(format!(
                "expected at most {}, got {}",
                self.max,
                fields.len()
            )));
        }
        for (field, kind) in fields.iter().zip(self.kinds) {
            if !kind.accepts(field) {
                issues.push(Issue::new(codes::E_APP_ARG_BADOPT).with_context(field.as_str()));
            }
        }

        if issues.is_empty() {
            Ok(AppArgs::new(fields))
        } else {
            Err(issues)
        }
    }
}

/// `NoOp`: takes any text and does not need parentheses.
#[derive(Debug, Clone, Copy)]
pub struct NoOp;

impl AppValidator for NoOp {
    fn requires_parens(&self) -> bool {
        false
    }

    fn validate(&self, args: &str, _position: &Position) -> Validation {
        if args.is_empty() {
            Ok(AppArgs::default())
        } else {
            Ok(AppArgs::new(vec![args.to_string()]))
        }
    }
}

/// `Verbose([level,]message)`
#[derive(Debug, Clone, Copy)]
pub struct Verbose;

impl AppValidator for Verbose {
    fn validate(&self, args: &str, position: &Position) -> Validation {
        let args = Arity::new(1, 2).validate(args, position)?;
        if let [level, _message] = args.fields.as_slice() {
            let level = level.trim();
            let valid = level.contains('$') || matches!(level.parse::<u8>(), Ok(0..=4));
            if !valid {
                return Err(vec![Issue::new(codes::E_APP_ARG_BADOPT)
                    .with_context(format!("verbose level {level}"))]);
            }
        }
        Ok(args)
    }
}

/// `Set(name=value)`: the value may contain commas.
#[derive(Debug, Clone, Copy)]
pub struct Set;

impl AppValidator for Set {
    fn validate(&self, args: &str, _position: &Position) -> Validation {
        if args.trim().is_empty() {
            return Err(vec![Issue::new(codes::E_APP_ARG_FEW)]);
        }
        match args.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok(AppArgs::new(vec![
                name.to_string(),
                value.to_string(),
            ])),
            _ => Err(vec![Issue::new(codes::E_APP_ARG_BADOPT).with_context(args)]),
        }
    }
}

/// `GotoIf(condition?[labeliftrue][:labeliffalse])`
///
/// The breakdown is always three fields: condition, true and false branch.
#[derive(Debug, Clone, Copy)]
pub struct GotoIf;

impl AppValidator for GotoIf {
    fn validate(&self, args: &str, _position: &Position) -> Validation {
        if args.trim().is_empty() {
            return Err(vec![Issue::new(codes::E_APP_ARG_FEW)]);
        }
        let parts = separate_args(args, '?').map_err(|issue| vec![issue])?;
        let [condition, branches] = parts.as_slice() else {
            return Err(vec![Issue::new(codes::E_APP_ARG_BADOPT).with_context(args)]);
        };
        let mut labels = separate_args(branches, ':').map_err(|issue| vec![issue])?;
        if labels.len() > 2 {
            return Err(vec![Issue::new(codes::E_APP_ARG_MANY).with_context(branches.as_str())]);
        }
        labels.resize(2, String::new());

        let mut fields = vec![condition.clone()];
        fields.extend(labels);
        Ok(AppArgs::new(fields))
    }
}

const INTEGER: &[ArgKind] = &[ArgKind::Integer];
const NUMBER: &[ArgKind] = &[ArgKind::Number];
const DIAL: &[ArgKind] = &[ArgKind::Any, ArgKind::Integer];

pub fn register_noop(registry: &mut AppRegistry) {
    registry.register(&["NoOp"], NoOp);
}

pub fn register_answer(registry: &mut AppRegistry) {
    registry.register(&["Answer"], Arity::new(0, 1).with_kinds(INTEGER));
}

pub fn register_hangup(registry: &mut AppRegistry) {
    registry.register(&["Hangup"], Arity::new(0, 1).with_kinds(INTEGER));
}

pub fn register_dumpchan(registry: &mut AppRegistry) {
    registry.register(&["DumpChan"], Arity::new(0, 1).with_kinds(INTEGER));
}

pub fn register_verbose(registry: &mut AppRegistry) {
    registry.register(&["Verbose"], Verbose);
}

pub fn register_wait(registry: &mut AppRegistry) {
    registry.register(&["Wait"], Arity::new(1, 1).with_kinds(NUMBER));
}

pub fn register_playback(registry: &mut AppRegistry) {
    registry.register(&["Playback"], Arity::new(1, 2));
}

pub fn register_set(registry: &mut AppRegistry) {
    registry.register(&["Set"], Set);
}

pub fn register_goto(registry: &mut AppRegistry) {
    registry.register(&["Goto"], Arity::new(1, 3));
    registry.register(&["GotoIf"], GotoIf);
}

pub fn register_gosub(registry: &mut AppRegistry) {
    registry.register(&["Gosub"], Arity::new(1, 3));
    registry.register(&["Return"], Arity::new(0, 1));
}

pub fn register_dial(registry: &mut AppRegistry) {
    registry.register(&["Dial"], Arity::new(1, 4).with_kinds(DIAL));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new("extensions.conf", 1, Vec::new(), String::new(), false)
    }

    fn issue_codes(result: Validation) -> Vec<&'static str> {
        result.unwrap_err().into_iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_arity_bounds() {
        let hangup = Arity::new(0, 1).with_kinds(INTEGER);
        assert!(hangup.validate("", &pos()).unwrap().is_empty());
        assert_eq!(hangup.validate("16", &pos()).unwrap().fields, vec!["16"]);
        assert_eq!(issue_codes(hangup.validate("16,17", &pos())), vec![codes::E_APP_ARG_MANY]);
        assert_eq!(issue_codes(hangup.validate("busy", &pos())), vec![codes::E_APP_ARG_BADOPT]);
        assert!(hangup.validate("${CAUSE}", &pos()).is_ok());

        let playback = Arity::new(1, 2);
        assert_eq!(issue_codes(playback.validate("", &pos())), vec![codes::E_APP_ARG_FEW]);
    }

    #[test]
    fn test_wait_accepts_decimals() {
        let wait = Arity::new(1, 1).with_kinds(NUMBER);
        assert!(wait.validate("0.5", &pos()).is_ok());
        assert!(wait.validate("soon", &pos()).is_err());
    }

    #[test]
    fn test_dial_timeout_shape() {
        let dial = Arity::new(1, 4).with_kinds(DIAL);
        let args = dial.validate("SIP/100&SIP/101,30,tT", &pos()).unwrap();
        assert_eq!(args.get(0), Some("SIP/100&SIP/101"));
        assert_eq!(args.len(), 3);
        assert!(dial.validate("SIP/100,,tT", &pos()).is_ok());
        assert!(dial.validate("SIP/100,forever", &pos()).is_err());
    }

    #[test]
    fn test_noop_takes_anything() {
        assert!(!NoOp.requires_parens());
        assert!(NoOp.validate("a,(b", &pos()).is_ok());
        assert!(NoOp.validate("", &pos()).unwrap().is_empty());
    }

    #[test]
    fn test_verbose_level() {
        assert_eq!(Verbose.validate("foo", &pos()).unwrap().fields, vec!["foo"]);
        assert!(Verbose.validate("3,foo", &pos()).is_ok());
        assert_eq!(issue_codes(Verbose.validate("9,foo", &pos())), vec![codes::E_APP_ARG_BADOPT]);
        assert_eq!(issue_codes(Verbose.validate("", &pos())), vec![codes::E_APP_ARG_FEW]);
        assert_eq!(issue_codes(Verbose.validate("1,a,b", &pos())), vec![codes::E_APP_ARG_MANY]);
    }

    #[test]
    fn test_set_needs_name() {
        let args = Set.validate("CDR(userfield)=a,b", &pos()).unwrap();
        assert_eq!(args.fields, vec!["CDR(userfield)", "a,b"]);
        assert_eq!(issue_codes(Set.validate("=x", &pos())), vec![codes::E_APP_ARG_BADOPT]);
        assert_eq!(issue_codes(Set.validate("novalue", &pos())), vec![codes::E_APP_ARG_BADOPT]);
        assert_eq!(issue_codes(Set.validate("", &pos())), vec![codes::E_APP_ARG_FEW]);
    }

    #[test]
    fn test_gotoif_branches() {
        let args = GotoIf.validate("$[${X}=1]?yes,s,1:no,s,1", &pos()).unwrap();
        assert_eq!(args.fields, vec!["$[${X}=1]", "yes,s,1", "no,s,1"]);

        let args = GotoIf.validate("${C}?:done", &pos()).unwrap();
        assert_eq!(args.fields, vec!["${C}", "", "done"]);

        assert_eq!(issue_codes(GotoIf.validate("${C}", &pos())), vec![codes::E_APP_ARG_BADOPT]);
        assert_eq!(issue_codes(GotoIf.validate("${C}?a:b:c", &pos())), vec![codes::E_APP_ARG_MANY]);
    }
}
