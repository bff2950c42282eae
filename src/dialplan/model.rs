//! Call steps and the assembled dialplan.

use std::fmt;
use std::rc::Rc;

use crate::app::AppArgs;
use crate::config::{Section, SectionKey};
use crate::file::Position;

/// Priority field of a call step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    /// `1`
    Number(u32),
    /// `1(label)`
    Labeled(u32, String),
    /// `n`
    Next,
    /// `n(label)`
    NextLabeled(String),
    /// `hint`: the step value is a device string
    Hint,
}

impl Priority {
    /// Parse a trimmed priority field. Zero and non-numeric values are rejected;
    /// `n` and `hint` are case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("hint") {
            return Some(Priority::Hint);
        }
        let (base, label) = match text.split_once('(') {
            Some((base, rest)) => {
                let label = rest.strip_suffix(')')?;
                if label.is_empty() {
                    return None;
                }
                (base, Some(label.to_string()))
            }
            None => (text, None),
        };

        if base.eq_ignore_ascii_case("n") {
            return Some(match label {
                Some(label) => Priority::NextLabeled(label),
                None => Priority::Next,
            });
        }
        if !base.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match (base.parse::<u32>().ok()?, label) {
            (0, _) => None,
            (n, Some(label)) => Some(Priority::Labeled(n, label)),
            (n, None) => Some(Priority::Number(n)),
        }
    }

    /// Jump label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Priority::Labeled(_, label) | Priority::NextLabeled(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_next(&self) -> bool {
        matches!(self, Priority::Next | Priority::NextLabeled(_))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Number(n) => write!(f, "{n}"),
            Priority::Labeled(n, label) => write!(f, "{n}({label})"),
            Priority::Next => write!(f, "n"),
            Priority::NextLabeled(label) => write!(f, "n({label})"),
            Priority::Hint => write!(f, "hint"),
        }
    }
}

/// One `exten =>` or `same =>` line.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStep {
    /// Extension pattern (inherited for `same`)
    pub extension: String,
    pub priority: Priority,
    /// Numeric priority after resolving `n`; `None` for hints and unresolvable `n`
    pub number: Option<u32>,
    /// Application name as written (device string for hints)
    pub app: String,
    /// Raw text between the outermost parentheses
    pub args: String,
    /// Validator breakdown when the arguments were accepted
    pub parsed: Option<AppArgs>,
    pub section: SectionKey,
    pub position: Rc<Position>,
}

impl CallStep {
    pub fn is_hint(&self) -> bool {
        self.priority == Priority::Hint
    }
}

/// Sections of an `extensions.conf`-style file, split by role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dialplan {
    pub general: Option<Section>,
    pub globals: Option<Section>,
    /// Call-handling contexts, in discovery order
    pub contexts: Vec<Section>,
}

impl Dialplan {
    /// Split collected sections into general, globals and contexts.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut dialplan = Self::default();
        for section in sections {
            if section.name.eq_ignore_ascii_case("general") {
                dialplan.general = Some(section);
            } else if section.name.eq_ignore_ascii_case("globals") {
                dialplan.globals = Some(section);
            } else {
                dialplan.contexts.push(section);
            }
        }
        dialplan
    }

    /// Context by exact name.
    pub fn context(&self, name: &str) -> Option<&Section> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// All call steps of all contexts, in order.
    pub fn steps(&self) -> impl Iterator<Item = &CallStep> {
        self.contexts.iter().flat_map(Section::steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priority() {
        assert_eq!(Priority::parse("1"), Some(Priority::Number(1)));
        assert_eq!(Priority::parse("n"), Some(Priority::Next));
        assert_eq!(
            Priority::parse("n(label2)"),
            Some(Priority::NextLabeled("label2".to_string()))
        );
        assert_eq!(
            Priority::parse("3(start)"),
            Some(Priority::Labeled(3, "start".to_string()))
        );
        assert_eq!(Priority::parse("hint"), Some(Priority::Hint));
        assert_eq!(Priority::parse("HINT"), Some(Priority::Hint));
        assert_eq!(Priority::parse("N"), Some(Priority::Next));
        assert_eq!(
            Priority::parse("N(retry)"),
            Some(Priority::NextLabeled("retry".to_string()))
        );
    }

    #[test]
    fn test_parse_bad_priority() {
        for text in ["0", "-1", "x", "", "n(", "n()", "1(a", "+2", "nn", "4294967296"] {
            assert_eq!(Priority::parse(text), None, "{text:?}");
        }
    }

    #[test]
    fn test_priority_display() {
        for text in ["1", "n", "n(a)", "2(b)", "hint"] {
            assert_eq!(Priority::parse(text).unwrap().to_string(), text);
        }
        assert_eq!(Priority::parse("n(a)").unwrap().label(), Some("a"));
    }
}
