//! Sections, variables and the event stream they are built from.

use std::rc::Rc;

use crate::dialplan::CallStep;
use crate::file::Position;

/// Discovery-order identity of a section (0 for the first header seen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey(pub usize);

/// A `key=value` (or `key => value`) assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub key: String,
    /// Trimmed value with `\;` unescaped
    pub value: String,
    /// Whether the `=>` object form was used
    pub arrow: bool,
    /// Section that was current when the line was parsed
    pub section: SectionKey,
    pub position: Rc<Position>,
}

/// One entry of a section, in parse order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Variable(Variable),
    Step(CallStep),
}

impl Entry {
    /// Section the entry belongs to.
    pub fn section(&self) -> SectionKey {
        match self {
            Entry::Variable(v) => v.section,
            Entry::Step(s) => s.section,
        }
    }

    /// Line the entry was parsed from.
    pub fn position(&self) -> &Rc<Position> {
        match self {
            Entry::Variable(v) => &v.position,
            Entry::Step(s) => &s.position,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Entry::Variable(v) => Some(v),
            Entry::Step(_) => None,
        }
    }

    pub fn as_step(&self) -> Option<&CallStep> {
        match self {
            Entry::Step(s) => Some(s),
            Entry::Variable(_) => None,
        }
    }
}

/// A section header as it was met in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    pub key: SectionKey,
    pub name: String,
    pub position: Rc<Position>,
    /// `(!)` marker: the section only serves as a template
    pub template: bool,
    /// Templates this section inherits from
    pub templates: Vec<String>,
    /// The name was already discovered earlier; the cursor moved back to it
    pub reopened: bool,
}

/// Events produced by the config parser, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    /// A header line; the shared "current section" now points at `key`
    Section(SectionHeader),
    /// An entry for the section that was current when it was parsed
    Entry(Entry),
}

/// A named group of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: SectionKey,
    pub name: String,
    /// Where the section was first declared
    pub position: Rc<Position>,
    pub template: bool,
    pub templates: Vec<String>,
    pub entries: Vec<Entry>,
}

impl Section {
    /// Create an empty section from its first header.
    pub fn from_header(header: SectionHeader) -> Self {
        Self {
            key: header.key,
            name: header.name,
            position: header.position,
            template: header.template,
            templates: header.templates,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Plain variables, in parse order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().filter_map(Entry::as_variable)
    }

    /// Dialplan call steps, in parse order.
    pub fn steps(&self) -> impl Iterator<Item = &CallStep> {
        self.entries.iter().filter_map(Entry::as_step)
    }

    /// First value assigned to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }
}

impl<'s> IntoIterator for &'s Section {
    type Item = &'s Entry;
    type IntoIter = std::slice::Iter<'s, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Folds a [`ConfigEvent`] stream into sections in discovery order.
#[derive(Debug, Default)]
pub struct SectionCollector {
    sections: Vec<Section>,
}

impl SectionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    pub fn push(&mut self, event: ConfigEvent) {
        match event {
            ConfigEvent::Section(header) => {
                if !header.reopened {
                    debug_assert_eq!(header.key.0, self.sections.len());
                    self.sections.push(Section::from_header(header));
                }
            }
            ConfigEvent::Entry(entry) => {
                if let Some(section) = self.sections.get_mut(entry.section().0) {
                    section.entries.push(entry);
                }
            }
        }
    }

    /// Sections collected so far, by key.
    pub fn get(&self, key: SectionKey) -> Option<&Section> {
        self.sections.get(key.0)
    }

    pub fn finish(self) -> Vec<Section> {
        self.sections
    }
}

/// Collect a whole event stream into sections.
pub fn collect_sections<I>(events: I) -> Vec<Section>
where
    I: IntoIterator<Item = ConfigEvent>,
{
    let mut collector = SectionCollector::new();
    for event in events {
        collector.push(event);
    }
    collector.finish()
}
