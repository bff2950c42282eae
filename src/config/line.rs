//! Classification of a single logical config line.
//!
//! The functions here are pure: they take text and describe it. The parser
//! decides which diagnostics to raise from the description.

/// Split off an inline comment starting at the first unescaped `;`.
pub(crate) fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            ';' if !escaped => return (&text[..idx], Some(&text[idx..])),
            _ => escaped = false,
        }
    }
    (text, None)
}

/// Whether a comment opens a `;--` block that it does not close itself.
pub(crate) fn opens_block_comment(comment: &str) -> bool {
    comment
        .strip_prefix(";--")
        .is_some_and(|rest| !rest.contains("--;"))
}

pub(crate) fn is_hspace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Separator between `#include` and the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    /// Exactly one space
    Single,
    /// Whitespace, but not exactly one space (or none at all)
    Irregular,
    /// Contains control bytes
    Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IncludeTarget<'t> {
    Quoted { name: &'t str, trailing: bool },
    Bare(&'t str),
    Unterminated,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IncludeLine<'t> {
    pub try_only: bool,
    pub separator: Separator,
    pub target: IncludeTarget<'t>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderLine<'t> {
    pub name: &'t str,
    pub template: bool,
    pub templates: Vec<&'t str>,
    pub trailing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssignmentLine<'t> {
    pub key: &'t str,
    pub value: String,
    pub arrow: bool,
    pub irregular_space: bool,
}

/// What a non-blank, non-comment line is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement<'t> {
    Include(IncludeLine<'t>),
    UnknownDirective(&'t str),
    Header(HeaderLine<'t>),
    Assignment(AssignmentLine<'t>),
    /// Not classifiable; carries the diagnostic code to raise
    Invalid(&'static str),
}

/// Classify a statement. `body` has leading whitespace and comment removed.
pub(crate) fn classify(body: &str) -> Statement<'_> {
    let body = body.trim_end_matches(is_hspace);
    if let Some(rest) = body.strip_prefix('#') {
        classify_directive(rest)
    } else if body.starts_with('[') {
        classify_header(body)
    } else {
        classify_assignment(body)
    }
}

fn classify_directive(rest: &str) -> Statement<'_> {
    let keyword_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (keyword, rest) = rest.split_at(keyword_len);
    let try_only = match keyword {
        "include" => false,
        "tryinclude" => true,
        _ => return Statement::UnknownDirective(keyword),
    };

    let sep_len = rest
        .find(|c: char| !(is_hspace(c) || c.is_control()))
        .unwrap_or(rest.len());
    let (separator, target) = rest.split_at(sep_len);
    let separator = if separator.chars().any(|c| c.is_control() && c != '\t') {
        Separator::Control
    } else if separator == " " {
        Separator::Single
    } else {
        Separator::Irregular
    };

    let target = if let Some(quoted) = target.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => IncludeTarget::Quoted {
                name: &quoted[..end],
                trailing: !quoted[end + 1..].trim().is_empty(),
            },
            None => IncludeTarget::Unterminated,
        }
    } else if target.is_empty() {
        IncludeTarget::Missing
    } else {
        IncludeTarget::Bare(target)
    };

    Statement::Include(IncludeLine {
        try_only,
        separator,
        target,
    })
}

fn classify_header(body: &str) -> Statement<'_> {
    let Some(close) = body.find(']') else {
        return Statement::Invalid(crate::diagnostics::codes::E_CONF_CTX_UNCLOSED);
    };
    let name = &body[1..close];
    if name.trim().is_empty() {
        return Statement::Invalid(crate::diagnostics::codes::E_CONF_CTX_EMPTY);
    }

    let mut rest = &body[close + 1..];
    let mut template = false;
    let mut templates = Vec::new();
    if let Some(options) = rest.strip_prefix('(') {
        if let Some(end) = options.find(')') {
            for option in options[..end].split(',').map(str::trim) {
                match option {
                    "" => {}
                    "!" => template = true,
                    other => templates.push(other),
                }
            }
            rest = &options[end + 1..];
        }
    }

    Statement::Header(HeaderLine {
        name,
        template,
        templates,
        trailing: !rest.trim().is_empty(),
    })
}

fn classify_assignment(body: &str) -> Statement<'_> {
    let Some(eq) = body.find('=') else {
        return Statement::Invalid(crate::diagnostics::codes::E_CONF_UNPARSABLE);
    };
    let key_part = &body[..eq];
    let after = &body[eq + 1..];
    let (arrow, value_part) = match after.strip_prefix('>') {
        Some(value_part) => (true, value_part),
        None => (false, after),
    };

    let key = key_part.trim_end_matches(is_hspace);
    if key.is_empty() {
        return Statement::Invalid(crate::diagnostics::codes::E_CONF_UNPARSABLE);
    }
    let value = value_part.trim_matches(is_hspace);
    let space_before = &key_part[key.len()..];
    let space_after = &value_part[..value_part.len() - value_part.trim_start_matches(is_hspace).len()];

    let irregular_space = if arrow {
        !matches!(space_before, "" | " ") || !matches!(space_after, "" | " ")
    } else {
        !space_before.is_empty() || !space_after.is_empty()
    };

    Statement::Assignment(AssignmentLine {
        key,
        value: value.replace("\\;", ";"),
        arrow,
        irregular_space,
    })
}
