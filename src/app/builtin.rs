//! Call syntax rules shared by every application.
//!
//! These rules run before any application validator: they find the
//! application name, check the whitespace around it and extract the raw
//! argument string. Only the parenthesis requirement depends on the
//! application ([`super::AppValidator::requires_parens`]).

use super::Issue;
use crate::diagnostics::codes;

/// An application call split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCall<'t> {
    /// Name as written
    pub name: &'t str,
    /// Raw text between the outermost parentheses (empty without parentheses)
    pub args: &'t str,
    /// Whether an opening parenthesis was present
    pub parenthesized: bool,
    /// Syntax problems found while splitting
    pub issues: Vec<Issue>,
}

fn is_hspace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split the text after the priority field into name and arguments.
pub fn split_call(raw: &str) -> AppCall<'_> {
    let mut issues = Vec::new();
    let trimmed = raw.trim_start_matches(is_hspace);
    if trimmed.len() != raw.len() {
        issues.push(Issue::new(codes::W_APP_WSH));
    }
    let trimmed = trimmed.trim_end_matches(is_hspace);

    let name_len = trimmed
        .find(|c: char| c == '(' || is_hspace(c))
        .unwrap_or(trimmed.len());
    let (name, rest) = trimmed.split_at(name_len);
    if name.is_empty() {
        issues.push(Issue::new(codes::E_APP_MISSING));
    }

    let after = rest.trim_start_matches(is_hspace);
    if after.is_empty() {
        return AppCall {
            name,
            args: "",
            parenthesized: false,
            issues,
        };
    }

    let Some(inner) = after.strip_prefix('(') else {
        issues.push(Issue::new(codes::E_APP_NO_PARENS).with_context(after));
        return AppCall {
            name,
            args: after,
            parenthesized: false,
            issues,
        };
    };
    if after.len() != rest.len() {
        issues.push(Issue::new(codes::E_APP_WSH));
    }

    let args = match inner.rfind(')') {
        Some(close) => {
            let tail = &inner[close + 1..];
            if !tail.trim().is_empty() {
                issues.push(Issue::new(codes::E_APP_TRAILING).with_context(tail));
            }
            &inner[..close]
        }
        None => {
            issues.push(Issue::new(codes::E_APP_PAREN_UNCLOSED));
            inner
        }
    };

    AppCall {
        name,
        args,
        parenthesized: true,
        issues,
    }
}

/// The missing-parentheses warning, if the application asks for parentheses.
pub fn parens_issue(call: &AppCall<'_>, requires_parens: bool) -> Option<Issue> {
    let bare = !call.parenthesized && call.args.is_empty() && !call.name.is_empty();
    if bare && requires_parens {
        Some(Issue::new(codes::W_APP_NEED_PARENS).with_context(call.name))
    } else {
        None
    }
}

/// Split arguments on `delimiter`, ignoring delimiters inside quotes,
/// brackets, `${...}`/`$[...]` expressions and after a backslash.
///
/// An empty string has no arguments. Unbalanced nesting yields
/// `E_APP_ARG_UNBALANCED`.
pub fn separate_args(args: &str, delimiter: char) -> std::result::Result<Vec<String>, Issue> {
    if args.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut nesting: Vec<char> = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in args.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                current.push(c);
                continue;
            }
            '"' => in_quotes = !in_quotes,
            '(' | '[' | '{' if !in_quotes => nesting.push(c),
            ')' | ']' | '}' if !in_quotes => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if nesting.pop() != Some(open) {
                    return Err(Issue::new(codes::E_APP_ARG_UNBALANCED).with_context(args));
                }
            }
            _ if c == delimiter && !in_quotes && nesting.is_empty() => {
                fields.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if in_quotes || !nesting.is_empty() {
        return Err(Issue::new(codes::E_APP_ARG_UNBALANCED).with_context(args));
    }
    fields.push(current);
    Ok(fields)
}
