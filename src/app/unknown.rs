//! Fallback for applications the registry does not know.

use super::builtin::separate_args;
use super::{AppValidator, Issue, Validation};
use crate::diagnostics::codes;
use crate::file::Position;

/// Validator used for unregistered application names.
///
/// Always reports `H_APP_MISSING` and, when the arguments cannot be split,
/// an unbalanced-argument error as well.
#[derive(Debug, Clone)]
pub struct UnknownApp {
    name: String,
}

impl UnknownApp {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AppValidator for UnknownApp {
    fn validate(&self, args: &str, _position: &Position) -> Validation {
        let mut issues = vec![Issue::new(codes::H_APP_MISSING).with_context(self.name.as_str())];
        if let Err(issue) = separate_args(args, ',') {
            issues.push(issue);
        }
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reports_balance() {
        let pos = Position::new("x.conf", 3, Vec::new(), String::new(), false);
        let issues = UnknownApp::new("Frob").validate("a,(b", &pos).unwrap_err();
        let found: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert_eq!(found, vec![codes::H_APP_MISSING, codes::E_APP_ARG_UNBALANCED]);

        let issues = UnknownApp::new("Frob").validate("a,b", &pos).unwrap_err();
        assert_eq!(issues.len(), 1);
    }
}
