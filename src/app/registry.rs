//! Name to validator registry.
//!
//! The registry has no knowledge of concrete applications. Versioned
//! application sets (see [`crate::app::v11`]) fill it at startup.

use std::collections::HashMap;
use std::rc::Rc;

use super::{AppValidator, UnknownApp, Validation};
use crate::file::Position;

struct Registered {
    canonical: String,
    validator: Rc<dyn AppValidator>,
}

/// Maps application names (case-insensitive) to validators.
#[derive(Default)]
pub struct AppRegistry {
    apps: HashMap<String, Registered>,
}

impl AppRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under a name and its aliases.
    ///
    /// The first name is the canonical spelling. Registering a name twice
    /// replaces the earlier validator.
    pub fn register(&mut self, names: &[&str], validator: impl AppValidator + 'static) {
        let Some(canonical) = names.first() else {
            return;
        };
        let validator: Rc<dyn AppValidator> = Rc::new(validator);
        for name in names {
            self.apps.insert(
                name.to_ascii_lowercase(),
                Registered {
                    canonical: canonical.to_string(),
                    validator: Rc::clone(&validator),
                },
            );
        }
    }

    /// Exact, case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&dyn AppValidator> {
        self.apps
            .get(&name.to_ascii_lowercase())
            .map(|r| r.validator.as_ref())
    }

    /// Canonical spelling of a registered name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.apps
            .get(&name.to_ascii_lowercase())
            .map(|r| r.canonical.as_str())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.apps.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of registered names, aliases included.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Whether a call to `name` should carry parentheses.
    pub fn requires_parens(&self, name: &str) -> bool {
        match self.lookup(name) {
            Some(validator) => validator.requires_parens(),
            None => UnknownApp::new(name).requires_parens(),
        }
    }

    /// Validate a call, falling back to [`UnknownApp`] for unregistered names.
    pub fn validate(&self, name: &str, args: &str, position: &Position) -> Validation {
        match self.lookup(name) {
            Some(validator) => validator.validate(args, position),
            None => UnknownApp::new(name).validate(args, position),
        }
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.apps.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("AppRegistry").field("apps", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppArgs, Issue};
    use crate::diagnostics::codes;

    struct Fixed(bool);

    impl AppValidator for Fixed {
        fn validate(&self, args: &str, _position: &Position) -> Validation {
            if self.0 {
                Ok(AppArgs::new(vec![args.to_string()]))
            } else {
                Err(vec![Issue::new(codes::E_APP_ARG_MANY)])
            }
        }
    }

    fn position() -> Position {
        Position::new("extensions.conf", 1, Vec::new(), String::new(), true)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = AppRegistry::new();
        registry.register(&["NoOp"], Fixed(true));
        assert!(registry.lookup("noop").is_some());
        assert!(registry.lookup("NOOP").is_some());
        assert!(registry.lookup("NoOps").is_none());
        assert_eq!(registry.canonical_name("noop"), Some("NoOp"));
    }

    #[test]
    fn test_aliases_share_validator() {
        let mut registry = AppRegistry::new();
        registry.register(&["Exec", "ExecIf"], Fixed(false));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.canonical_name("execif"), Some("Exec"));
        assert!(registry.validate("ExecIf", "", &position()).is_err());
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let registry = AppRegistry::new();
        assert!(registry.is_empty());
        let issues = registry
            .validate("Frobnicate", "a,b", &position())
            .unwrap_err();
        assert_eq!(issues[0].code, codes::H_APP_MISSING);
        assert_eq!(issues[0].context.as_deref(), Some("Frobnicate"));
        assert!(registry.requires_parens("Frobnicate"));
    }

    #[test]
    fn test_empty_registration_is_ignored() {
        let mut registry = AppRegistry::new();
        registry.register(&[], Fixed(true));
        assert!(registry.is_empty());
    }
}
