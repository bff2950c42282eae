//! Application set of PBX version 11.

use super::apps;
use super::AppRegistry;

/// Registration functions, in registration order.
pub const APPLICATIONS: &[fn(&mut AppRegistry)] = &[
    apps::register_noop,
    apps::register_answer,
    apps::register_hangup,
    apps::register_dumpchan,
    apps::register_verbose,
    apps::register_wait,
    apps::register_playback,
    apps::register_set,
    apps::register_goto,
    apps::register_gosub,
    apps::register_dial,
];

/// Register every version 11 application.
pub fn register(registry: &mut AppRegistry) {
    for register_app in APPLICATIONS {
        register_app(registry);
    }
}

impl AppRegistry {
    /// Registry holding the version 11 application set.
    pub fn v11() -> Self {
        let mut registry = Self::new();
        register(&mut registry);
        registry
    }
}
