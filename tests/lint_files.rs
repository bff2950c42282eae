//! End-to-end runs against real files on disk.

use std::path::Path;

use pbxlint_core::diagnostics::codes;
use pbxlint_core::{
    parse_config, parse_dialplan, AppRegistry, Collector, FileResolver, LintError, ParserOptions,
    Severity,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_config_with_include() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "sip.conf",
        "[general]\nbindport=5060\n#include \"users.conf\"\n",
    );
    write(temp.path(), "users.conf", "[100]\ntype=friend\nsecret=s3cret ; not really\n");

    let collector = Collector::shared();
    let sections = parse_config(
        FileResolver::new(temp.path()),
        "sip.conf",
        collector.clone(),
        ParserOptions::default(),
    )
    .unwrap();

    assert!(collector.is_empty(), "{:?}", collector.diagnostics());
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].get("bindport"), Some("5060"));
    assert_eq!(sections[1].name, "100");
    assert_eq!(sections[1].get("secret"), Some("s3cret"));
    assert_eq!(sections[1].entries[0].position().filename.as_ref(), "users.conf");
}

#[test]
fn test_missing_include_is_a_diagnostic() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "sip.conf",
        "[general]\n#include \"missing.conf\"\nbindport=5060\n",
    );

    let collector = Collector::shared();
    let sections = parse_config(
        FileResolver::new(temp.path()),
        "sip.conf",
        collector.clone(),
        ParserOptions::default(),
    )
    .unwrap();

    assert_eq!(sections[0].len(), 1);
    assert_eq!(collector.count(codes::E_CONF_INCLUDE_FAIL), 1);
    assert_eq!(collector.worst_severity(), Some(Severity::Error));
}

#[test]
fn test_missing_root_is_hard_error() {
    let temp = TempDir::new().unwrap();
    let collector = Collector::shared();
    let result = parse_config(
        FileResolver::new(temp.path()),
        "nothing.conf",
        collector.clone(),
        ParserOptions::default(),
    );

    assert!(matches!(result, Err(LintError::RootUnreadable { .. })));
    assert!(collector.is_empty());
}

#[test]
fn test_trailing_blank_lines() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "test.conf", "[a]\nx=1\n\n\n");

    let collector = Collector::shared();
    parse_config(
        FileResolver::new(temp.path()),
        "test.conf",
        collector.clone(),
        ParserOptions::default(),
    )
    .unwrap();

    assert_eq!(collector.len(), 1);
    let diagnostic = &collector.diagnostics()[0];
    assert_eq!(diagnostic.code, codes::W_WSV_EOF);
    assert_eq!(diagnostic.position.lineno, 3);
    assert_eq!(diagnostic.to_string(), "test.conf:3: W_WSV_EOF");
}

#[test]
fn test_dialplan_across_directories() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "extensions.conf",
        "[default]\n\
exten => s,1,Answer()\n \
same => n,Playback(hello-world)\n \
same => n,Hangup()\n\
\n\
#include \"macros/sub.conf\"\n",
    );
    write(
        temp.path(),
        "macros/sub.conf",
        "[sub-ring]\n\
exten => s,1,Dial(SIP/${ARG1},20)\n \
same => n,Return()\n",
    );

    let collector = Collector::shared();
    let registry = AppRegistry::v11();
    let dialplan = parse_dialplan(
        FileResolver::new(temp.path()),
        "extensions.conf",
        collector.clone(),
        &registry,
        ParserOptions::default(),
    )
    .unwrap();

    assert!(collector.is_empty(), "{:?}", collector.diagnostics());
    assert_eq!(dialplan.contexts.len(), 2);
    let sub = dialplan.context("sub-ring").unwrap();
    let steps: Vec<_> = sub.steps().collect();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].app, "Dial");
    assert_eq!(
        steps[0].parsed.as_ref().unwrap().fields,
        vec!["SIP/${ARG1}", "20"]
    );
    assert_eq!(steps[1].number, Some(2));
    assert_eq!(steps[1].position.filename.as_ref(), "macros/sub.conf");
}
