#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for the `check` command.

mod common;

use std::sync::Arc;

use barrow::cli::GlobalOpts;
use barrow::commands;
use barrow::logging::Logger;
use common::RuleBuilder;

fn global_for(rule: &common::TestRule) -> GlobalOpts {
    GlobalOpts {
        dry_run: false,
        rule_dir: Some(rule.rule_dir()),
    }
}

#[test]
fn valid_rule_passes_without_touching_live_tree() {
    let rule = RuleBuilder::new()
        .dir("etc", 0o755)
        .file("etc/app.conf", 0o644, "x")
        .hooks("scripts: {boom: {cmd: \"false\"}}\nat_first: [boom]\n")
        .build();

    commands::check::run(&global_for(&rule), &Arc::new(Logger::new("check"))).unwrap();

    assert!(!common::exists(rule.live("etc")));
}

#[test]
fn invalid_rule_fails() {
    let rule = RuleBuilder::new()
        .line("644 root root /barrow/not-staged")
        .build();
    let err = commands::check::run(&global_for(&rule), &Arc::new(Logger::new("check")))
        .unwrap_err();
    assert_eq!(
        format!("{err:#}"),
        "validation error: ROOT dir not included: /barrow/not-staged"
    );
}

#[test]
fn missing_rule_dir_fails_to_load() {
    let tmp = tempfile::tempdir().unwrap();
    let global = GlobalOpts {
        dry_run: false,
        rule_dir: Some(tmp.path().join("nope")),
    };
    let err = commands::check::run(&global, &Arc::new(Logger::new("check"))).unwrap_err();
    assert!(err.to_string().starts_with("failed to load"), "got: {err:#}");
}
