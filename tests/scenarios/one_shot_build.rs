//! One-shot compile runs: fresh builds, rebuilds after edits, stale output.

use std::sync::Arc;

use stylesync::{Compiler, Entry, FileMatcher, FilenameTemplate, ManifestLocation, SyncEvent};

use crate::common::*;
use crate::{assert_exists, assert_missing};

fn entry(env: &TestEnv) -> Entry {
    Entry::new(env.path("scss"), env.path("css"))
}

#[test]
fn fresh_build_mirrors_tree_and_skips_partials() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a { color: red; }")
        .write("scss/_mixins.scss", "@mixin m {}")
        .write("scss/pages/home.scss", "body { margin: 0; }")
        .write("scss/pages/notes.txt", "not a stylesheet");

    let events = Arc::new(RecordingSink::default());
    let compiler = Compiler::build(vec![entry(&env)], false, &echo_context(env.root(), events));
    let summary = compiler.compile();

    assert!(summary.is_clean());
    assert_eq!(env.files("css"), vec!["main.css", "pages/home.css"]);
    assert_eq!(env.read("css/main.css"), echo_output("a { color: red; }"));
    assert_missing!(env, "css/_mixins.css");
}

#[test]
fn second_run_touches_nothing() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let entry = entry(&env)
        .with_template(FilenameTemplate::new("[name].[hash].css"))
        .with_manifest(ManifestLocation::new(env.root()));

    let first = Arc::new(RecordingSink::default());
    Compiler::build(vec![entry.clone()], false, &echo_context(env.root(), first)).compile();
    let manifest_before = env.read("manifest.json");

    let second = Arc::new(RecordingSink::default());
    let summary =
        Compiler::build(vec![entry], false, &echo_context(env.root(), second.clone())).compile();

    assert!(summary.report.is_noop());
    assert_eq!(env.read("manifest.json"), manifest_before);
    assert_eq!(
        second.count(|e| matches!(e, SyncEvent::FileWritten { .. })),
        0
    );
    assert_eq!(
        second.count(|e| matches!(e, SyncEvent::ManifestSaved { .. })),
        0
    );
}

#[test]
fn rebuild_after_offline_edits_converges() {
    let env = TestEnv::new();
    env.write("scss/keep.scss", "a {}")
        .write("scss/gone.scss", "b {}")
        .write("scss/old/one.scss", "c {}");
    let entry = entry(&env)
        .with_template(FilenameTemplate::new("[name].[hash].css"))
        .with_manifest(ManifestLocation::new(env.root()));

    let events = Arc::new(RecordingSink::default());
    Compiler::build(vec![entry.clone()], false, &echo_context(env.root(), events)).compile();
    assert_eq!(manifest_pairs(&env.path("manifest.json")).len(), 3);

    // Changes made while nothing was running
    env.remove("scss/gone.scss");
    env.remove("scss/old");
    env.write("scss/keep.scss", "a { color: blue; }");

    let events = Arc::new(RecordingSink::default());
    let summary =
        Compiler::build(vec![entry], false, &echo_context(env.root(), events)).compile();
    assert!(summary.is_clean());

    let files = env.files("css");
    assert_eq!(files.len(), 1, "unexpected artifacts: {:?}", files);
    assert!(files[0].starts_with("keep.") && files[0].ends_with(".css"));
    assert_missing!(env, "css/old");

    let pairs = manifest_pairs(&env.path("manifest.json"));
    assert_eq!(pairs, vec![("scss/keep".to_string(), format!("css/{}", files[0]))]);
}

#[test]
fn stray_artifacts_are_removed_other_files_kept() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}")
        .write("css/leftover.css", "old")
        .write("css/vendor/reset.css", "old")
        .write("css/notes.txt", "kept");

    let events = Arc::new(RecordingSink::default());
    Compiler::build(vec![entry(&env)], false, &echo_context(env.root(), events)).compile();

    assert_eq!(env.files("css"), vec!["main.css", "notes.txt"]);
    assert_missing!(env, "css/vendor");
}

#[test]
fn failing_source_does_not_block_siblings() {
    let env = TestEnv::new();
    env.write("scss/bad.scss", "@error \"nope\";")
        .write("scss/good.scss", "a {}");

    let events = Arc::new(RecordingSink::default());
    let summary =
        Compiler::build(vec![entry(&env)], false, &echo_context(env.root(), events.clone()))
            .compile();

    assert!(summary.is_success());
    assert!(!summary.is_clean());
    assert_exists!(env, "css/good.css");
    assert_missing!(env, "css/bad.css");
    assert_eq!(
        events.count(|e| matches!(e, SyncEvent::CompileFailed { .. })),
        1
    );
}

#[test]
fn custom_pattern_selects_sources() {
    let env = TestEnv::new();
    env.write("styles/app.sass", "a")
        .write("styles/theme.scss", "b");
    let entry = Entry::new(env.path("styles"), env.path("public"))
        .with_matcher(FileMatcher::new(r"^[^_].*\.sass$").unwrap());

    let events = Arc::new(RecordingSink::default());
    Compiler::build(vec![entry], false, &echo_context(env.root(), events)).compile();

    assert_eq!(env.files("public"), vec!["app.css"]);
}

#[test]
fn in_place_entry_keeps_sources() {
    let env = TestEnv::new();
    env.write("site/main.scss", "a {}")
        .write("site/nested/part.scss", "b {}");
    let entry = Entry::new(env.path("site"), env.path("site"));

    let events = Arc::new(RecordingSink::default());
    let summary = Compiler::build(vec![entry], false, &echo_context(env.root(), events)).compile();

    assert!(summary.is_clean());
    assert_exists!(env, "site/main.scss");
    assert_exists!(env, "site/main.css");
    assert_exists!(env, "site/nested/part.scss");
    assert_exists!(env, "site/nested/part.css");
}

#[test]
fn missing_source_dir_fails_only_that_entry() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let entries = vec![
        Entry::new(env.path("absent"), env.path("out")),
        entry(&env),
    ];

    let events = Arc::new(RecordingSink::default());
    let summary = Compiler::build(entries, false, &echo_context(env.root(), events)).compile();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, env.path("absent"));
    assert_exists!(env, "css/main.css");
}
