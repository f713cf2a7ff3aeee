//! Several entries writing one manifest, and writers contending for its lock.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stylesync::{
    Compiler, CompilerContext, Entry, FilenameTemplate, JsonManifestRepository, LocalFs,
    LockRetry, ManifestLocation, SyncEvent,
};

use crate::common::*;

fn hashed_entry(env: &TestEnv, source: &str, output: &str) -> Entry {
    Entry::new(env.path(source), env.path(output))
        .with_template(FilenameTemplate::new("[name].[hash].css"))
        .with_manifest(ManifestLocation::new(env.path("build")))
}

fn context_with_retry(env: &TestEnv, events: Arc<RecordingSink>, retry: LockRetry) -> CompilerContext {
    CompilerContext {
        root: env.root().to_path_buf(),
        fs: Arc::new(LocalFs::new()),
        compiler: Arc::new(EchoCompiler),
        repository: Arc::new(
            JsonManifestRepository::new()
                .with_retry(retry)
                .with_events(events.clone()),
        ),
        events,
    }
}

#[test]
fn entries_merge_into_one_manifest() {
    let env = TestEnv::new();
    env.write("app/scss/main.scss", "a {}")
        .write("admin/scss/panel.scss", "b {}");
    let entries = vec![
        hashed_entry(&env, "app/scss", "public/app"),
        hashed_entry(&env, "admin/scss", "public/admin"),
    ];

    let events = Arc::new(RecordingSink::default());
    let summary = Compiler::build(entries, false, &echo_context(env.root(), events)).compile();
    assert!(summary.is_clean());

    let keys: Vec<String> = manifest_pairs(&env.path("build/manifest.json"))
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(keys, vec!["admin/scss/panel", "app/scss/main"]);
}

#[test]
fn one_entry_pruning_keeps_the_other_entrys_mappings() {
    let env = TestEnv::new();
    env.write("app/scss/main.scss", "a {}")
        .write("admin/scss/panel.scss", "b {}");
    let entries = || {
        vec![
            hashed_entry(&env, "app/scss", "public/app"),
            hashed_entry(&env, "admin/scss", "public/admin"),
        ]
    };

    let events = Arc::new(RecordingSink::default());
    Compiler::build(entries(), false, &echo_context(env.root(), events)).compile();

    env.remove("admin/scss/panel.scss");
    let events = Arc::new(RecordingSink::default());
    Compiler::build(entries(), false, &echo_context(env.root(), events)).compile();

    let pairs = manifest_pairs(&env.path("build/manifest.json"));
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0, "app/scss/main");
    assert!(env.files("public/admin").is_empty());
}

#[test]
fn waits_for_another_writer_to_release_the_lock() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let manifest = env.path("build/manifest.json");
    let lock = JsonManifestRepository::lock_path(&manifest);
    std::fs::create_dir_all(env.path("build")).unwrap();
    std::fs::write(&lock, "other").unwrap();

    let releaser = {
        let lock = lock.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            std::fs::remove_file(lock).unwrap();
        })
    };

    let events = Arc::new(RecordingSink::default());
    let retry = LockRetry {
        attempts: 100,
        delay: Duration::from_millis(20),
    };
    let summary = Compiler::build(
        vec![hashed_entry(&env, "scss", "css")],
        false,
        &context_with_retry(&env, events.clone(), retry),
    )
    .compile();
    releaser.join().unwrap();

    assert!(summary.is_clean());
    assert_eq!(manifest_pairs(&manifest).len(), 1);
    assert!(!lock.exists());
    assert!(events.count(|e| matches!(e, SyncEvent::ManifestLockContended { .. })) > 0);
}

#[test]
fn stuck_lock_fails_the_save_but_not_the_build() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let manifest = env.path("build/manifest.json");
    let lock = JsonManifestRepository::lock_path(&manifest);
    std::fs::create_dir_all(env.path("build")).unwrap();
    std::fs::write(&lock, "other").unwrap();

    let events = Arc::new(RecordingSink::default());
    let retry = LockRetry {
        attempts: 3,
        delay: Duration::from_millis(10),
    };
    let summary = Compiler::build(
        vec![hashed_entry(&env, "scss", "css")],
        false,
        &context_with_retry(&env, events.clone(), retry),
    )
    .compile();

    assert!(summary.is_clean());
    assert_eq!(env.files("css").len(), 1);
    assert!(!manifest.exists());
    assert!(lock.exists(), "a marker owned by someone else is never removed");
    assert!(events.count(|e| matches!(e, SyncEvent::ManifestSaveFailed { .. })) > 0);
}
