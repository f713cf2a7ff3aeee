//! Watch mode: edits to the source tree after the initial build.

use std::sync::Arc;
use std::time::Duration;

use stylesync::{Compiler, Entry, FilenameTemplate, ManifestLocation};

use crate::common::*;

const TIMEOUT: Duration = Duration::from_secs(10);

fn start(env: &TestEnv, entry: Entry) -> Compiler {
    let events = Arc::new(RecordingSink::default());
    let compiler = Compiler::build(vec![entry], true, &echo_context(env.root(), events));
    assert!(compiler.compile().is_clean());
    assert!(compiler.is_watching());
    compiler
}

fn entry(env: &TestEnv) -> Entry {
    Entry::new(env.path("scss"), env.path("css"))
}

#[test]
fn new_and_edited_sources_are_compiled() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let compiler = start(&env, entry(&env));

    env.write("scss/extra.scss", "b {}");
    assert!(wait_for(TIMEOUT, || env.path("css/extra.css").exists()));

    env.write("scss/main.scss", "a { color: red; }");
    assert!(wait_for(TIMEOUT, || {
        std::fs::read_to_string(env.path("css/main.css"))
            .map(|c| c == echo_output("a { color: red; }"))
            .unwrap_or(false)
    }));

    compiler.stop();
}

#[test]
fn deleted_sources_take_their_artifacts_along() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}")
        .write("scss/pages/home.scss", "b {}")
        .write("scss/pages/about.scss", "c {}");
    let compiler = start(&env, entry(&env));
    assert_eq!(env.files("css").len(), 3);

    env.remove("scss/main.scss");
    assert!(wait_for(TIMEOUT, || !env.path("css/main.css").exists()));

    env.remove("scss/pages");
    assert!(wait_for(TIMEOUT, || !env.path("css/pages").exists()));
    assert!(env.path("css").is_dir(), "output root is never removed");

    compiler.stop();
}

#[test]
fn hashed_artifact_is_replaced_on_edit() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let entry = entry(&env)
        .with_template(FilenameTemplate::new("[name].[hash].css"))
        .with_manifest(ManifestLocation::new(env.root()));
    let compiler = start(&env, entry);
    let before = env.files("css");
    assert_eq!(before.len(), 1);

    env.write("scss/main.scss", "a { color: blue; }");
    assert!(wait_for(TIMEOUT, || {
        let now = env.files("css");
        now.len() == 1 && now != before
    }));
    compiler.flush();

    let current = format!("css/{}", env.files("css")[0]);
    assert!(wait_for(TIMEOUT, || {
        manifest_pairs(&env.path("manifest.json")) == vec![("scss/main".to_string(), current.clone())]
    }));

    compiler.stop();
}

#[test]
fn nothing_happens_after_stop() {
    let env = TestEnv::new();
    env.write("scss/main.scss", "a {}");
    let compiler = start(&env, entry(&env));
    compiler.stop();
    assert!(!compiler.is_watching());

    env.write("scss/late.scss", "b {}");
    std::thread::sleep(Duration::from_millis(500));
    assert!(!env.path("css/late.css").exists());
}
