//! In-process fakes for the compile collaborator and event sink.

use std::path::Path;
use std::sync::{Arc, Mutex};

use stylesync::{
    CompileError, CompileOptions, CompiledStyle, CompilerContext, JsonManifestRepository,
    LocalFs, ManifestRepository, StyleCompiler, SyncEvent, SyncEventSink,
};

/// Compiles by prefixing the source text with its output style.
///
/// Sources containing `@error` fail, mimicking a Sass `@error` directive.
pub struct EchoCompiler;

impl StyleCompiler for EchoCompiler {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn compile(&self, path: &Path, options: &CompileOptions) -> Result<CompiledStyle, CompileError> {
        let source =
            std::fs::read_to_string(path).map_err(|e| CompileError::new(path, e.to_string()))?;
        if source.contains("@error") {
            return Err(CompileError::new(path, "@error raised"));
        }
        Ok(CompiledStyle::new(format!(
            "/* {} */{}",
            options.style.as_str(),
            source.trim()
        )))
    }
}

/// Output the `EchoCompiler` produces for `source` in compressed style
pub fn echo_output(source: &str) -> String {
    format!("/* compressed */{}", source.trim())
}

/// Event sink that records every event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SyncEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

impl SyncEventSink for RecordingSink {
    fn on_event(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Compiler context over the local filesystem with the echo compiler
pub fn echo_context(root: &Path, events: Arc<RecordingSink>) -> CompilerContext {
    CompilerContext {
        root: root.to_path_buf(),
        fs: Arc::new(LocalFs::new()),
        compiler: Arc::new(EchoCompiler),
        repository: Arc::new(JsonManifestRepository::new()),
        events,
    }
}

/// Sorted `(key, artifact)` pairs of a manifest file
pub fn manifest_pairs(path: &Path) -> Vec<(String, String)> {
    JsonManifestRepository::new()
        .load(path)
        .unwrap()
        .entries()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
