use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use stylesync::{
    Compiler, CompilerContext, Config, ConfigWarning, JsonEventSink, JsonManifestRepository,
    LocalFs, LogEventSink, SassCommand, SyncEventSink,
};

use crate::cli::Cli;

/// Compile every entry once, then keep watching when asked to
///
/// Returns whether every entry and every source compiled.
pub fn cmd_compile(cli: &Cli) -> Result<bool> {
    let root = std::env::current_dir().context("cannot determine working directory")?;
    let (config, warnings) = Config::discover(&root, cli.config.as_deref())?;
    warnings.iter().for_each(report_warning);

    let watch = cli.watch || config.watch;
    let entries = config.resolve_entries(&root, watch)?;

    let events: Arc<dyn SyncEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(LogEventSink::new())
    };

    let sass = SassCommand::new(config.compiler.program.clone());
    if !sass.is_available() {
        log::warn!("{} not found; every source will fail to compile", sass.program());
    }

    let context = CompilerContext {
        root,
        fs: Arc::new(LocalFs::new()),
        compiler: Arc::new(sass),
        repository: Arc::new(JsonManifestRepository::new().with_events(events.clone())),
        events,
    };

    let compiler = Compiler::build(entries, watch, &context);
    let summary = compiler.compile();

    if watch && compiler.is_watching() {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);
        })
        .context("failed to install Ctrl+C handler")?;

        log::info!("watching for changes, press Ctrl+C to stop");
        while running.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
        }
        compiler.stop();
    }

    Ok(summary.is_clean())
}

fn report_warning(warning: &ConfigWarning) {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(suggestion) => log::warn!(
            "{}: unknown key `{}` (did you mean `{}`?)",
            location,
            warning.key,
            suggestion
        ),
        None => log::warn!("{}: unknown key `{}`", location, warning.key),
    }
}
