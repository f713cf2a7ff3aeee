//! Sass CLI Compiler
//!
//! Implements the StyleCompiler port by shelling out to a `sass`-compatible
//! executable and capturing the stylesheet it prints on stdout.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::{CompileError, CompileOptions, CompiledStyle, StyleCompiler};

/// Default executable looked up on `PATH`
pub const DEFAULT_PROGRAM: &str = "sass";

/// Runs `<program> --style=<style> [--embed-source-map|--no-source-map] <file>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SassCommand {
    program: String,
}

impl SassCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the executable can be launched
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn args(path: &Path, options: &CompileOptions) -> Vec<String> {
        let source_map = if options.source_map {
            "--embed-source-map"
        } else {
            "--no-source-map"
        };
        vec![
            format!("--style={}", options.style.as_str()),
            source_map.to_string(),
            path.to_string_lossy().into_owned(),
        ]
    }
}

impl Default for SassCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl StyleCompiler for SassCommand {
    fn name(&self) -> &'static str {
        "sass"
    }

    fn compile(
        &self,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledStyle, CompileError> {
        let output = Command::new(&self.program)
            .args(Self::args(path, options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| CompileError::new(path, format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("{} exited with {}", self.program, output.status),
                trimmed => trimmed.to_string(),
            };
            return Err(CompileError::new(path, message));
        }

        Ok(CompiledStyle::new(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}
