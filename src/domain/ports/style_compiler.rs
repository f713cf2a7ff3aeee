//! StyleCompiler port - the stylesheet transform
//!
//! Takes a source path plus options and returns generated stylesheet text.
//! Implementations must not touch the filesystem beyond reading the source
//! (and whatever it imports).

use std::path::{Path, PathBuf};

/// Output formatting requested from the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Compressed,
    Expanded,
}

impl OutputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Compressed => "compressed",
            OutputStyle::Expanded => "expanded",
        }
    }
}

/// Per-call compile options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub style: OutputStyle,
    pub source_map: bool,
}

impl CompileOptions {
    pub fn new(minify: bool, source_map: bool) -> Self {
        Self {
            style: if minify {
                OutputStyle::Compressed
            } else {
                OutputStyle::Expanded
            },
            source_map,
        }
    }
}

/// Compiler output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
    pub content: String,
}

impl CompiledStyle {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Compile failure for one source file
#[derive(Debug, Clone, thiserror::Error)]
#[error("{file}: {message}")]
pub struct CompileError {
    pub file: PathBuf,
    pub message: String,
}

impl CompileError {
    pub fn new(file: &Path, message: impl Into<String>) -> Self {
        Self {
            file: file.to_path_buf(),
            message: message.into(),
        }
    }
}

impl From<CompileError> for crate::error::StyleSyncError {
    fn from(err: CompileError) -> Self {
        crate::error::StyleSyncError::Compile {
            file: err.file,
            message: err.message,
        }
    }
}

/// Source-to-stylesheet transform
pub trait StyleCompiler: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &'static str;

    /// Compile one source file
    fn compile(&self, source: &Path, options: &CompileOptions)
        -> Result<CompiledStyle, CompileError>;
}
