//! Stylesheet Compiler Implementations

mod sass;

pub use sass::{SassCommand, DEFAULT_PROGRAM};
