//! Value Objects
//!
//! Immutable types whose identity is their value.

mod hash;
mod matcher;
mod template;

pub use hash::ContentHash;
pub use matcher::{FileMatcher, DEFAULT_FILE_PATTERN};
pub use template::{FilenameTemplate, DEFAULT_OUTPUT_EXTENSION};
