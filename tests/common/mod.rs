//! Common test utilities for Stylesync integration and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated working directory plus helpers to run the CLI
//! - Fakes: `EchoCompiler`, `RecordingSink`
//! - Assertion macros: `assert_exists!`, `assert_missing!`

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fakes;

pub use assertions::*;
pub use env::*;
pub use fakes::*;
