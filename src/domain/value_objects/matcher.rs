//! File Matcher Value Object
//!
//! Predicate over file basenames deciding which sources an entry compiles.

use std::fmt;

use regex::Regex;

/// Any basename starting with a letter and ending in a Sass extension.
pub const DEFAULT_FILE_PATTERN: &str = r"^[a-zA-Z].+\.(scss|sass)$";

/// Regex-backed basename predicate
#[derive(Debug, Clone)]
pub struct FileMatcher {
    regex: Regex,
}

impl FileMatcher {
    /// Compile a matcher from a regular expression
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Test a file basename (not a path)
    pub fn matches(&self, basename: &str) -> bool {
        self.regex.is_match(basename)
    }

    /// The source pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for FileMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PATTERN).expect("default file pattern is valid")
    }
}

impl fmt::Display for FileMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}
