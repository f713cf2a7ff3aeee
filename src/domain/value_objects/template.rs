//! Filename Template Value Object
//!
//! Turns a source file into its artifact filename (`render`) and guesses the
//! source basename back from an artifact filename (`recover`).
//!
//! Templates contain `[token]` placeholders. Two tokens are understood:
//!
//! - `[name]` - the source basename without extension
//! - `[hash]` - the first 8 hex chars of the generated content digest
//!
//! Unknown tokens are left in the output verbatim.
//!
//! `recover` first matches the artifact name against the template's shape:
//! literal text must match exactly, `[hash]` matches 8 lowercase hex chars and
//! `[name]` captures the basename. Names that do not fit the shape (written by
//! another template, or hand-made) fall back to a positional heuristic that
//! takes `[name]` from the dot-separated segment at the placeholder's ordinal
//! position. A wrong fallback guess means a reverse pass treats that artifact
//! as stray and deletes it; nothing regenerates it unless its source compiles
//! again.

use std::path::Path;

use regex::Regex;

use super::ContentHash;

/// Artifact extension used when no template is configured or the template has none.
pub const DEFAULT_OUTPUT_EXTENSION: &str = ".css";

const NAME_TOKEN: &str = "name";
const HASH_TOKEN: &str = "hash";

/// Parsed output filename template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameTemplate {
    template: Option<String>,
    placeholders: Vec<String>,
}

impl FilenameTemplate {
    /// Parse a template string such as `[name].[hash].css`
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            placeholders: parse_placeholders(&template),
            template: Some(template),
        }
    }

    /// Template from optional configuration; `None` behaves like `[name].css`
    pub fn from_option(template: Option<&str>) -> Self {
        template.map(Self::new).unwrap_or_default()
    }

    /// The configured template string, if any
    pub fn as_str(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Token names in order of appearance (duplicates kept)
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Whether the template embeds tokens that `recover` cannot restore
    pub fn has_opaque_tokens(&self) -> bool {
        self.placeholders.iter().any(|p| p != NAME_TOKEN)
    }

    /// Extension of generated artifacts, including the leading dot
    pub fn output_extension(&self) -> &str {
        self.template
            .as_deref()
            .and_then(template_extension)
            .unwrap_or(DEFAULT_OUTPUT_EXTENSION)
    }

    /// Render the artifact filename for `source` whose compiled output is `content`
    pub fn render(&self, source: &Path, content: &str) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(template) = self.template.as_deref() else {
            return format!("{}{}", stem, DEFAULT_OUTPUT_EXTENSION);
        };

        let mut hash: Option<ContentHash> = None;
        let mut output = template.to_string();
        for placeholder in &self.placeholders {
            let token = format!("[{}]", placeholder);
            match placeholder.as_str() {
                NAME_TOKEN => output = output.replacen(&token, &stem, 1),
                HASH_TOKEN => {
                    let hash = hash.get_or_insert_with(|| ContentHash::from_content(content));
                    output = output.replacen(&token, hash.short(), 1);
                }
                _ => {}
            }
        }

        if template_extension(template).is_none() {
            output.push_str(DEFAULT_OUTPUT_EXTENSION);
        }
        output
    }

    /// Guess the source basename (no extension) for an artifact filename
    pub fn recover(&self, output_file_name: &str) -> String {
        if let Some(name) = self.match_shape(output_file_name) {
            return name;
        }

        let base = match self.template.as_deref() {
            None => strip_extension(output_file_name).to_string(),
            Some(template) => {
                let segments: Vec<&str> = output_file_name.split('.').collect();
                let mut base = match template_extension(template) {
                    Some(ext) => template.strip_suffix(ext).unwrap_or(template).to_string(),
                    None => template.to_string(),
                };
                for (idx, placeholder) in self.placeholders.iter().enumerate() {
                    let token = format!("[{}]", placeholder);
                    let value = if placeholder == NAME_TOKEN {
                        segments.get(idx).copied().unwrap_or("")
                    } else {
                        ""
                    };
                    base = base.replacen(&token, value, 1);
                }
                base
            }
        };

        base.trim_end_matches(['.', '_']).to_string()
    }

    /// Basename captured by `[name]` when `output_file_name` fits the template exactly
    fn match_shape(&self, output_file_name: &str) -> Option<String> {
        let mut pattern = String::from("^");
        let mut name_groups = 0;
        match self.template.as_deref() {
            None => {
                pattern.push_str("(.+)");
                name_groups += 1;
            }
            Some(template) => {
                for part in split_parts(template) {
                    match part {
                        Part::Literal(text) => pattern.push_str(&regex::escape(text)),
                        Part::Token(NAME_TOKEN) => {
                            pattern.push_str("(.+)");
                            name_groups += 1;
                        }
                        Part::Token(HASH_TOKEN) => pattern.push_str("[0-9a-f]{8}"),
                        Part::Token(other) => {
                            pattern.push_str(&regex::escape(&format!("[{}]", other)))
                        }
                    }
                }
            }
        }
        if name_groups == 0 {
            return None;
        }
        if self.template.as_deref().and_then(template_extension).is_none() {
            pattern.push_str(&regex::escape(DEFAULT_OUTPUT_EXTENSION));
        }
        pattern.push('$');

        let captures = Regex::new(&pattern).ok()?.captures(output_file_name)?;
        let first = captures.get(1)?.as_str();
        // Repeated `[name]` tokens must agree.
        (2..=name_groups)
            .all(|i| captures.get(i).map(|m| m.as_str()) == Some(first))
            .then(|| first.to_string())
    }
}

enum Part<'a> {
    Literal(&'a str),
    Token(&'a str),
}

/// Split a template into literal text and `[token]` groups
///
/// `[]` and an unclosed `[` are literal text.
fn split_parts(template: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        if close == 0 {
            parts.push(Part::Literal(&rest[..open + 2]));
        } else {
            parts.push(Part::Literal(&rest[..open]));
            parts.push(Part::Token(&after[..close]));
        }
        rest = &after[close + 1..];
    }
    parts.push(Part::Literal(rest));
    parts
}

/// Collect the contents of every `[...]` group
fn parse_placeholders(template: &str) -> Vec<String> {
    split_parts(template)
        .into_iter()
        .filter_map(|part| match part {
            Part::Token(token) => Some(token.to_string()),
            Part::Literal(_) => None,
        })
        .collect()
}

/// Literal extension of a template (`.css` in `[name].[hash].css`)
///
/// A trailing segment that is itself a token is not an extension.
fn template_extension(template: &str) -> Option<&str> {
    let dot = template.rfind('.')?;
    let ext = &template[dot..];
    if dot == 0 || ext.len() == 1 || ext.contains('[') || ext.contains(']') {
        return None;
    }
    Some(ext)
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}
