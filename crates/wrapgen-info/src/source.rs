//! Light textual scanning of native headers.
//!
//! This is not a parser. Sources are reduced to a canonical single-line form
//! (comments, preprocessor lines and non-essential whitespace removed) so
//! that class definitions can be located with a regular expression.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use wrapgen_common::{Result, WrapError};

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").expect("Invalid regex"));
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex"));
static PREPROCESSOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"#.*").expect("Invalid regex"));
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]").expect("Invalid regex"));
static WORD_EDGE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\s+|\s+\b").expect("Invalid regex"));
static SYMBOL_EDGE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\B\s+|\s+\B").expect("Invalid regex"));

/// A class definition found by [`find_classes_in_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceClass {
    /// `class` or `struct`.
    pub keyword: String,
    pub name: String,
    /// Base clause without the leading colon, e.g. `public Shape<DIM>`.
    pub bases: Option<String>,
}

/// Collapse whitespace to the minimum that keeps tokens apart.
///
/// `"template <int A, int B>\nclass Foo {"` becomes
/// `"template<int A,int B>class Foo{"`.
pub fn strip_whitespace(source: &str) -> String {
    let source = NEWLINES.replace_all(source, " ");
    let source = WORD_EDGE_SPACE.replace_all(&source, " ");
    SYMBOL_EDGE_SPACE.replace_all(&source, "").into_owned()
}

/// Remove comments, preprocessor lines and non-essential whitespace.
pub fn strip_source(source: &str) -> String {
    let source = LINE_COMMENT.replace_all(source, "");
    let source = BLOCK_COMMENT.replace_all(&source, " ");
    let source = PREPROCESSOR.replace_all(&source, "");
    strip_whitespace(&source)
}

/// Read a header and reduce it with [`strip_source`].
pub fn read_stripped_source(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| WrapError::io(path, e))?;
    let joined = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(strip_source(&joined))
}

/// Find class definitions in stripped source text.
///
/// With `class_name` only that class is reported; with `template_signature`
/// only definitions preceded by `template<signature>` are.
pub fn find_classes_in_source(
    source: &str,
    class_name: Option<&str>,
    template_signature: Option<&str>,
) -> Vec<SourceClass> {
    let mut pattern = String::from(r"\b");

    if let Some(signature) = template_signature {
        pattern.push_str(r"template\s*");
        pattern.push_str(&regex::escape(&strip_whitespace(signature.trim())));
        pattern.push_str(r"\s*");
    }

    pattern.push_str(r"(class|struct)\s+");

    match class_name {
        Some(name) => {
            pattern.push('(');
            pattern.push_str(&regex::escape(&strip_whitespace(name.trim())));
            pattern.push(')');
        }
        None => pattern.push_str(r"(\w+)"),
    }

    pattern.push_str(r"\s*(?::\s*([^{;]+))?\s*\{");

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Skipping source scan with unusable pattern {}: {}", pattern, e);
            return Vec::new();
        }
    };

    re.captures_iter(source)
        .map(|caps| SourceClass {
            keyword: caps[1].to_string(),
            name: caps[2].to_string(),
            bases: caps.get(3).map(|m| m.as_str().trim().to_string()),
        })
        .collect()
}
