//! Type spellings reported by the parser front-end.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Split template arguments at top-level commas.
///
/// `"int, std::map<int, double>"` yields `["int", "std::map<int, double>"]`.
pub fn parse_template_args(args: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in args.chars() {
        match ch {
            '<' | '(' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim().to_string();
                if !trimmed.is_empty() {
                    result.push(trimmed);
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        result.push(trimmed);
    }

    result
}

/// A C++ type, kept as the exact declaration string the parser printed.
///
/// Generated code must reproduce the spelling verbatim, so the type is not
/// decomposed; the queries below inspect the outermost declarator only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CppType(String);

impl CppType {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self(spelling.into())
    }

    /// The declaration string, e.g. `::std::vector<double> const &`.
    pub fn spelling(&self) -> &str {
        &self.0
    }

    /// The spelling with every space removed.
    pub fn compact(&self) -> String {
        self.0.replace(' ', "")
    }

    /// First whitespace-separated token of the spelling.
    pub fn leading_token(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or("")
    }

    /// `T*`, including `T* const`.
    pub fn is_pointer(&self) -> bool {
        strip_trailing_cv(self.0.trim()).ends_with('*')
    }

    /// `T&` or `T&&`.
    pub fn is_reference(&self) -> bool {
        self.0.trim().ends_with('&')
    }

    /// The type with references and top-level cv-qualifiers removed.
    pub fn decay(&self) -> String {
        let mut spelling = self.0.trim();
        spelling = spelling.trim_end_matches('&').trim_end();
        spelling = strip_trailing_cv(spelling);
        loop {
            let stripped = spelling
                .strip_prefix("const ")
                .or_else(|| spelling.strip_prefix("volatile "));
            match stripped {
                Some(rest) => spelling = rest.trim_start(),
                None => break,
            }
        }
        spelling.to_string()
    }
}

fn strip_trailing_cv(mut spelling: &str) -> &str {
    loop {
        let stripped = spelling
            .strip_suffix(" const")
            .or_else(|| spelling.strip_suffix(" volatile"));
        match stripped {
            Some(rest) => spelling = rest.trim_end(),
            None => return spelling,
        }
    }
}

impl fmt::Display for CppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CppType {
    fn from(spelling: &str) -> Self {
        Self::new(spelling)
    }
}
