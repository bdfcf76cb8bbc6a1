//! Attributes accepted at every level of the package hierarchy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configurable behaviour shared by packages, modules, classes, free
/// functions and variables.
///
/// Unset values are inherited from the enclosing level when the info tree
/// resolves them; list values are gathered from every level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Exclude this feature (and everything it owns) from wrapping.
    #[serde(default)]
    pub excluded: Option<bool>,

    /// Exact argument types that exclude a method or free function.
    #[serde(default)]
    pub arg_type_excludes: Vec<String>,

    /// Exact return types that exclude a method or free function.
    #[serde(default)]
    pub return_type_excludes: Vec<String>,

    /// Exact argument or return types that exclude any call definition.
    #[serde(default)]
    pub calldef_excludes: Vec<String>,

    /// Substrings of constructor argument types that exclude the constructor.
    #[serde(default)]
    pub constructor_arg_type_excludes: Vec<String>,

    /// Whole ordered constructor signatures to exclude, e.g. `[["int", "bool"]]`.
    #[serde(default)]
    pub constructor_signature_excludes: Vec<Vec<String>>,

    /// Method names that are never wrapped.
    #[serde(default)]
    pub excluded_methods: Vec<String>,

    /// Variable names that are never wrapped.
    #[serde(default)]
    pub excluded_variables: Vec<String>,

    /// Return value policy for pointer-returning methods, e.g. `reference`.
    #[serde(default)]
    pub pointer_call_policy: Option<String>,

    /// Return value policy for reference-returning methods.
    #[serde(default)]
    pub reference_call_policy: Option<String>,

    /// Smart pointer type holding wrapped classes, e.g. `std::shared_ptr`.
    #[serde(default)]
    pub smart_ptr_type: Option<String>,

    /// Identifier of a registered custom generator.
    #[serde(default)]
    pub custom_generator: Option<String>,

    /// Text placed at the top of every generated file.
    #[serde(default)]
    pub prefix_text: Option<String>,

    /// Lines emitted before the class registration.
    #[serde(default)]
    pub prefix_code: Vec<String>,

    /// Lines emitted at the end of the class registration.
    #[serde(default)]
    pub suffix_code: Vec<String>,

    /// Extra includes, e.g. `"<vector>"` or `"Foo.hpp"`.
    #[serde(default)]
    pub source_includes: Vec<String>,

    /// Literal substitutions applied when deriving host names.
    #[serde(default)]
    pub name_replacements: IndexMap<String, String>,

    /// Template signatures and the instantiations to wrap for them.
    #[serde(default)]
    pub template_substitutions: Vec<TemplateSubstitution>,

    /// Include the header collection instead of per-class includes.
    #[serde(default)]
    pub common_include_file: Option<bool>,

    /// Drop default argument values from generated bindings.
    #[serde(default)]
    pub exclude_default_args: Option<bool>,
}

/// One template substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSubstitution {
    /// Parameter signature, e.g. `<unsigned DIM_A, unsigned DIM_B = DIM_A>`.
    pub signature: String,
    /// One argument tuple per instantiation, e.g. `[[2, 2], [3, 3]]`.
    pub replacement: Vec<Vec<TemplateArg>>,
}

impl TemplateSubstitution {
    /// Number of parameters declared by the signature.
    pub fn param_count(&self) -> usize {
        let signature = self.signature.trim();
        let inner = signature.strip_prefix('<').unwrap_or(signature);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        if inner.trim().is_empty() {
            return 0;
        }

        let mut depth = 0i32;
        let mut count = 1;
        for ch in inner.chars() {
            match ch {
                '<' | '(' => depth += 1,
                '>' | ')' => depth -= 1,
                ',' if depth == 0 => count += 1,
                _ => {}
            }
        }
        count
    }
}

/// A concrete template argument as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateArg {
    Int(i64),
    Text(String),
}

impl fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArg::Int(value) => write!(f, "{}", value),
            TemplateArg::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for TemplateArg {
    fn from(value: i64) -> Self {
        TemplateArg::Int(value)
    }
}

impl From<&str> for TemplateArg {
    fn from(value: &str) -> Self {
        TemplateArg::Text(value.to_string())
    }
}
