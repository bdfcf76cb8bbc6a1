//! Native and host names for class instantiations.

use crate::tree::ClassInfo;
use indexmap::IndexMap;
use wrapgen_config::TemplateArg;

/// Native spellings, one per instantiation: `Foo<2, 2>`, or `Foo` when the
/// class is not generic.
pub fn native_names(name: &str, arg_lists: &[Vec<TemplateArg>]) -> Vec<String> {
    if arg_lists.is_empty() {
        return vec![name.to_string()];
    }

    arg_lists
        .iter()
        .map(|args| {
            let args: Vec<String> = args.iter().map(ToString::to_string).collect();
            format!("{}<{}>", name, args.join(", "))
        })
        .collect()
}

/// Host identifier for one instantiation of `base`.
///
/// `base` and every argument go through the replacement table as literal
/// substring substitutions, lose template punctuation and get a capital
/// first letter; argument fragments are appended with `_`. A non-generic
/// name is returned unchanged.
pub fn host_identifier(
    base: &str,
    args: &[TemplateArg],
    replacements: &IndexMap<String, String>,
) -> String {
    if args.is_empty() {
        return base.to_string();
    }

    let mut identifier = clean_fragment(base, replacements);
    for arg in args {
        identifier.push('_');
        identifier.push_str(&clean_fragment(&arg.to_string(), replacements));
    }
    identifier
}

fn clean_fragment(text: &str, replacements: &IndexMap<String, String>) -> String {
    let mut fragment = text.to_string();
    for (pattern, replacement) in replacements {
        if !pattern.is_empty() {
            fragment = fragment.replace(pattern.as_str(), replacement);
        }
    }

    let fragment: String = fragment
        .replace('-', "Neg")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    capitalize(&fragment)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if text.len() > 1 => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}

impl ClassInfo {
    /// Recompute native and host names from the current template arguments.
    pub fn update_names(&mut self, replacements: &IndexMap<String, String>) {
        self.native_names = native_names(&self.name, &self.template_arg_lists);

        let base = self.name_override.as_deref().unwrap_or(&self.name);
        self.host_names = if self.template_arg_lists.is_empty() {
            vec![base.to_string()]
        } else {
            self.template_arg_lists
                .iter()
                .map(|args| host_identifier(base, args, replacements))
                .collect()
        };
    }
}
