//! The info tree: what to wrap, under which names, in which order.
//!
//! A [`PackageInfo`] is built from the loaded configuration, refined by a
//! static scan of the headers (template instantiations, names), then merged
//! with the parsed declarations and finally ordered per module.

mod mangle;
mod merge;
mod ordering;
mod scope;
mod source;
mod template;
mod tree;

pub use mangle::{host_identifier, native_names};
pub use merge::{attach_declarations, discover_entities, unknown_classes, UnknownClass};
pub use ordering::sort_classes;
pub use scope::{default_name_replacements, Scope};
pub use source::{
    find_classes_in_source, read_stripped_source, strip_source, strip_whitespace, SourceClass,
};
pub use template::{extract_template_params, find_template_substitution};
pub use tree::{ClassInfo, FreeFunctionInfo, ModuleInfo, PackageInfo, VariableInfo};
