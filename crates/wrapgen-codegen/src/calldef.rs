//! Rules shared by constructors, methods and free functions.

use regex::Regex;
use wrapgen_config::TemplateArg;
use wrapgen_decl::{Argument, CppType};
use wrapgen_info::Scope;

/// Type exclusion lists gathered from a node and its ancestors, with all
/// spaces removed so they compare against compacted spellings.
#[derive(Debug, Clone, Default)]
pub struct TypeExcludes {
    calldef: Vec<String>,
    return_types: Vec<String>,
    arg_types: Vec<String>,
    constructor_arg_types: Vec<String>,
    constructor_signatures: Vec<Vec<String>>,
}

impl TypeExcludes {
    pub fn from_scope(scope: &Scope<'_>) -> Self {
        Self {
            calldef: scope.gather_compact(|f| f.calldef_excludes.as_slice()),
            return_types: scope.gather_compact(|f| f.return_type_excludes.as_slice()),
            arg_types: scope.gather_compact(|f| f.arg_type_excludes.as_slice()),
            constructor_arg_types: scope
                .gather_compact(|f| f.constructor_arg_type_excludes.as_slice()),
            constructor_signatures: scope
                .gather(|f| f.constructor_signature_excludes.as_slice())
                .into_iter()
                .map(|signature| signature.iter().map(|ty| ty.replace(' ', "")).collect())
                .collect(),
        }
    }

    pub fn excludes_return(&self, ty: &CppType) -> bool {
        let compact = ty.compact();
        self.calldef.contains(&compact) || self.return_types.contains(&compact)
    }

    /// A method or free function argument is excluded by its leading token
    /// (`::std::vector<unsigned` for `::std::vector<unsigned int> const &`)
    /// or by its whole compacted spelling.
    pub fn excludes_argument(&self, ty: &CppType) -> bool {
        let leading = ty.leading_token().to_string();
        let compact = ty.compact();
        [&self.calldef, &self.arg_types]
            .iter()
            .any(|list| list.contains(&leading) || list.contains(&compact))
    }

    /// Constructor arguments are excluded by exact match, by substring of a
    /// constructor exclusion, or when they mention an iterator.
    pub fn excludes_constructor_argument(&self, ty: &CppType) -> bool {
        let compact = ty.compact();
        compact.to_lowercase().contains("iterator")
            || self.calldef.contains(&compact)
            || self
                .constructor_arg_types
                .iter()
                .any(|excluded| compact.contains(excluded.as_str()))
    }

    pub fn excludes_constructor_signature(&self, arguments: &[Argument]) -> bool {
        let signature: Vec<String> = arguments.iter().map(|a| a.ty.compact()).collect();
        self.constructor_signatures.contains(&signature)
    }
}

/// Template parameters of the instantiation being emitted, used to rewrite
/// default values such as `DIM_A` or `Foo::DIM_A`.
#[derive(Debug, Clone, Copy)]
pub struct TemplateBinding<'a> {
    pub class_name: &'a str,
    pub params: &'a [String],
    pub args: &'a [TemplateArg],
}

impl TemplateBinding<'_> {
    pub fn substitute(&self, value: &str) -> String {
        let mut value = value.to_string();
        for (param, arg) in self.params.iter().zip(self.args) {
            if !value.contains(param.as_str()) {
                continue;
            }
            let arg = arg.to_string();
            let qualified = format!(
                r"\b{}::{}\b",
                regex::escape(self.class_name),
                regex::escape(param)
            );
            if let Ok(re) = Regex::new(&qualified) {
                value = re.replace_all(&value, regex::NoExpand(&arg)).into_owned();
            }
            if let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(param))) {
                value = re.replace_all(&value, regex::NoExpand(&arg)).into_owned();
            }
        }
        value
    }
}

/// Keyword argument list, e.g. `, py::arg("d") = 1.0, py::arg("flag")`.
///
/// With `exclude_defaults` only the names are emitted.
pub fn keyword_args(
    arguments: &[Argument],
    exclude_defaults: bool,
    binding: Option<&TemplateBinding<'_>>,
) -> String {
    let mut text = String::new();
    for argument in arguments {
        text.push_str(&format!(", py::arg(\"{}\")", argument.name));
        if exclude_defaults {
            continue;
        }
        let Some(default) = &argument.default_value else {
            continue;
        };
        let mut value = match binding {
            Some(binding) => binding.substitute(default),
            None => default.clone(),
        };
        if value.trim() == "{}" {
            value = format!("{}{{}}", argument.ty.decay());
        }
        text.push_str(" = ");
        text.push_str(&value);
    }
    text
}

/// Argument type spellings joined for a signature, e.g. `int, bool`.
pub fn argument_types(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(|a| a.ty.spelling())
        .collect::<Vec<_>>()
        .join(", ")
}
