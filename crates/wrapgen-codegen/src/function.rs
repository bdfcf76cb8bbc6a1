//! Free function and variable registration inside a module entry point.

use crate::calldef::{keyword_args, TypeExcludes};
use wrapgen_decl::FunctionDecl;
use wrapgen_info::{FreeFunctionInfo, Scope, VariableInfo};

/// `m.def("name", &name, " " , py::arg("x"));`, or `None` when one of the
/// function's types is excluded.
pub fn free_function_wrapper(
    function: &FreeFunctionInfo,
    decl: &FunctionDecl,
    scope: &Scope<'_>,
) -> Option<String> {
    let excludes = TypeExcludes::from_scope(scope);
    if excludes.excludes_return(&decl.return_type)
        || decl.arguments.iter().any(|arg| excludes.excludes_argument(&arg.ty))
    {
        tracing::debug!("Skipping free function {}", decl.name);
        return None;
    }

    let default_args = keyword_args(&decl.arguments, scope.exclude_default_args(), None);
    Some(format!(
        "    m.def(\"{}\", &{}, \" \" {});\n",
        function.host_name(),
        decl.name,
        default_args
    ))
}

/// `m.attr("name") = name;`, or `None` when the name is excluded.
pub fn variable_wrapper(variable: &VariableInfo, scope: &Scope<'_>) -> Option<String> {
    if scope
        .gather(|f| f.excluded_variables.as_slice())
        .iter()
        .any(|name| **name == variable.name)
    {
        return None;
    }
    Some(format!(
        "    m.attr(\"{}\") = {};\n",
        variable.host_name(),
        variable.name
    ))
}
