//! Member function registration and trampoline overrides.

use crate::calldef::{argument_types, keyword_args};
use crate::class_writer::ClassInstance;
use crate::templates::tidy_name;
use wrapgen_decl::{AccessSpecifier, MemberFunction, Virtuality};

/// Whether a method stays out of the registration.
///
/// Unlike constructors, methods are not dropped for mentioning iterators.
pub fn exclude_method(instance: &ClassInstance<'_>, method: &MemberFunction) -> bool {
    if method.access == AccessSpecifier::Private {
        return true;
    }

    if method.owner != instance.decl_id {
        return true;
    }

    if instance
        .scope
        .gather(|f| f.excluded_methods.as_slice())
        .iter()
        .any(|name| **name == method.name)
    {
        return true;
    }

    if instance.excludes.excludes_return(&method.return_type) {
        return true;
    }

    method
        .arguments
        .iter()
        .any(|arg| instance.excludes.excludes_argument(&arg.ty))
}

fn const_adorn(method: &MemberFunction) -> &'static str {
    if method.is_const {
        " const "
    } else {
        ""
    }
}

/// Method registration, e.g.
///
/// ```text
///         .def(
///             "bar",
///             (void(Foo::*)(double)) &Foo::bar,
///             " " , py::arg("d") = 1.0 )
/// ```
pub fn method_wrapper(instance: &ClassInstance<'_>, method: &MemberFunction) -> Option<String> {
    if exclude_method(instance, method) {
        return None;
    }

    let (def_adorn, self_ptr) = if method.is_static {
        ("_static", "*".to_string())
    } else {
        ("", format!("{}::*", instance.host_name))
    };

    let binding = instance.template_binding();
    let default_args = keyword_args(
        &method.arguments,
        instance.scope.exclude_default_args(),
        binding.as_ref(),
    );

    let call_policy = if method.return_type.is_pointer() {
        instance.scope.pointer_call_policy()
    } else if method.return_type.is_reference() {
        instance.scope.reference_call_policy()
    } else {
        None
    }
    .map(|policy| format!(", py::return_value_policy::{}", policy))
    .unwrap_or_default();

    Some(format!(
        "        .def{def_adorn}(\n            \"{name}\",\n            ({ret}({self_ptr})({args}){const_adorn}) &{host}::{name},\n            \" \" {default_args} {call_policy})\n",
        def_adorn = def_adorn,
        name = method.name,
        ret = method.return_type,
        self_ptr = self_ptr,
        args = argument_types(&method.arguments),
        const_adorn = const_adorn(method),
        host = instance.host_name,
        default_args = default_args,
        call_policy = call_policy,
    ))
}

/// Trampoline override forwarding a virtual method to the host runtime.
///
/// Private methods get no override.
pub fn override_wrapper(instance: &ClassInstance<'_>, method: &MemberFunction) -> Option<String> {
    if method.access == AccessSpecifier::Private {
        return None;
    }

    let signature = method
        .arguments
        .iter()
        .map(|arg| format!("{} {}", arg.ty, arg.name))
        .collect::<Vec<_>>()
        .join(", ");
    let forwarded = method
        .arguments
        .iter()
        .map(|arg| format!("        {}", arg.name))
        .collect::<Vec<_>>()
        .join(",\n");
    let pure = if method.virtuality == Virtuality::PureVirtual {
        "_PURE"
    } else {
        ""
    };

    Some(format!(
        "    {ret} {name}({signature}){const_adorn} override {{\n        PYBIND11_OVERRIDE{pure}(\n            {tidy},\n            {host},\n            {name},\n            {forwarded});\n    }}\n",
        ret = method.return_type,
        name = method.name,
        signature = signature,
        const_adorn = const_adorn(method),
        pure = pure,
        tidy = tidy_name(method.return_type.spelling()),
        host = instance.host_name,
        forwarded = forwarded,
    ))
}
