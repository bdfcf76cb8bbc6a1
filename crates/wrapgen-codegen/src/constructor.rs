//! Constructor registration.

use crate::calldef::{argument_types, keyword_args};
use crate::class_writer::ClassInstance;
use wrapgen_decl::{AccessSpecifier, Constructor, ConstructorKind, Virtuality};

/// Whether a constructor stays out of the registration.
pub fn exclude_constructor(instance: &ClassInstance<'_>, ctor: &Constructor) -> bool {
    let query = instance.query;

    // Subclasses could not implement a private pure virtual method.
    if query
        .member_functions(instance.decl_id)
        .iter()
        .any(|m| m.virtuality == Virtuality::PureVirtual && m.access == AccessSpecifier::Private)
    {
        return true;
    }

    if instance.decl.is_abstract
        && query
            .recursive_bases(instance.decl_id)
            .iter()
            .any(|&base| query.class(base).is_abstract)
    {
        return true;
    }

    // Constructors of nested types, e.g. an iterator class.
    if ctor.owner != instance.decl_id {
        return true;
    }

    if ctor.kind == ConstructorKind::Copy && ctor.is_artificial {
        return true;
    }

    if ctor
        .arguments
        .iter()
        .any(|arg| instance.excludes.excludes_constructor_argument(&arg.ty))
    {
        return true;
    }

    instance.excludes.excludes_constructor_signature(&ctor.arguments)
}

/// `.def(py::init<int, bool >(), py::arg("i") = 1, py::arg("b"))`, or
/// `None` when the constructor is excluded.
pub fn constructor_wrapper(instance: &ClassInstance<'_>, ctor: &Constructor) -> Option<String> {
    if exclude_constructor(instance, ctor) {
        return None;
    }

    let binding = instance.template_binding();
    Some(format!(
        "        .def(py::init<{} >(){})\n",
        argument_types(&ctor.arguments),
        keyword_args(
            &ctor.arguments,
            instance.scope.exclude_default_args(),
            binding.as_ref()
        )
    ))
}
