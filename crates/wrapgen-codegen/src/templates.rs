//! Fixed pybind11 text fragments.

use wrapgen_common::{CLASS_OVERRIDE_SUFFIX, WRAPGEN_EXT};

/// Header declaring a class's registration entry point.
pub fn class_hpp_header(host_name: &str) -> String {
    format!(
        "#ifndef {host}_hpp__{ext}_wrapper\n\
         #define {host}_hpp__{ext}_wrapper\n\
         \n\
         #include <pybind11/pybind11.h>\n\
         \n\
         void register_{host}_class(pybind11::module &m);\n\
         #endif // {host}_hpp__{ext}_wrapper\n",
        host = host_name,
        ext = WRAPGEN_EXT,
    )
}

/// Opening of a class source unit. `includes` is newline terminated.
pub fn class_cpp_header(
    includes: &str,
    native_name: &str,
    host_name: &str,
    smart_ptr_handle: &str,
) -> String {
    format!(
        "#include <pybind11/pybind11.h>\n\
         #include <pybind11/stl.h>\n\
         {includes}\n\
         #include \"{host}.{ext}.hpp\"\n\
         \n\
         namespace py = pybind11;\n\
         typedef {native} {host};\n\
         {smart_ptr_handle};\n",
        includes = includes,
        host = host_name,
        ext = WRAPGEN_EXT,
        native = native_name,
        smart_ptr_handle = smart_ptr_handle,
    )
}

/// `PYBIND11_DECLARE_HOLDER_TYPE(T, boost::shared_ptr<T>)`
pub fn smart_pointer_holder(smart_ptr_type: &str) -> String {
    format!("PYBIND11_DECLARE_HOLDER_TYPE(T, {}<T>)", smart_ptr_type)
}

/// Name of the trampoline subtype for a host class.
pub fn overrides_name(host_name: &str) -> String {
    format!("{}{}", host_name, CLASS_OVERRIDE_SUFFIX)
}

/// Opening of a trampoline subtype, inheriting the base constructors.
pub fn class_virtual_override_header(host_name: &str, class_name: &str) -> String {
    format!(
        "class {overrides} : public {host}{{\n    public:\n    using {host}::{base};\n",
        overrides = overrides_name(host_name),
        host = host_name,
        base = class_name,
    )
}

/// Opening of a class registration function.
pub fn class_definition(host_name: &str, overrides: &str, ptr_support: &str, bases: &str) -> String {
    format!(
        "void register_{host}_class(py::module &m){{\n\
         py::class_<{host} {overrides} {ptr_support} {bases} >(m, \"{host}\")\n",
        host = host_name,
        overrides = overrides,
        ptr_support = ptr_support,
        bases = bases,
    )
}

/// Closing of a class registration function.
pub const CLASS_DEFINITION_FOOTER: &str = "    ;\n}\n";

/// Make a native type spelling usable as an identifier.
///
/// `::Bar<2> *` becomes `_Bar_lt_2_gt_Ptr`.
pub fn tidy_name(name: &str) -> String {
    name.replace(", ", "_")
        .replace('<', "_lt_")
        .replace('>', "_gt_")
        .replace("::", "_")
        .replace('*', "Ptr")
        .replace('&', "Ref")
        .replace('-', "neg")
        .replace(' ', "")
}
