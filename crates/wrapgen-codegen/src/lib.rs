//! pybind11 wrapper generation.
//!
//! Every writer renders into memory and returns [`WrapperFile`]s; nothing
//! touches the disk until [`write_all`] is called.

mod buffer;
mod calldef;
mod class_writer;
mod constructor;
mod custom;
mod function;
mod header_collection;
mod method;
mod module_writer;
mod output;
pub mod templates;

pub use buffer::CodeBuffer;
pub use calldef::{keyword_args, TemplateBinding, TypeExcludes};
pub use class_writer::{ClassInstance, ClassWriter};
pub use constructor::{constructor_wrapper, exclude_constructor};
pub use custom::{CustomGenerator, GeneratorRegistry};
pub use function::{free_function_wrapper, variable_wrapper};
pub use header_collection::{collection_includes, header_collection, header_collection_source};
pub use method::{exclude_method, method_wrapper, override_wrapper};
pub use module_writer::ModuleWriter;
pub use output::{module_dir, write_all, WrapperFile};

use std::path::Path;
use wrapgen_common::Result;
use wrapgen_decl::DeclarationQuery;
use wrapgen_info::PackageInfo;

/// Render the wrappers of every non-excluded module.
///
/// The header collection is not included; it is written earlier, before the
/// declarations it makes visible are parsed.
pub fn generate_wrappers(
    package: &PackageInfo,
    query: &dyn DeclarationQuery,
    registry: &GeneratorRegistry,
    wrapper_root: &Path,
) -> Result<Vec<WrapperFile>> {
    let mut files = Vec::new();
    for module in &package.modules {
        if module.feature.excluded.unwrap_or(false) {
            tracing::info!("Skipping module {}", module.name);
            continue;
        }
        files.extend(ModuleWriter::new(package, module, query, registry, wrapper_root).write()?);
    }
    Ok(files)
}
