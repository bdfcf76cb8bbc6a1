//! Names and markers shared by every stage of the generator.

/// Secondary extension marking generated files, e.g. `Foo_2.wrapgen.cpp`.
pub const WRAPGEN_EXT: &str = "wrapgen";

/// File name of the aggregated header fed to the external parser.
pub const HEADER_COLLECTION_FILENAME: &str = "wrapper_header_collection.wrapgen.hpp";

/// Suffix appended to a host name to name its trampoline subtype.
pub const CLASS_OVERRIDE_SUFFIX: &str = "_Overrides";

/// Sentinel accepted in place of an explicit entity list.
pub const ALL_SENTINEL: &str = "ALL";

/// Directory name used under the source root when no output root is given.
pub const DEFAULT_WRAPPER_DIR: &str = "wrapgen_wrappers";

/// Namespace holding identifier-safe aliases in the header collection.
pub const ALIAS_NAMESPACE: &str = "wrapgen";

/// Default package name when the configuration omits one.
pub const DEFAULT_PACKAGE_NAME: &str = "wrapgen_package";
