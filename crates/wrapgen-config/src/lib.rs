//! Configuration document for the wrapgen binding generator.
//!
//! This crate provides:
//! - The package info format (`package_info.toml`)
//! - Feature attributes shared by every level of the package hierarchy
//! - Loading and validation of the document
//!
//! # Example
//!
//! ```toml
//! # package_info.toml
//! name = "pyshapes"
//! smart_ptr_type = "std::shared_ptr"
//!
//! [[template_substitutions]]
//! signature = "<unsigned DIM>"
//! replacement = [[2], [3]]
//!
//! [[modules]]
//! name = "geometry"
//! source_locations = ["geometry"]
//! classes = [{ name = "Point" }]
//!
//! [[modules]]
//! name = "math_funcs"
//! free_functions = "ALL"
//! ```

mod config;
mod feature;

pub use config::{
    AllSentinel, ClassConfig, EntityConfig, ModuleConfig, PackageConfig, Selection,
};
pub use feature::{FeatureConfig, TemplateArg, TemplateSubstitution};
