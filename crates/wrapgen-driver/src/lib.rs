//! Orchestration of a wrapgen run.
//!
//! [`WrapperGenerator`] drives the stages in order and writes the wrappers
//! to disk. Tests and embedders can supply declarations directly through
//! [`WrapperGenerator::generate_with`] instead of running the parser.

mod discover;
mod generator;

pub use discover::discover_headers;
pub use generator::{GenerationSummary, WrapperGenerator, DEFAULT_PACKAGE_INFO_FILE};
