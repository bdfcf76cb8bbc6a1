//! Error types shared across the wrapgen pipeline.
//!
//! Every variant is fatal: the run aborts on the first one raised. Advisory
//! findings are logged instead of being represented here.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for wrapgen operations.
pub type Result<T> = std::result::Result<T, WrapError>;

/// Errors that can abort a generator run.
#[derive(Error, Diagnostic, Debug)]
pub enum WrapError {
    /// Malformed or inconsistent configuration.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(wrapgen::config),
        help("check the package info file against the documented keys")
    )]
    Config(String),

    /// Failed to parse the TOML configuration document.
    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(code(wrapgen::config::toml))]
    Toml(#[from] toml::de::Error),

    /// No source headers matched the configured patterns.
    #[error("No header files found in source root: {}", root.display())]
    #[diagnostic(
        code(wrapgen::discovery),
        help("adjust `source_hpp_patterns` or point the source root at the headers")
    )]
    Discovery { root: PathBuf },

    /// A requested declaration is absent from the parsed declaration graph.
    #[error("Could not find declaration for {kind} `{name}`")]
    #[diagnostic(
        code(wrapgen::declaration_not_found),
        help("make sure the header declaring it is reachable from the header collection")
    )]
    DeclarationNotFound { kind: &'static str, name: String },

    /// The external parser binary is missing, unusable, or failed.
    #[error("External parser error: {0}")]
    #[diagnostic(code(wrapgen::external_tool))]
    ExternalTool(String),

    /// Failed to decode the declaration graph emitted by the parser.
    #[error("Failed to parse declaration graph: {0}")]
    #[diagnostic(code(wrapgen::declarations::json))]
    Json(#[from] serde_json::Error),

    /// Filesystem failure while reading inputs or writing wrappers.
    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(code(wrapgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WrapError {
    /// Build a [`WrapError::Io`] that remembers the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WrapError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`WrapError::DeclarationNotFound`] for a class.
    pub fn class_not_found(name: impl Into<String>) -> Self {
        WrapError::DeclarationNotFound {
            kind: "class",
            name: name.into(),
        }
    }
}
