//! Wrapper around the external parser front-end.
//!
//! The tool reads the header collection and writes the JSON declaration
//! graph consumed by [`DeclIndex`].

use crate::index::DeclIndex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use wrapgen_common::{Result, WrapError};

/// Binary searched for on `PATH` when no explicit tool is configured.
pub const DEFAULT_PARSER_TOOL: &str = "wrapgen-parser";

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+) version (\d+)\.(\d+)\.(\d+)").expect("valid regex"));

/// Configuration for the parser tool.
#[derive(Debug, Clone, Default)]
pub struct ParserToolConfig {
    /// Path to the tool (defaults to searching `PATH`)
    pub tool: Option<PathBuf>,
    /// Include directories (-I flags)
    pub include_dirs: Vec<PathBuf>,
    /// Extra compiler flags, e.g. `-std=c++17`
    pub cflags: Vec<String>,
}

impl ParserToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit tool binary.
    pub fn tool(mut self, path: impl AsRef<Path>) -> Self {
        self.tool = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add an include directory.
    pub fn include_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.include_dirs.push(path.as_ref().to_path_buf());
        self
    }

    /// Add a compiler flag.
    pub fn cflag(mut self, flag: impl Into<String>) -> Self {
        self.cflags.push(flag.into());
        self
    }
}

/// Version reported by `<tool> --version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub name: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ToolVersion {
    /// Extract the version from `--version` output.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(output)?;
        Some(Self {
            name: caps[1].to_string(),
            major: caps[2].parse().ok()?,
            minor: caps[3].parse().ok()?,
            patch: caps[4].parse().ok()?,
        })
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} version {}.{}.{}",
            self.name, self.major, self.minor, self.patch
        )
    }
}

/// The resolved parser tool.
pub struct ParserTool {
    config: ParserToolConfig,
    tool_path: PathBuf,
}

impl ParserTool {
    /// Resolve the tool binary.
    ///
    /// An explicit path that is missing or not executable falls back to a
    /// `PATH` search.
    pub fn new(config: ParserToolConfig) -> Result<Self> {
        let explicit = config.tool.as_ref().and_then(|path| match which::which(path) {
            Ok(found) => Some(found),
            Err(_) => {
                tracing::warn!(
                    "Could not find parser tool {}; searching on PATH",
                    path.display()
                );
                None
            }
        });

        let tool_path = match explicit {
            Some(path) => path,
            None => find_tool()?,
        };
        tracing::info!("Using parser tool {}", tool_path.display());

        Ok(Self { config, tool_path })
    }

    /// Get the path to the tool being used.
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Run `--version` and check that the output is recognizable.
    pub fn version(&self) -> Result<ToolVersion> {
        let output = Command::new(&self.tool_path)
            .arg("--version")
            .output()
            .map_err(|e| {
                WrapError::ExternalTool(format!(
                    "failed to execute {}: {}",
                    self.tool_path.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = ToolVersion::parse(&stdout).ok_or_else(|| {
            WrapError::ExternalTool(format!(
                "unrecognized version output from {}: {}",
                self.tool_path.display(),
                stdout.trim()
            ))
        })?;
        tracing::info!("{}", version);
        Ok(version)
    }

    /// Command line for parsing `header` into `output`.
    pub fn command(&self, header: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.tool_path);
        cmd.args(&self.config.cflags);
        for dir in &self.config.include_dirs {
            cmd.arg(format!("-I{}", dir.display()));
        }
        cmd.arg("-o");
        cmd.arg(output);
        cmd.arg(header);
        cmd
    }

    /// Parse the header collection and load the resulting declaration graph.
    pub fn parse(&self, header: &Path, output_dir: &Path) -> Result<DeclIndex> {
        if !header.exists() {
            return Err(WrapError::ExternalTool(format!(
                "header collection not found: {}",
                header.display()
            )));
        }

        let output_path = output_dir.join("declarations.json");
        let mut cmd = self.command(header, &output_path);
        tracing::debug!(
            "Running {:?} {:?}",
            cmd.get_program(),
            cmd.get_args().collect::<Vec<_>>()
        );

        let output = cmd.output().map_err(|e| {
            WrapError::ExternalTool(format!(
                "failed to execute {}: {}",
                self.tool_path.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(WrapError::ExternalTool(format!(
                "parsing {} failed:\n{}\n{}",
                header.display(),
                stdout,
                stderr
            )));
        }

        if !output_path.exists() {
            return Err(WrapError::ExternalTool(format!(
                "declaration graph not created: {}",
                output_path.display()
            )));
        }

        DeclIndex::from_file(&output_path)
    }
}

/// Find the parser tool on the system.
fn find_tool() -> Result<PathBuf> {
    which::which(DEFAULT_PARSER_TOOL).map_err(|_| {
        WrapError::ExternalTool(format!(
            "could not find `{}` on PATH; pass an explicit tool path",
            DEFAULT_PARSER_TOOL
        ))
    })
}
