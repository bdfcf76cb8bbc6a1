//! Header discovery under the source root.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wrapgen_common::{Result, WrapError, WRAPGEN_EXT};

/// Collect headers under `source_root` whose file name matches any of
/// `patterns`.
///
/// Symlinks are followed. Files under `wrapper_root` and previously
/// generated wrappers (`*.wrapgen.hpp`) are skipped. The result is sorted
/// by file name, then by path.
pub fn discover_headers(
    source_root: &Path,
    patterns: &[String],
    wrapper_root: &Path,
) -> Result<Vec<PathBuf>> {
    let patterns = patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| {
                WrapError::Config(format!("invalid header pattern `{}`: {}", pattern, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut headers = Vec::new();
    for entry in WalkDir::new(source_root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", source_root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.starts_with(wrapper_root) || is_generated(path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if patterns.iter().any(|pattern| pattern.matches(name)) {
            headers.push(path.to_path_buf());
        }
    }

    if headers.is_empty() {
        tracing::error!("No header files found in source root: {}", source_root.display());
        return Err(WrapError::Discovery {
            root: source_root.to_path_buf(),
        });
    }

    headers.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    tracing::debug!("Found {} headers", headers.len());
    Ok(headers)
}

/// `Foo.wrapgen.hpp` and friends.
fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .map(Path::new)
        .and_then(|stem| stem.extension())
        .is_some_and(|ext| ext == WRAPGEN_EXT)
}
