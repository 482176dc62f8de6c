//! C# file collection.
//!
//! Walks a tree root and returns `(relative_path, content)` tuples sorted by
//! path. Relative paths always use `/` separators.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use walkdir::WalkDir;

use patchdrift_core::error::PatchdriftError;

/// Directory names skipped in addition to hidden ones (build output).
const EXCLUDED_DIRS: &[&str] = &["bin", "obj"];

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

impl From<FileError> for PatchdriftError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => PatchdriftError::FileNotFound { path },
            FileError::Io { path, source } => PatchdriftError::Io {
                path,
                message: source.to_string(),
            },
        }
    }
}

// ============================================================================
// File Collection
// ============================================================================

/// Collect `.cs` files under `root`, skipping hidden directories and build
/// output (`bin`, `obj`).
pub fn collect_csharp_files(root: &Path) -> FileResult<Vec<(String, String)>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| root.display().to_string());
            FileError::Io {
                path,
                source: e.into(),
            }
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "cs") {
            continue;
        }

        let Ok(rel_path) = path.strip_prefix(root) else {
            continue;
        };
        let rel_path = rel_path.to_string_lossy().replace('\\', "/");
        let content = read_source(path)?;
        files.push((rel_path, content));
    }

    files.sort_by(|(path_a, _), (path_b, _)| path_a.cmp(path_b));

    Ok(files)
}

fn is_excluded(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name.as_ref())
}

/// Read a source file. Invalid UTF-8 is replaced rather than rejected and a
/// leading byte-order mark is dropped.
fn read_source(path: &Path) -> FileResult<String> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            FileError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
}
