//! CLI front door.
//!
//! Command helpers behind the `patchdrift` binary:
//! - `compare` - check every patch of an add-on tree against two base trees
//! - `list-patches` - list the patch declarations of an add-on tree
//! - `resolve` - resolve one class name in both base trees
//!
//! Each helper returns the rendered output; `main.rs` decides where it goes.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, PatchdriftError>`, whose error codes
//! become the process exit code.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use patchdrift_core::error::PatchdriftError;
use patchdrift_core::output::{emit_response, ListPatchesResponse, ResolveResponse};
use patchdrift_csharp::ops::list::list_patches;
use patchdrift_csharp::ops::resolve::resolve_in_trees;
use patchdrift_csharp::{compare, CompareInput};

use crate::render::{render_report, OutputFormat};

/// Serialize a response envelope as pretty JSON with a trailing newline.
pub fn to_json<T: Serialize>(response: &T) -> Result<String, PatchdriftError> {
    let mut buf = Vec::new();
    emit_response(response, &mut buf)
        .map_err(|e| PatchdriftError::internal(format!("failed to serialize response: {}", e)))?;
    String::from_utf8(buf)
        .map_err(|e| PatchdriftError::internal(format!("response is not UTF-8: {}", e)))
}

/// Run a comparison and render the report.
pub fn run_compare(input: &CompareInput, format: OutputFormat) -> Result<String, PatchdriftError> {
    let report = compare(input)?;
    render_report(&report, format)
}

/// List the patch declarations of an add-on tree as JSON.
pub fn run_list_patches(mod_root: &Path) -> Result<String, PatchdriftError> {
    let patches = list_patches(mod_root)?;
    to_json(&ListPatchesResponse::new(patches))
}

/// Resolve `name` in the old and new trees as JSON.
pub fn run_resolve(name: &str, old_root: &Path, new_root: &Path) -> Result<String, PatchdriftError> {
    let results = resolve_in_trees(name, old_root, new_root)?;
    to_json(&ResolveResponse::new(name, results))
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<(), PatchdriftError> {
    match output {
        Some(path) => {
            fs::write(path, content).map_err(|e| PatchdriftError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            info!(path = %path.display(), bytes = content.len(), "wrote report");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| PatchdriftError::Io {
                    path: "<stdout>".to_string(),
                    message: e.to_string(),
                })
        }
    }
}
