//! JSON output types for CLI responses.
//!
//! Every response carries `status` first and a `schema_version`, so
//! consumers can detect incompatible changes. Output is deterministic: items
//! and skipped patches keep discovery order, candidate lists are sorted.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, PatchdriftError};
use crate::report::{Report, ReportItem, SkippedPatch};
use crate::resolve::{ResolveError, Resolution};
use crate::types::{PatchDeclaration, TreeKind};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Errors
// ============================================================================

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code, equal to the process exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &PatchdriftError) -> Self {
        let details = match err {
            PatchdriftError::RootNotFound { path }
            | PatchdriftError::FileNotFound { path }
            | PatchdriftError::Io { path, .. }
            | PatchdriftError::ParseFailed { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &PatchdriftError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Compare
// ============================================================================

/// Counts for a compare run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSummary {
    pub patches_found: usize,
    /// Number of report items.
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl CompareSummary {
    pub fn from_report(report: &Report) -> Self {
        CompareSummary {
            patches_found: report.patches_found,
            changed: report.changed_count(),
            unchanged: report.unchanged,
            skipped: report.skipped_count(),
        }
    }
}

/// Response for the compare command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub summary: CompareSummary,
    pub items: Vec<ReportItem>,
    pub skipped: Vec<SkippedPatch>,
}

impl CompareResponse {
    pub fn from_report(report: &Report) -> Self {
        CompareResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            summary: CompareSummary::from_report(report),
            items: report.items.clone(),
            skipped: report.skipped.clone(),
        }
    }
}

// ============================================================================
// List Patches
// ============================================================================

/// Response for the list-patches command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPatchesResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub patches: Vec<PatchDeclaration>,
}

impl ListPatchesResponse {
    pub fn new(patches: Vec<PatchDeclaration>) -> Self {
        ListPatchesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            patches,
        }
    }
}

// ============================================================================
// Resolve
// ============================================================================

/// Resolution of one name against one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TreeResolution {
    Resolved {
        tree: TreeKind,
        fq_name: String,
        file: String,
    },
    NotFound {
        tree: TreeKind,
    },
    Ambiguous {
        tree: TreeKind,
        candidates: Vec<String>,
    },
}

impl TreeResolution {
    pub fn new(tree: TreeKind, result: Result<Resolution, ResolveError>) -> Self {
        match result {
            Ok(Resolution { fq_name, file }) => TreeResolution::Resolved {
                tree,
                fq_name,
                file,
            },
            Err(ResolveError::NotFound { .. }) => TreeResolution::NotFound { tree },
            Err(ResolveError::Ambiguous { candidates, .. }) => {
                TreeResolution::Ambiguous { tree, candidates }
            }
        }
    }
}

/// Response for the resolve command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    /// The name as given.
    pub name: String,
    pub results: Vec<TreeResolution>,
}

impl ResolveResponse {
    pub fn new(name: impl Into<String>, results: Vec<TreeResolution>) -> Self {
        ResolveResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            name: name.into(),
            results,
        }
    }
}

// ============================================================================
// Emit
// ============================================================================

/// Write a response as pretty JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
