//! Report model: one item per drifted method, plus per-patch diagnostics.
//!
//! A [`Report`] is append-only while a run is in progress. Items keep the
//! order in which patches were discovered; ids count items from 1
//! (`patch-1`, `patch-2`, ...), so skipped and unchanged patches do not leave
//! gaps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::align::AlignedDiff;
use crate::resolve::ResolveError;
use crate::types::{PatchDeclaration, TreeKind};

// ============================================================================
// Skipped Patches
// ============================================================================

/// Why a patch produced no report item.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The target class matched nothing.
    #[error("target type '{name}' not found in {tree} tree")]
    TargetNotFound { tree: TreeKind, name: String },

    /// The target class matched several types.
    #[error("target type '{name}' is ambiguous in {tree} tree: {}", .candidates.join(", "))]
    TargetAmbiguous {
        tree: TreeKind,
        name: String,
        candidates: Vec<String>,
    },

    /// The class resolved but declares no method with the target name.
    #[error("method '{member}' not found on '{type_name}' in {tree} tree")]
    MethodNotFound {
        tree: TreeKind,
        type_name: String,
        member: String,
    },

    /// The file declaring the target could not be parsed.
    #[error("failed to parse {file} in {tree} tree: {message}")]
    ParseFailed {
        tree: TreeKind,
        file: String,
        message: String,
    },
}

impl From<ResolveError> for SkipReason {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { name, tree } => SkipReason::TargetNotFound { tree, name },
            ResolveError::Ambiguous {
                name,
                tree,
                candidates,
            } => SkipReason::TargetAmbiguous {
                tree,
                name,
                candidates,
            },
        }
    }
}

/// A patch that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPatch {
    pub patch: PatchDeclaration,
    #[serde(flatten)]
    pub reason: SkipReason,
    /// Human-readable form of `reason`.
    pub message: String,
}

impl SkippedPatch {
    pub fn new(patch: PatchDeclaration, reason: SkipReason) -> Self {
        let message = reason.to_string();
        SkippedPatch {
            patch,
            reason,
            message,
        }
    }
}

// ============================================================================
// Report Items
// ============================================================================

/// The located target method in both base trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPair {
    /// Tree-relative file declaring the method in the old tree.
    pub old_file: String,
    /// Tree-relative file declaring the method in the new tree.
    pub new_file: String,
    pub old_source: String,
    pub new_source: String,
}

/// One drifted method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    /// `patch-{n}`, counting items from 1.
    pub id: String,
    /// `{declaring_file}:{declaring_member} -> {target_file}:{target_member}`.
    pub label: String,
    pub patch: PatchDeclaration,
    pub old_file: String,
    pub new_file: String,
    pub diff: AlignedDiff,
    pub old_source: String,
    pub new_source: String,
    pub patch_source: String,
}

/// Label shown for an item; the target side names the new tree's file.
pub fn item_label(patch: &PatchDeclaration, target_file: &str) -> String {
    format!(
        "{}:{} -> {}:{}",
        patch.declaring_file, patch.declaring_member, target_file, patch.target_member
    )
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Number of patch declarations extracted from the add-on tree.
    pub patches_found: usize,
    /// Drifted methods, in discovery order.
    pub items: Vec<ReportItem>,
    /// Patches that could not be checked.
    pub skipped: Vec<SkippedPatch>,
    /// Patches whose target method is structurally unchanged.
    pub unchanged: usize,
}

impl Report {
    pub fn new(patches_found: usize) -> Self {
        Report {
            patches_found,
            ..Report::default()
        }
    }

    /// Append an item for a drifted method and return it.
    pub fn push_item(
        &mut self,
        patch: PatchDeclaration,
        methods: MethodPair,
        diff: AlignedDiff,
    ) -> &ReportItem {
        let id = format!("patch-{}", self.items.len() + 1);
        let label = item_label(&patch, &methods.new_file);
        let patch_source = patch.source.clone();
        self.items.push(ReportItem {
            id,
            label,
            patch,
            old_file: methods.old_file,
            new_file: methods.new_file,
            diff,
            old_source: methods.old_source,
            new_source: methods.new_source,
            patch_source,
        });
        // Just pushed, so the vector is non-empty.
        &self.items[self.items.len() - 1]
    }

    pub fn record_skip(&mut self, patch: PatchDeclaration, reason: SkipReason) {
        self.skipped.push(SkippedPatch::new(patch, reason));
    }

    pub fn record_unchanged(&mut self) {
        self.unchanged += 1;
    }

    /// Number of report items.
    pub fn changed_count(&self) -> usize {
        self.items.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
