//! Domain types shared by extraction, resolution and reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Trees
// ============================================================================

/// One of the three code trees an analysis run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeKind {
    /// The add-on tree declaring the patches.
    AddOn,
    /// The base codebase before the update.
    Old,
    /// The base codebase after the update.
    New,
}

impl TreeKind {
    /// Stable lowercase name used in logs and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::AddOn => "add-on",
            TreeKind::Old => "old",
            TreeKind::New => "new",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Patch Declaration
// ============================================================================

/// A recorded intent, found in the add-on tree, to modify one method of one
/// class in the base tree.
///
/// Created once during extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDeclaration {
    /// Add-on file declaring the patch (tree-relative).
    pub declaring_file: String,
    /// Fully-qualified name of the type containing the patch member.
    pub declaring_type: String,
    /// Identifier of the patch member.
    pub declaring_member: String,
    /// 1-indexed line of the patch member.
    pub declaring_line: usize,
    /// Symbolic target class, possibly partial.
    pub target_class: String,
    /// Simple name of the target method.
    pub target_member: String,
    /// Source text of the patch member.
    #[serde(skip)]
    pub source: String,
}

impl PatchDeclaration {
    /// `file:member` of the declaring side.
    pub fn declaring_label(&self) -> String {
        format!("{}:{}", self.declaring_file, self.declaring_member)
    }

    /// `class.member` of the target side.
    pub fn target_label(&self) -> String {
        format!("{}.{}", self.target_class, self.target_member)
    }
}

impl fmt::Display for PatchDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.declaring_label(), self.target_label())
    }
}
