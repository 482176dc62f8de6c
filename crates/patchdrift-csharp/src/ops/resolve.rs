//! The resolve operation: look a type name up in both base trees.

use std::path::Path;

use patchdrift_core::error::PatchdriftError;
use patchdrift_core::output::TreeResolution;
use patchdrift_core::types::TreeKind;

use crate::tree::SourceTree;

/// Resolve `name` against the old and new trees, in that order.
pub fn resolve_in_trees(
    name: &str,
    old_root: &Path,
    new_root: &Path,
) -> Result<Vec<TreeResolution>, PatchdriftError> {
    let mut results = Vec::with_capacity(2);
    for (kind, root) in [(TreeKind::Old, old_root), (TreeKind::New, new_root)] {
        let tree = SourceTree::load(kind, root)?;
        results.push(TreeResolution::new(kind, tree.index().resolve(name)));
    }
    Ok(results)
}
