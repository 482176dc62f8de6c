//! The list-patches operation.

use std::path::Path;

use tracing::info;

use patchdrift_core::error::PatchdriftError;
use patchdrift_core::types::{PatchDeclaration, TreeKind};

use crate::extract::extract_all;
use crate::tree::SourceTree;

/// Extract every patch declared under `mod_root`.
pub fn list_patches(mod_root: &Path) -> Result<Vec<PatchDeclaration>, PatchdriftError> {
    let add_on = SourceTree::load(TreeKind::AddOn, mod_root)?;
    let patches = extract_all(add_on.files());
    info!(patches = patches.len(), "extracted patch declarations");
    Ok(patches)
}
