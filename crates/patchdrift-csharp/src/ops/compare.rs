//! The compare operation.
//!
//! 1. Load the add-on tree and extract patch declarations
//! 2. Load and index the old and new base trees
//! 3. Per patch: resolve the target class in both trees, locate the target
//!    method in both, and check structural equivalence
//! 4. For every drifted method, build the aligned two-pane diff
//!
//! A patch that fails to resolve or locate is recorded as skipped and the
//! run continues. Only unreadable or missing inputs abort.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use patchdrift_core::align::align;
use patchdrift_core::config::AnalysisConfig;
use patchdrift_core::equivalence::{bodies_equivalent, first_divergence};
use patchdrift_core::error::PatchdriftError;
use patchdrift_core::report::{MethodPair, Report, SkipReason};
use patchdrift_core::types::{PatchDeclaration, TreeKind};

use crate::extract::extract_all;
use crate::locate::{locate_method, LocatedMethod};
use crate::tree::SourceTree;

/// Inputs of a compare run.
#[derive(Debug, Clone)]
pub struct CompareInput {
    /// Root of the add-on tree declaring the patches.
    pub mod_root: PathBuf,
    /// Root of the base tree before the update.
    pub old_root: PathBuf,
    /// Root of the base tree after the update.
    pub new_root: PathBuf,
    pub config: AnalysisConfig,
}

/// What checking one patch found.
#[derive(Debug)]
enum PatchOutcome {
    Unchanged,
    Drifted {
        old: Box<LocatedMethod>,
        new: Box<LocatedMethod>,
    },
}

/// Run the full comparison.
pub fn compare(input: &CompareInput) -> Result<Report, PatchdriftError> {
    input.config.validate()?;

    let add_on = SourceTree::load(TreeKind::AddOn, &input.mod_root)?;
    let patches = extract_all(add_on.files());
    info!(patches = patches.len(), "extracted patch declarations");

    let old = SourceTree::load(TreeKind::Old, &input.old_root)?;
    let new = SourceTree::load(TreeKind::New, &input.new_root)?;

    Ok(compare_trees(patches, &old, &new, &input.config))
}

/// Check `patches` against two loaded base trees.
pub fn compare_trees(
    patches: Vec<PatchDeclaration>,
    old: &SourceTree,
    new: &SourceTree,
    config: &AnalysisConfig,
) -> Report {
    let mut report = Report::new(patches.len());

    for patch in patches {
        match check_patch(&patch, old, new) {
            Ok(PatchOutcome::Unchanged) => {
                debug!(patch = %patch, "target unchanged");
                report.record_unchanged();
            }
            Ok(PatchOutcome::Drifted { old, new }) => {
                let (old, new) = (*old, *new);
                let diff = align(&old.source, &new.source, config);
                let methods = MethodPair {
                    old_file: old.file,
                    new_file: new.file,
                    old_source: old.source,
                    new_source: new.source,
                };
                let item = report.push_item(patch, methods, diff);
                debug!(id = %item.id, label = %item.label, "target drifted");
            }
            Err(reason) => {
                warn!(patch = %patch, reason = %reason, "skipping patch");
                report.record_skip(patch, reason);
            }
        }
    }

    info!(
        patches = report.patches_found,
        changed = report.changed_count(),
        unchanged = report.unchanged,
        skipped = report.skipped_count(),
        "comparison finished"
    );
    report
}

fn check_patch(
    patch: &PatchDeclaration,
    old: &SourceTree,
    new: &SourceTree,
) -> Result<PatchOutcome, SkipReason> {
    let old_type = old.index().resolve(&patch.target_class)?;
    let new_type = new.index().resolve(&patch.target_class)?;
    if old_type.fq_name != new_type.fq_name {
        debug!(
            patch = %patch,
            old = %old_type.fq_name,
            new = %new_type.fq_name,
            "target type moved between versions"
        );
    }

    let old_method = locate_method(old, &old_type.fq_name, &patch.target_member)?;
    let new_method = locate_method(new, &new_type.fq_name, &patch.target_member)?;

    if bodies_equivalent(old_method.body.as_ref(), new_method.body.as_ref()) {
        return Ok(PatchOutcome::Unchanged);
    }
    if let Some(divergence) = first_divergence(old_method.body.as_ref(), new_method.body.as_ref())
    {
        debug!(patch = %patch, at = %divergence, "bodies differ");
    }
    Ok(PatchOutcome::Drifted {
        old: Box::new(old_method),
        new: Box::new(new_method),
    })
}
