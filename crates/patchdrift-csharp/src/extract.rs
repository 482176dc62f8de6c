//! Patch extraction from the add-on tree.
//!
//! Two declaration shapes are recognised:
//!
//! - **Type-level**: the type's `HarmonyPatch` markers carry at least two
//!   positional arguments between them. Every method of the type with any
//!   `Harmony*` marker becomes a patch of that target, unless the method's
//!   own `HarmonyPatch` arguments form a complete pair, which then wins.
//! - **Member-level**: a method carries `HarmonyPatch` and a second, distinct
//!   `Harmony*` marker (the role, e.g. `HarmonyPrefix`). Its own arguments
//!   form the pair when there are at least two; otherwise the type's patch
//!   arguments followed by its own are used.
//!
//! Declarations are returned in file order, then source order.

use tracing::debug;

use patchdrift_core::types::PatchDeclaration;

use crate::declarations::{methods_of, type_declarations, MethodDecl, TypeDecl};
use crate::marker::{patch_args, MarkerArgument};
use crate::parser::ParsedFile;

/// Extract every patch declared in `file`.
pub fn extract_patches(file: &ParsedFile) -> Vec<PatchDeclaration> {
    let mut patches = Vec::new();
    for ty in type_declarations(file) {
        extract_from_type(file, &ty, &mut patches);
    }
    patches
}

/// Extract from all files, in the order given.
pub fn extract_all(files: &[ParsedFile]) -> Vec<PatchDeclaration> {
    files.iter().flat_map(extract_patches).collect()
}

fn extract_from_type(file: &ParsedFile, ty: &TypeDecl<'_>, out: &mut Vec<PatchDeclaration>) {
    let type_args = patch_args(&ty.markers);
    let type_level = type_args.len() >= 2;

    for method in methods_of(file, ty) {
        if !method.markers.iter().any(|m| m.is_patch_related()) {
            continue;
        }
        let own_args = patch_args(&method.markers);

        if !type_level {
            let has_patch = method.markers.iter().any(|m| m.is_patch());
            let has_role = method.markers.iter().any(|m| m.is_role());
            if !(has_patch && has_role) {
                debug!(
                    file = %file.path(),
                    member = %method.name,
                    "patch marker without role marker; skipping"
                );
                continue;
            }
        }

        // A complete pair on the member always wins.
        let pair = if own_args.len() >= 2 {
            first_pair(&own_args)
        } else if type_level {
            first_pair(&type_args)
        } else {
            let combined: Vec<MarkerArgument> =
                type_args.iter().chain(own_args.iter()).cloned().collect();
            first_pair(&combined)
        };

        let Some((target_class, target_member)) = pair else {
            debug!(
                file = %file.path(),
                member = %method.name,
                "patch marker without a target pair; skipping"
            );
            continue;
        };

        out.push(declaration(file, ty, &method, target_class, target_member));
    }
}

/// `(target_class, target_member)` from the first two arguments.
fn first_pair(args: &[MarkerArgument]) -> Option<(String, String)> {
    match args {
        [class, member, ..] => Some((class.target_class(), member.target_member())),
        _ => None,
    }
}

fn declaration(
    file: &ParsedFile,
    ty: &TypeDecl<'_>,
    method: &MethodDecl<'_>,
    target_class: String,
    target_member: String,
) -> PatchDeclaration {
    PatchDeclaration {
        declaring_file: file.path().to_string(),
        declaring_type: ty.fq_name.clone(),
        declaring_member: method.name.clone(),
        declaring_line: file.line_of(method.node),
        target_class,
        target_member,
        source: file.text_from_line_start(method.node).to_string(),
    }
}
