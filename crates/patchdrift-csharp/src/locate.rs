//! Locating a target method inside a resolved type.

use tracing::debug;

use patchdrift_core::equivalence::SyntaxShape;
use patchdrift_core::report::SkipReason;

use crate::declarations::{methods_of, type_declarations};
use crate::shape::syntax_shape;
use crate::tree::SourceTree;

/// A method found in one base tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedMethod {
    /// Fully-qualified name of the declaring type.
    pub fq_type: String,
    pub name: String,
    /// Tree-relative file.
    pub file: String,
    /// Trivia-free body; `None` when the method has no body.
    pub body: Option<SyntaxShape>,
    /// Method text from the start of its first line.
    pub source: String,
    /// 1-based start line.
    pub line: usize,
}

/// Find the first method named `member` declared directly in `fq_type`.
pub fn locate_method(
    tree: &SourceTree,
    fq_type: &str,
    member: &str,
) -> Result<LocatedMethod, SkipReason> {
    let not_found = || SkipReason::MethodNotFound {
        tree: tree.kind(),
        type_name: fq_type.to_string(),
        member: member.to_string(),
    };

    let path = tree.index().get(fq_type).ok_or_else(not_found)?;
    let file = tree.file(path).ok_or_else(not_found)?;

    let types = type_declarations(file);
    let ty = types
        .iter()
        .find(|t| t.fq_name == fq_type)
        .ok_or_else(not_found)?;

    let candidates: Vec<_> = methods_of(file, ty)
        .into_iter()
        .filter(|m| m.name == member)
        .collect();
    let method = candidates.first().ok_or_else(not_found)?;
    if candidates.len() > 1 {
        debug!(
            tree = %tree.kind(),
            type_name = %fq_type,
            member,
            overloads = candidates.len(),
            "method is overloaded; using the first declaration"
        );
    }

    if method.node.has_error() {
        return Err(SkipReason::ParseFailed {
            tree: tree.kind(),
            file: path.to_string(),
            message: format!("syntax errors inside method '{member}'"),
        });
    }

    Ok(LocatedMethod {
        fq_type: fq_type.to_string(),
        name: method.name.clone(),
        file: path.to_string(),
        body: method.body().map(|body| syntax_shape(file, body)),
        source: file.text_from_line_start(method.node).to_string(),
        line: file.line_of(method.node),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use patchdrift_core::types::TreeKind;

    const PAWN: &str = "namespace Verse\n{\n    public class Pawn\n    {\n        public void Kill(int how)\n        {\n            int value = 42;\n        }\n\n        public void Kill()\n        {\n        }\n\n        public abstract void Tick();\n    }\n}\n";

    fn tree() -> SourceTree {
        SourceTree::from_files(
            TreeKind::New,
            vec![parse_source("Verse/Pawn.cs", PAWN).unwrap()],
        )
    }

    #[test]
    fn finds_first_overload_with_indented_source() {
        let method = locate_method(&tree(), "Verse.Pawn", "Kill").unwrap();
        assert_eq!(method.line, 5);
        assert_eq!(method.file, "Verse/Pawn.cs");
        assert!(method.source.starts_with("        public void Kill(int how)"));
        assert!(method.source.ends_with('}'));
        assert!(method.body.is_some());
    }

    #[test]
    fn method_without_body() {
        let method = locate_method(&tree(), "Verse.Pawn", "Tick").unwrap();
        assert!(method.body.is_none());
    }

    #[test]
    fn missing_method_is_reported() {
        let err = locate_method(&tree(), "Verse.Pawn", "Spawn").unwrap_err();
        assert_eq!(
            err,
            SkipReason::MethodNotFound {
                tree: TreeKind::New,
                type_name: "Verse.Pawn".to_string(),
                member: "Spawn".to_string(),
            }
        );
    }

    #[test]
    fn unknown_type_is_method_not_found() {
        assert!(matches!(
            locate_method(&tree(), "Verse.Thing", "Kill"),
            Err(SkipReason::MethodNotFound { .. })
        ));
    }
}
