//! Lowering of tree-sitter nodes into [`SyntaxShape`].
//!
//! Leaves become tokens carrying their exact text; interior nodes keep their
//! kind and children. Comments are dropped, and whitespace never appears in
//! the tree, so the resulting shape is trivia-free.

use tree_sitter::Node;

use patchdrift_core::equivalence::SyntaxShape;

use crate::parser::ParsedFile;

const COMMENT_KIND: &str = "comment";

/// Lower `node` and everything below it.
pub fn syntax_shape(file: &ParsedFile, node: Node<'_>) -> SyntaxShape {
    if node.child_count() == 0 {
        return SyntaxShape::token(node.kind(), file.text(node));
    }

    let mut children = Vec::with_capacity(node.child_count());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == COMMENT_KIND {
            continue;
        }
        children.push(syntax_shape(file, child));
    }
    SyntaxShape::node(node.kind(), children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::{methods_of, type_declarations};
    use crate::parser::parse_source;
    use patchdrift_core::equivalence::bodies_equivalent;

    fn body_shape(source: &str) -> Option<SyntaxShape> {
        let file = parse_source("T.cs", source).unwrap();
        let types = type_declarations(&file);
        let methods = methods_of(&file, &types[0]);
        methods[0].body().map(|body| syntax_shape(&file, body))
    }

    #[test]
    fn whitespace_and_comments_do_not_matter() {
        let a = body_shape("class A { void M() { int x = 1; Foo(x); } }");
        let b = body_shape(
            "class A {\n  void M()\n  {\n    // set up\n    int x   =   1;\n    /* go */ Foo( x );\n  }\n}",
        );
        assert!(bodies_equivalent(a.as_ref(), b.as_ref()));
    }

    #[test]
    fn renaming_a_local_matters() {
        let a = body_shape("class A { void M() { int x = 1; Foo(x); } }");
        let b = body_shape("class A { void M() { int y = 1; Foo(y); } }");
        assert!(!bodies_equivalent(a.as_ref(), b.as_ref()));
    }

    #[test]
    fn literal_change_matters() {
        let a = body_shape("class A { void M() { int value = 42; } }");
        let b = body_shape("class A { void M() { int value = 100; } }");
        assert!(!bodies_equivalent(a.as_ref(), b.as_ref()));
    }

    #[test]
    fn empty_block_matches_missing_body() {
        let empty = body_shape("class A { void M() { } }");
        let missing = body_shape("abstract class A { abstract void M(); }");
        assert!(missing.is_none());
        assert!(bodies_equivalent(empty.as_ref(), missing.as_ref()));
    }

    #[test]
    fn block_shape_has_braces() {
        let shape = body_shape("class A { void M() { } }").unwrap();
        assert_eq!(shape, SyntaxShape::empty_block());
    }
}
