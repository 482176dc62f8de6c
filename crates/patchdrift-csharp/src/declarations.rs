//! Type and method declarations of a parsed file.
//!
//! Types are listed in pre-order (an enclosing type before its nested types)
//! with fully-qualified names built from namespace ancestry and enclosing
//! types, joined with `.`. Block-scoped, nested and file-scoped namespaces
//! are all understood.

use tree_sitter::Node;

use crate::marker::{markers_of, Marker};
use crate::parser::ParsedFile;

/// Node kinds that declare a type.
const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "record_declaration",
    "record_struct_declaration",
    "enum_declaration",
];

/// A declared type.
#[derive(Debug, Clone)]
pub struct TypeDecl<'t> {
    /// Fully-qualified name, e.g. `Verse.Pawn.Inner`.
    pub fq_name: String,
    /// Simple name.
    pub name: String,
    pub node: Node<'t>,
    pub markers: Vec<Marker>,
}

/// A method declared directly inside a type.
#[derive(Debug, Clone)]
pub struct MethodDecl<'t> {
    pub name: String,
    pub node: Node<'t>,
    pub markers: Vec<Marker>,
}

impl<'t> MethodDecl<'t> {
    /// The body: a block, an expression-bodied arrow clause, or none for
    /// abstract and extern declarations.
    pub fn body(&self) -> Option<Node<'t>> {
        if let Some(body) = self.node.child_by_field_name("body") {
            return Some(body);
        }
        let mut cursor = self.node.walk();
        for child in self.node.named_children(&mut cursor) {
            if matches!(child.kind(), "block" | "arrow_expression_clause") {
                return Some(child);
            }
        }
        None
    }
}

/// Every type declared in `file`, in pre-order.
pub fn type_declarations(file: &ParsedFile) -> Vec<TypeDecl<'_>> {
    let mut types = Vec::new();
    collect_types(file, file.root(), "", &mut types);
    types
}

fn collect_types<'t>(
    file: &'t ParsedFile,
    container: Node<'t>,
    prefix: &str,
    out: &mut Vec<TypeDecl<'t>>,
) {
    // A file-scoped namespace applies to every declaration after it.
    let mut scope = prefix.to_string();

    let mut cursor = container.walk();
    for child in container.named_children(&mut cursor) {
        match child.kind() {
            "namespace_declaration" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let qualified = qualify(&scope, &compact(file.text(name)));
                if let Some(body) = child.child_by_field_name("body") {
                    collect_types(file, body, &qualified, out);
                }
            }
            "file_scoped_namespace_declaration" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                scope = qualify(prefix, &compact(file.text(name)));
                // Older grammars nest the following declarations inside.
                collect_types(file, child, &scope, out);
            }
            kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let name = file.text(name).to_string();
                let fq_name = qualify(&scope, &name);
                out.push(TypeDecl {
                    fq_name: fq_name.clone(),
                    name,
                    node: child,
                    markers: markers_of(file, child),
                });
                if let Some(body) = child.child_by_field_name("body") {
                    collect_types(file, body, &fq_name, out);
                }
            }
            "declaration_list" => collect_types(file, child, &scope, out),
            _ => {}
        }
    }
}

/// Methods declared directly in `ty`'s body, in source order.
pub fn methods_of<'t>(file: &'t ParsedFile, ty: &TypeDecl<'t>) -> Vec<MethodDecl<'t>> {
    let Some(body) = ty.node.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        if child.kind() != "method_declaration" {
            continue;
        }
        let Some(name) = child.child_by_field_name("name") else {
            continue;
        };
        methods.push(MethodDecl {
            name: file.text(name).to_string(),
            node: child,
            markers: markers_of(file, child),
        });
    }
    methods
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}
