//! Structural equivalence of method bodies.
//!
//! Language crates lower their parse trees into [`SyntaxShape`], an owned tree
//! of node kinds and token texts with trivia (whitespace, comments) already
//! removed. Two bodies are equivalent when their shapes are identical: nesting,
//! ordering and identifier spelling all count, formatting does not.
//!
//! A missing body (abstract or extern declaration) compares as an empty
//! block.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind name of block nodes, shared with the language crates.
pub const BLOCK_KIND: &str = "block";

/// Trivia-free structure of a syntax subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SyntaxShape {
    /// Interior node.
    Node {
        kind: String,
        children: Vec<SyntaxShape>,
    },
    /// Leaf token and its exact text.
    Token { kind: String, text: String },
}

impl SyntaxShape {
    /// Create an interior node.
    pub fn node(kind: impl Into<String>, children: Vec<SyntaxShape>) -> Self {
        SyntaxShape::Node {
            kind: kind.into(),
            children,
        }
    }

    /// Create a leaf token.
    pub fn token(kind: impl Into<String>, text: impl Into<String>) -> Self {
        SyntaxShape::Token {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// The shape of `{ }`.
    pub fn empty_block() -> Self {
        SyntaxShape::node(
            BLOCK_KIND,
            vec![SyntaxShape::token("{", "{"), SyntaxShape::token("}", "}")],
        )
    }

    fn summary(&self) -> String {
        match self {
            SyntaxShape::Token { text, .. } => format!("`{text}`"),
            SyntaxShape::Node { kind, children } => format!("{kind} ({} children)", children.len()),
        }
    }
}

/// The first point where two shapes differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Node kinds from the root down to the differing position.
    pub path: Vec<String>,
    /// What the old side has there.
    pub old: String,
    /// What the new side has there.
    pub new: String,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} vs {}", self.path.join("/"), self.old, self.new)
    }
}

/// Whether two bodies are structurally identical.
///
/// Pure and deterministic; `None` stands for a missing body.
pub fn bodies_equivalent(old: Option<&SyntaxShape>, new: Option<&SyntaxShape>) -> bool {
    first_divergence(old, new).is_none()
}

/// Locate the first structural difference, in pre-order.
pub fn first_divergence(
    old: Option<&SyntaxShape>,
    new: Option<&SyntaxShape>,
) -> Option<Divergence> {
    let empty = SyntaxShape::empty_block();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);
    let mut path = Vec::new();
    diverge(old, new, &mut path)
}

fn diverge(old: &SyntaxShape, new: &SyntaxShape, path: &mut Vec<String>) -> Option<Divergence> {
    let mismatch = |path: &[String]| Divergence {
        path: path.to_vec(),
        old: old.summary(),
        new: new.summary(),
    };

    match (old, new) {
        (
            SyntaxShape::Token {
                kind: old_kind,
                text: old_text,
            },
            SyntaxShape::Token {
                kind: new_kind,
                text: new_text,
            },
        ) => (old_kind != new_kind || old_text != new_text).then(|| mismatch(path.as_slice())),
        (
            SyntaxShape::Node {
                kind: old_kind,
                children: old_children,
            },
            SyntaxShape::Node {
                kind: new_kind,
                children: new_children,
            },
        ) => {
            if old_kind != new_kind {
                return Some(mismatch(path));
            }
            path.push(old_kind.clone());
            for (o, n) in old_children.iter().zip(new_children) {
                if let Some(found) = diverge(o, n, path) {
                    return Some(found);
                }
            }
            let found = (old_children.len() != new_children.len()).then(|| mismatch(path.as_slice()));
            path.pop();
            found
        }
        _ => Some(mismatch(path)),
    }
}
