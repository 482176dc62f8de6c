//! Symbol index and target resolution.
//!
//! A [`SymbolIndex`] maps fully-qualified type names to the tree-relative file
//! that declares them. It is assembled once per tree through
//! [`SymbolIndexBuilder`] and is read-only afterwards; resolution never
//! mutates it.
//!
//! ## Resolution order
//!
//! 1. An exact key match wins immediately.
//! 2. Otherwise every key ending in `.` + target is a candidate.
//! 3. One candidate resolves; none is [`ResolveError::NotFound`]; more than
//!    one is [`ResolveError::Ambiguous`] carrying every candidate, sorted.
//!
//! Exact-key collisions at build time keep the last writer. They are logged
//! and kept in [`SymbolIndex::collisions`] so callers can surface them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::TreeKind;

// ============================================================================
// Errors
// ============================================================================

/// Why a target class did not resolve to a single type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No key matches the target.
    #[error("type '{name}' not found in {tree} tree")]
    NotFound { name: String, tree: TreeKind },

    /// Several suffix-qualified keys match the target.
    #[error("type '{name}' is ambiguous in {tree} tree: {}", .candidates.join(", "))]
    Ambiguous {
        name: String,
        tree: TreeKind,
        candidates: Vec<String>,
    },
}

// ============================================================================
// Index
// ============================================================================

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Fully-qualified name of the resolved type.
    pub fq_name: String,
    /// Tree-relative path of the declaring file.
    pub file: String,
}

/// An exact key that was declared more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCollision {
    pub fq_name: String,
    /// File whose entry was overwritten.
    pub replaced_file: String,
    /// File that now owns the key.
    pub kept_file: String,
}

/// Accumulates declarations for one tree.
#[derive(Debug)]
pub struct SymbolIndexBuilder {
    tree: TreeKind,
    entries: BTreeMap<String, String>,
    collisions: Vec<IndexCollision>,
}

impl SymbolIndexBuilder {
    pub fn new(tree: TreeKind) -> Self {
        SymbolIndexBuilder {
            tree,
            entries: BTreeMap::new(),
            collisions: Vec::new(),
        }
    }

    /// Record that `fq_name` is declared in `file`. Later declarations of
    /// the same name replace earlier ones.
    pub fn insert(&mut self, fq_name: impl Into<String>, file: impl Into<String>) -> &mut Self {
        let fq_name = fq_name.into();
        let file = file.into();
        if let Some(previous) = self.entries.insert(fq_name.clone(), file.clone()) {
            warn!(
                tree = %self.tree,
                type_name = %fq_name,
                replaced = %previous,
                kept = %file,
                "type declared more than once; keeping the last declaration"
            );
            self.collisions.push(IndexCollision {
                fq_name,
                replaced_file: previous,
                kept_file: file,
            });
        }
        self
    }

    /// Freeze into a read-only index.
    pub fn build(self) -> SymbolIndex {
        SymbolIndex {
            tree: self.tree,
            entries: self.entries,
            collisions: self.collisions,
        }
    }
}

/// Read-only map from fully-qualified type name to declaring file.
#[derive(Debug, Clone)]
pub struct SymbolIndex {
    tree: TreeKind,
    entries: BTreeMap<String, String>,
    collisions: Vec<IndexCollision>,
}

impl SymbolIndex {
    /// Which tree this index describes.
    pub fn tree(&self) -> TreeKind {
        self.tree
    }

    /// File declaring exactly `fq_name`.
    pub fn get(&self, fq_name: &str) -> Option<&str> {
        self.entries.get(fq_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Exact-key collisions seen while building.
    pub fn collisions(&self) -> &[IndexCollision] {
        &self.collisions
    }

    /// Resolve a possibly partial target class name.
    pub fn resolve(&self, target: &str) -> Result<Resolution, ResolveError> {
        let name = normalize_target(target);

        if let Some(file) = self.entries.get(&name) {
            return Ok(Resolution {
                fq_name: name,
                file: file.clone(),
            });
        }

        let suffix = format!(".{name}");
        let mut candidates: Vec<(&String, &String)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.ends_with(&suffix))
            .collect();

        match candidates.len() {
            0 => Err(ResolveError::NotFound {
                name,
                tree: self.tree,
            }),
            1 => {
                let (fq_name, file) = candidates.remove(0);
                Ok(Resolution {
                    fq_name: fq_name.clone(),
                    file: file.clone(),
                })
            }
            _ => {
                // BTreeMap iteration is already ordered; sort anyway so the
                // result does not depend on the map type.
                let mut candidates: Vec<String> =
                    candidates.into_iter().map(|(k, _)| k.clone()).collect();
                candidates.sort();
                Err(ResolveError::Ambiguous {
                    name,
                    tree: self.tree,
                    candidates,
                })
            }
        }
    }
}

/// Canonical spelling of a target class: no `global::` alias, `.` for nested
/// type separators, no surrounding whitespace.
pub fn normalize_target(target: &str) -> String {
    let trimmed = target.trim();
    let trimmed = trimmed.strip_prefix("global::").unwrap_or(trimmed);
    trimmed.replace('+', ".")
}
