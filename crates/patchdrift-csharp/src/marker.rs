//! Attribute markers and their arguments.
//!
//! Harmony declares patches with attributes such as
//! `[HarmonyPatch(typeof(Pawn), nameof(Pawn.Kill))]` or
//! `[HarmonyPatch("Verse.Pawn", "Kill")]`. Each positional argument is
//! classified into a [`MarkerArgument`]; anything unrecognised lands in
//! [`MarkerArgument::Other`] and is read by stripping quotes.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::parser::ParsedFile;

/// Normalised name of the primary patch marker.
pub const PATCH_MARKER: &str = "HarmonyPatch";

/// Prefix shared by every patch-related marker.
const PATCH_FAMILY_PREFIX: &str = "Harmony";

// ============================================================================
// Arguments
// ============================================================================

/// One positional marker argument, by shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MarkerArgument {
    /// `typeof(T)`: the textual type name.
    TypeOf(String),
    /// A string literal's value, without quotes.
    Literal(String),
    /// `nameof(a.b.C)`: the simple name `C`.
    NameOf(String),
    /// Any other expression, as raw text.
    Other(String),
}

impl MarkerArgument {
    /// Read the argument as a target class name.
    pub fn target_class(&self) -> String {
        match self {
            MarkerArgument::TypeOf(name)
            | MarkerArgument::Literal(name)
            | MarkerArgument::NameOf(name) => name.clone(),
            MarkerArgument::Other(raw) => unquote(raw),
        }
    }

    /// Read the argument as a target member name.
    pub fn target_member(&self) -> String {
        match self {
            MarkerArgument::Literal(value) | MarkerArgument::NameOf(value) => value.clone(),
            MarkerArgument::TypeOf(name) => name.clone(),
            MarkerArgument::Other(raw) => unquote(raw),
        }
    }
}

/// Strip string-literal decoration: `@`/`$` prefixes, surrounding quote runs
/// and a `u8` suffix. Verbatim `""` escapes collapse to `"`.
pub fn unquote(raw: &str) -> String {
    let text = raw.trim();
    let text = if text.ends_with("\"u8") {
        &text[..text.len() - 2]
    } else {
        text
    };
    let verbatim = text.starts_with('@') || text.starts_with("$@");
    let text = text.trim_start_matches(['@', '$']);

    let leading = text.chars().take_while(|&c| c == '"').count();
    let trailing = text.chars().rev().take_while(|&c| c == '"').count();
    let quotes = leading.min(trailing);
    if quotes == 0 {
        return text.to_string();
    }
    if text.chars().all(|c| c == '"') {
        return String::new();
    }

    let inner = &text[quotes..text.len() - quotes];
    if verbatim {
        inner.replace("\"\"", "\"")
    } else {
        inner.to_string()
    }
}

/// Classify an argument expression.
pub fn classify_argument(file: &ParsedFile, expr: Node<'_>) -> MarkerArgument {
    match expr.kind() {
        "typeof_expression" => {
            let ty = expr
                .child_by_field_name("type")
                .or_else(|| expr.named_child(0));
            match ty {
                Some(ty) => MarkerArgument::TypeOf(compact(file.text(ty))),
                None => MarkerArgument::Other(file.text(expr).to_string()),
            }
        }
        "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
            MarkerArgument::Literal(unquote(file.text(expr)))
        }
        "invocation_expression" => match nameof_target(file, expr) {
            Some(name) => MarkerArgument::NameOf(name),
            None => MarkerArgument::Other(file.text(expr).to_string()),
        },
        _ => MarkerArgument::Other(file.text(expr).to_string()),
    }
}

/// The simple name referenced by `nameof(...)`, if `expr` is one.
fn nameof_target(file: &ParsedFile, expr: Node<'_>) -> Option<String> {
    let function = expr.child_by_field_name("function")?;
    if file.text(function) != "nameof" {
        return None;
    }
    let arguments = expr.child_by_field_name("arguments")?;
    let inner = file
        .text(arguments)
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let inner = compact(inner);
    let simple = inner.rsplit('.').next().unwrap_or(&inner);
    (!simple.is_empty()).then(|| simple.to_string())
}

/// Remove all whitespace from a type or name expression.
fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

// ============================================================================
// Markers
// ============================================================================

/// One attribute attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Name without qualification or `Attribute` suffix.
    pub name: String,
    /// Positional arguments in order; named arguments are dropped.
    pub args: Vec<MarkerArgument>,
}

impl Marker {
    /// Whether this is the primary patch marker.
    pub fn is_patch(&self) -> bool {
        self.name == PATCH_MARKER
    }

    /// Whether this belongs to the patch family at all.
    pub fn is_patch_related(&self) -> bool {
        self.name.starts_with(PATCH_FAMILY_PREFIX)
    }

    /// Whether this is a patch-related marker other than the primary one.
    pub fn is_role(&self) -> bool {
        self.is_patch_related() && !self.is_patch()
    }
}

/// Normalise an attribute name: `HarmonyLib.HarmonyPatchAttribute` and
/// `global::HarmonyLib.HarmonyPatch` both become `HarmonyPatch`.
pub fn normalize_marker_name(raw: &str) -> String {
    let compact = compact(raw);
    let last = compact
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(compact.as_str());
    let last = last.split('<').next().unwrap_or(last);
    match last.strip_suffix("Attribute") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => last.to_string(),
    }
}

/// All markers attached directly to a declaration node, in source order.
pub fn markers_of(file: &ParsedFile, decl: Node<'_>) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut cursor = decl.walk();
    for list in decl.children(&mut cursor) {
        if list.kind() != "attribute_list" {
            continue;
        }
        let mut list_cursor = list.walk();
        for attribute in list.named_children(&mut list_cursor) {
            if attribute.kind() != "attribute" {
                continue;
            }
            if let Some(marker) = read_attribute(file, attribute) {
                markers.push(marker);
            }
        }
    }
    markers
}

fn read_attribute(file: &ParsedFile, attribute: Node<'_>) -> Option<Marker> {
    let name = attribute.child_by_field_name("name")?;
    let mut args = Vec::new();

    let mut cursor = attribute.walk();
    let arg_list = attribute
        .named_children(&mut cursor)
        .find(|child| child.kind() == "attribute_argument_list");

    if let Some(arg_list) = arg_list {
        let mut list_cursor = arg_list.walk();
        for argument in arg_list.named_children(&mut list_cursor) {
            if argument.kind() != "attribute_argument" || is_named_argument(argument) {
                continue;
            }
            let count = argument.named_child_count();
            if let Some(expr) = count.checked_sub(1).and_then(|last| argument.named_child(last)) {
                args.push(classify_argument(file, expr));
            }
        }
    }

    Some(Marker {
        name: normalize_marker_name(file.text(name)),
        args,
    })
}

/// `Name = value` and `name: value` arguments carry their separator as a
/// direct child; positional ones do not. Some grammar versions parse
/// `Name = value` as an assignment expression instead.
fn is_named_argument(argument: Node<'_>) -> bool {
    let mut cursor = argument.walk();
    for child in argument.children(&mut cursor) {
        if !child.is_named() && matches!(child.kind(), "=" | ":") {
            return true;
        }
        if child.kind() == "assignment_expression" {
            return true;
        }
    }
    false
}

/// Concatenated positional arguments of every primary patch marker.
pub fn patch_args(markers: &[Marker]) -> Vec<MarkerArgument> {
    markers
        .iter()
        .filter(|m| m.is_patch())
        .flat_map(|m| m.args.iter().cloned())
        .collect()
}
