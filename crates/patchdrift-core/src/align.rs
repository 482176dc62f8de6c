//! Line alignment of two method texts into a pair of parallel panes.
//!
//! The pipeline:
//!
//! 1. An LCS line diff (via `similar`) classifies every line as unchanged,
//!    deleted or inserted. Line terminators are kept in [`DiffLine::text`].
//! 2. Deleted lines are visited in order; each claims the most similar
//!    unclaimed inserted line if that similarity is strictly above the
//!    pairing threshold. Ties go to the first inserted line seen. Pairing is
//!    greedy and never revisited.
//! 3. The lines are laid out as two panes of equal length. Pure insertions
//!    put a placeholder row in the old pane, pure deletions put one in the new
//!    pane, and each Modified Pair occupies a single row in both panes with
//!    token-level highlighting.
//!
//! A pair may join lines from different hunks. The pair's row sits where the
//! deleted line is, so the old pane always numbers its lines in order while
//! the new pane can show a paired line ahead of, or behind, its neighbours.
//!
//! Rows refer to pairs by index into [`AlignedDiff::pairs`]; the panes never
//! point at each other.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

use crate::config::AnalysisConfig;
use crate::similarity::similarity;
use crate::token_diff::{token_diff, DiffSegment, Side};

// ============================================================================
// Types
// ============================================================================

/// Classification of a line in the line-level diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Unchanged,
    Deleted,
    Inserted,
}

/// One line of the line-level diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Line text including its terminator, if any.
    pub text: String,
    pub kind: LineKind,
    /// 1-indexed position in the old text; absent for insertions.
    pub old_number: Option<usize>,
    /// 1-indexed position in the new text; absent for deletions.
    pub new_number: Option<usize>,
}

impl DiffLine {
    /// Line text without its terminator.
    pub fn content(&self) -> &str {
        line_content(&self.text)
    }
}

/// A deleted/inserted line pair rendered as one modified line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedPair {
    /// Index of the deleted line in [`AlignedDiff::lines`].
    pub deleted: usize,
    /// Index of the inserted line in [`AlignedDiff::lines`].
    pub inserted: usize,
    pub similarity: f64,
}

/// Classification of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Unchanged,
    Deleted,
    Inserted,
    Modified,
    /// Blank row keeping the panes aligned.
    Placeholder,
}

/// One row of a rendered pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub old_number: Option<usize>,
    pub new_number: Option<usize>,
    pub kind: RowKind,
    /// Index into [`AlignedDiff::pairs`] for modified rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<usize>,
    pub segments: Vec<DiffSegment>,
}

impl RenderedRow {
    fn placeholder() -> Self {
        RenderedRow {
            old_number: None,
            new_number: None,
            kind: RowKind::Placeholder,
            pair: None,
            segments: Vec::new(),
        }
    }

    fn whole(line: &DiffLine, kind: RowKind) -> Self {
        RenderedRow {
            old_number: line.old_number,
            new_number: line.new_number,
            kind,
            pair: None,
            segments: vec![DiffSegment {
                text: line.content().to_string(),
                changed: kind != RowKind::Unchanged,
            }],
        }
    }

    /// Concatenated segment text.
    pub fn text(&self) -> String {
        crate::token_diff::concat(&self.segments)
    }
}

/// Full alignment result for one old/new text pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedDiff {
    pub lines: Vec<DiffLine>,
    pub pairs: Vec<ModifiedPair>,
    pub old_pane: Vec<RenderedRow>,
    pub new_pane: Vec<RenderedRow>,
}

// ============================================================================
// Operations
// ============================================================================

/// Strip a trailing `\n` or `\r\n`.
pub fn line_content(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

/// LCS line diff with old/new line numbering.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_lines(old, new);

    let mut old_number = 0usize;
    let mut new_number = 0usize;
    let mut lines = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => LineKind::Unchanged,
            ChangeTag::Delete => LineKind::Deleted,
            ChangeTag::Insert => LineKind::Inserted,
        };
        let old_line = (kind != LineKind::Inserted).then(|| {
            old_number += 1;
            old_number
        });
        let new_line = (kind != LineKind::Deleted).then(|| {
            new_number += 1;
            new_number
        });
        lines.push(DiffLine {
            text: change.value().to_string(),
            kind,
            old_number: old_line,
            new_number: new_line,
        });
    }

    lines
}

/// Greedy similarity pairing of deleted and inserted lines.
///
/// Deleted lines are processed in order. Each takes the best-scoring
/// unclaimed inserted line if its similarity is strictly greater than
/// `threshold`; the first candidate wins ties.
pub fn pair_lines(lines: &[DiffLine], threshold: f64) -> Vec<ModifiedPair> {
    let deleted: Vec<usize> = indices_of(lines, LineKind::Deleted);
    let inserted: Vec<usize> = indices_of(lines, LineKind::Inserted);
    let mut claimed = vec![false; inserted.len()];
    let mut pairs = Vec::new();

    for &d in &deleted {
        let mut best: Option<(usize, f64)> = None;
        for (slot, &i) in inserted.iter().enumerate() {
            if claimed[slot] {
                continue;
            }
            let score = similarity(lines[d].content(), lines[i].content());
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((slot, score));
            }
        }

        if let Some((slot, score)) = best {
            if score > threshold {
                claimed[slot] = true;
                pairs.push(ModifiedPair {
                    deleted: d,
                    inserted: inserted[slot],
                    similarity: score,
                });
            }
        }
    }

    pairs
}

fn indices_of(lines: &[DiffLine], kind: LineKind) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.kind == kind)
        .map(|(index, _)| index)
        .collect()
}

/// Diff, pair and lay out two texts.
pub fn align(old: &str, new: &str, config: &AnalysisConfig) -> AlignedDiff {
    let lines = diff_lines(old, new);
    let pairs = pair_lines(&lines, config.pairing_threshold);

    let pair_of_deleted: HashMap<usize, usize> = pairs
        .iter()
        .enumerate()
        .map(|(p, pair)| (pair.deleted, p))
        .collect();
    let paired_inserted: HashSet<usize> = pairs.iter().map(|pair| pair.inserted).collect();

    let mut old_pane = Vec::with_capacity(lines.len());
    let mut new_pane = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::Unchanged => {
                old_pane.push(RenderedRow::whole(line, RowKind::Unchanged));
                new_pane.push(RenderedRow::whole(line, RowKind::Unchanged));
            }
            LineKind::Deleted => match pair_of_deleted.get(&index) {
                Some(&p) => {
                    let partner = &lines[pairs[p].inserted];
                    let (old_text, new_text) = (line.content(), partner.content());
                    for (pane, side) in [(&mut old_pane, Side::Old), (&mut new_pane, Side::New)] {
                        pane.push(RenderedRow {
                            old_number: line.old_number,
                            new_number: partner.new_number,
                            kind: RowKind::Modified,
                            pair: Some(p),
                            segments: token_diff(old_text, new_text, side, config),
                        });
                    }
                }
                None => {
                    old_pane.push(RenderedRow::whole(line, RowKind::Deleted));
                    new_pane.push(RenderedRow::placeholder());
                }
            },
            LineKind::Inserted => {
                // Paired insertions are rendered on their deleted partner's row.
                if paired_inserted.contains(&index) {
                    continue;
                }
                old_pane.push(RenderedRow::placeholder());
                new_pane.push(RenderedRow::whole(line, RowKind::Inserted));
            }
        }
    }

    AlignedDiff {
        lines,
        pairs,
        old_pane,
        new_pane,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lines: &[DiffLine]) -> Vec<LineKind> {
        lines.iter().map(|l| l.kind).collect()
    }

    fn row_kinds(rows: &[RenderedRow]) -> Vec<RowKind> {
        rows.iter().map(|r| r.kind).collect()
    }

    mod line_diff {
        use super::*;

        #[test]
        fn classifies_lines() {
            let lines = diff_lines("a\nb\nc\n", "a\nx\nc\n");
            assert_eq!(
                kinds(&lines),
                vec![
                    LineKind::Unchanged,
                    LineKind::Deleted,
                    LineKind::Inserted,
                    LineKind::Unchanged
                ]
            );
        }

        #[test]
        fn numbers_both_sides() {
            let lines = diff_lines("a\nb\nc\n", "a\nx\nc\n");
            let numbers: Vec<_> = lines.iter().map(|l| (l.old_number, l.new_number)).collect();
            assert_eq!(
                numbers,
                vec![
                    (Some(1), Some(1)),
                    (Some(2), None),
                    (None, Some(2)),
                    (Some(3), Some(3)),
                ]
            );
        }

        #[test]
        fn keeps_line_endings() {
            let lines = diff_lines("a\r\nb", "a\r\nc");
            assert_eq!(lines[0].text, "a\r\n");
            assert_eq!(lines[0].content(), "a");
            let old: String = lines
                .iter()
                .filter(|l| l.kind != LineKind::Inserted)
                .map(|l| l.text.as_str())
                .collect();
            assert_eq!(old, "a\r\nb");
        }
    }

    mod pairing {
        use super::*;

        fn deleted(text: &str) -> DiffLine {
            DiffLine {
                text: format!("{text}\n"),
                kind: LineKind::Deleted,
                old_number: Some(1),
                new_number: None,
            }
        }

        fn inserted(text: &str) -> DiffLine {
            DiffLine {
                text: format!("{text}\n"),
                kind: LineKind::Inserted,
                old_number: None,
                new_number: Some(1),
            }
        }

        #[test]
        fn similarity_exactly_at_threshold_is_not_paired() {
            let lines = vec![deleted("abcd"), inserted("abxy")];
            assert!(pair_lines(&lines, 0.5).is_empty());
        }

        #[test]
        fn similarity_just_above_threshold_is_paired() {
            let lines = vec![deleted("abcde"), inserted("abcxy")];
            let pairs = pair_lines(&lines, 0.5);
            assert_eq!(pairs.len(), 1);
            assert_eq!((pairs[0].deleted, pairs[0].inserted), (0, 1));
            assert!((pairs[0].similarity - 0.6).abs() < 1e-9);
        }

        #[test]
        fn each_inserted_line_is_claimed_once() {
            let lines = vec![
                deleted("value = 1;"),
                deleted("value = 2;"),
                inserted("value = 3;"),
            ];
            let pairs = pair_lines(&lines, 0.5);
            assert_eq!(pairs.len(), 1);
            assert_eq!(pairs[0].deleted, 0);
        }

        #[test]
        fn greedy_in_deleted_order() {
            let lines = vec![
                deleted("abcdef"),
                deleted("abcdxx"),
                inserted("abcdxf"),
                inserted("zzzzzz"),
            ];
            let pairs = pair_lines(&lines, 0.5);
            assert_eq!(pairs.len(), 1);
            assert_eq!((pairs[0].deleted, pairs[0].inserted), (0, 2));
        }

        #[test]
        fn ties_go_to_first_candidate() {
            let lines = vec![deleted("abcd"), inserted("abcx"), inserted("abcy")];
            let pairs = pair_lines(&lines, 0.5);
            assert_eq!(pairs[0].inserted, 1);
        }
    }

    mod panes {
        use super::*;

        fn run(old: &str, new: &str) -> AlignedDiff {
            align(old, new, &AnalysisConfig::default())
        }

        #[test]
        fn cross_hunk_pair_follows_the_deleted_line() {
            let diff = run("a();\nX(42);\nb();\n", "X(43);\na();\nb();\n");
            assert_eq!(diff.pairs.len(), 1);

            let old: Vec<_> = diff.old_pane.iter().map(|r| (r.kind, r.old_number)).collect();
            let new: Vec<_> = diff.new_pane.iter().map(|r| (r.kind, r.new_number)).collect();
            assert_eq!(
                old,
                vec![
                    (RowKind::Unchanged, Some(1)),
                    (RowKind::Modified, Some(2)),
                    (RowKind::Unchanged, Some(3)),
                ]
            );
            assert_eq!(
                new,
                vec![
                    (RowKind::Unchanged, Some(2)),
                    (RowKind::Modified, Some(1)),
                    (RowKind::Unchanged, Some(3)),
                ]
            );
        }

        #[test]
        fn modified_literal_becomes_one_row() {
            let old = "{\n    int value = 42;\n    return value;\n}\n";
            let new = "{\n    int value = 100;\n    return value;\n}\n";
            let diff = run(old, new);

            assert_eq!(diff.pairs.len(), 1);
            assert_eq!(diff.old_pane.len(), 4);
            assert_eq!(diff.old_pane[1].kind, RowKind::Modified);
            assert_eq!(diff.new_pane[1].kind, RowKind::Modified);
            assert_eq!(diff.old_pane[1].pair, Some(0));
            assert_eq!(diff.new_pane[1].pair, Some(0));

            let old_changed: Vec<_> = diff.old_pane[1]
                .segments
                .iter()
                .filter(|s| s.changed)
                .map(|s| s.text.as_str())
                .collect();
            let new_changed: Vec<_> = diff.new_pane[1]
                .segments
                .iter()
                .filter(|s| s.changed)
                .map(|s| s.text.as_str())
                .collect();
            assert_eq!(old_changed, vec!["42"]);
            assert_eq!(new_changed, vec!["100"]);
            assert_eq!(diff.old_pane[1].text(), "    int value = 42;");
            assert_eq!(diff.new_pane[1].text(), "    int value = 100;");
        }

        #[test]
        fn pure_deletion_leaves_placeholder_in_new_pane() {
            let old = "{\n    Log.Message(\"hello\");\n    x++;\n}\n";
            let new = "{\n    x++;\n}\n";
            let diff = run(old, new);

            assert!(diff.pairs.is_empty());
            assert_eq!(
                row_kinds(&diff.old_pane),
                vec![RowKind::Unchanged, RowKind::Deleted, RowKind::Unchanged, RowKind::Unchanged]
            );
            assert_eq!(
                row_kinds(&diff.new_pane),
                vec![
                    RowKind::Unchanged,
                    RowKind::Placeholder,
                    RowKind::Unchanged,
                    RowKind::Unchanged
                ]
            );
            assert!(diff.new_pane[1].segments.is_empty());
            assert_eq!(diff.old_pane[1].old_number, Some(2));
        }

        #[test]
        fn pure_insertion_leaves_placeholder_in_old_pane() {
            let diff = run("a();\n", "a();\nif (ready) Start(pawn);\n");
            assert_eq!(
                row_kinds(&diff.old_pane),
                vec![RowKind::Unchanged, RowKind::Placeholder]
            );
            assert_eq!(
                row_kinds(&diff.new_pane),
                vec![RowKind::Unchanged, RowKind::Inserted]
            );
            assert_eq!(diff.new_pane[1].new_number, Some(2));
        }

        #[test]
        fn panes_always_have_equal_length() {
            let cases = [
                ("", "a\nb\n"),
                ("a\nb\n", ""),
                ("a\nb\nc\n", "c\nb\na\n"),
                ("int x = 1;\nint y = 2;\n", "int x = 10;\nfloat z;\nint y = 20;\n"),
            ];
            for (old, new) in cases {
                let diff = run(old, new);
                assert_eq!(diff.old_pane.len(), diff.new_pane.len(), "{old:?} vs {new:?}");
            }
        }

        #[test]
        fn modified_rows_line_up_across_panes() {
            let diff = run(
                "int x = 1;\nint y = 2;\nfoo();\n",
                "int x = 10;\nbar();\nint y = 20;\n",
            );
            for (old_row, new_row) in diff.old_pane.iter().zip(&diff.new_pane) {
                if old_row.kind == RowKind::Modified {
                    assert_eq!(new_row.kind, RowKind::Modified);
                    assert_eq!(old_row.pair, new_row.pair);
                }
            }
        }

        #[test]
        fn identical_texts() {
            let diff = run("a\nb\n", "a\nb\n");
            assert!(diff.lines.iter().all(|l| l.kind == LineKind::Unchanged));
            assert!(diff.old_pane.iter().all(|r| r.kind == RowKind::Unchanged));
        }
    }
}
