//! Token-level diff of two related lines.
//!
//! Lines are split on a fixed delimiter set; every delimiter is its own token
//! so concatenating the tokens reproduces the input. A token LCS table drives
//! a backward walk that emits [`DiffSegment`]s for one side only: matched
//! tokens are unchanged, tokens unique to the rendered side are changed, and
//! tokens unique to the other side are dropped.
//!
//! ## Round-trip law
//!
//! For either side, concatenating the segment texts yields that side's input
//! line exactly.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::similarity::similarity;

/// Characters that split tokens. Each one is emitted as a token of its own.
const DELIMITERS: &[char] = &[
    ' ', '\t', '\r', '\n', '.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '<', '>', '=', '+',
    '-', '*', '/', '%', '!', '&', '|', '^', '~', '?', '"', '\'', '@', '#', '$', '\\',
];

/// A contiguous run of text in a rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    /// Segment text.
    pub text: String,
    /// Whether the text is unique to the rendered side.
    pub changed: bool,
}

impl DiffSegment {
    /// Create an unchanged segment.
    pub fn unchanged(text: impl Into<String>) -> Self {
        DiffSegment {
            text: text.into(),
            changed: false,
        }
    }

    /// Create a changed segment.
    pub fn changed(text: impl Into<String>) -> Self {
        DiffSegment {
            text: text.into(),
            changed: true,
        }
    }
}

/// Which side of a modified pair is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The old line; removed tokens are highlighted.
    Old,
    /// The new line; added tokens are highlighted.
    New,
}

fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}

/// Split a line into tokens, keeping delimiters as single-char tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (offset, ch) in line.char_indices() {
        if is_delimiter(ch) {
            if let Some(start) = word_start.take() {
                tokens.push(&line[start..offset]);
            }
            tokens.push(&line[offset..offset + ch.len_utf8()]);
        } else if word_start.is_none() {
            word_start = Some(offset);
        }
    }
    if let Some(start) = word_start {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Diff `old` against `new` and render `side`.
///
/// Short lines and lines that are barely related (see [`AnalysisConfig`])
/// render as a single unchanged segment, avoiding token salad.
pub fn token_diff(old: &str, new: &str, side: Side, config: &AnalysisConfig) -> Vec<DiffSegment> {
    let rendered = match side {
        Side::Old => old,
        Side::New => new,
    };

    let too_short = old.chars().count() < config.token_diff_min_len
        || new.chars().count() < config.token_diff_min_len;
    if too_short || similarity(old, new) < config.token_diff_min_similarity {
        return whole_line(rendered);
    }

    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);
    merge_adjacent(lcs_segments(&old_tokens, &new_tokens, side))
}

fn whole_line(text: &str) -> Vec<DiffSegment> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![DiffSegment::unchanged(text)]
    }
}

/// Walk the LCS table backward from both ends and emit one segment per token.
fn lcs_segments(old: &[&str], new: &[&str], side: Side) -> Vec<DiffSegment> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;

    // table[i * width + j] = LCS length of old[..i] and new[..j]
    let mut table = vec![0usize; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if old[i - 1] == new[j - 1] {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    let mut reversed = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            reversed.push(DiffSegment::unchanged(old[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i * width + (j - 1)] >= table[(i - 1) * width + j]) {
            if side == Side::New {
                reversed.push(DiffSegment::changed(new[j - 1]));
            }
            j -= 1;
        } else {
            if side == Side::Old {
                reversed.push(DiffSegment::changed(old[i - 1]));
            }
            i -= 1;
        }
    }

    reversed.reverse();
    reversed
}

/// Coalesce neighbouring segments with the same `changed` flag.
fn merge_adjacent(segments: Vec<DiffSegment>) -> Vec<DiffSegment> {
    let mut merged: Vec<DiffSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(last) if last.changed == segment.changed => last.text.push_str(&segment.text),
            _ => merged.push(segment),
        }
    }
    merged
}

/// Concatenate segment texts.
pub fn concat(segments: &[DiffSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(old: &str, new: &str, side: Side) -> Vec<DiffSegment> {
        token_diff(old, new, side, &AnalysisConfig::default())
    }

    mod tokenizer {
        use super::*;

        #[test]
        fn keeps_delimiters_as_tokens() {
            assert_eq!(
                tokenize("int value = 42;"),
                vec!["int", " ", "value", " ", "=", " ", "42", ";"]
            );
        }

        #[test]
        fn member_access_and_calls() {
            assert_eq!(
                tokenize("pawn.Kill(dinfo);"),
                vec!["pawn", ".", "Kill", "(", "dinfo", ")", ";"]
            );
        }

        #[test]
        fn reconstructs_input() {
            let line = "\tif (a >= b && c != null) { return \"x\"; }";
            assert_eq!(tokenize(line).concat(), line);
        }

        #[test]
        fn empty_line_has_no_tokens() {
            assert!(tokenize("").is_empty());
        }
    }

    mod segments {
        use super::*;

        #[test]
        fn literal_change_highlights_only_the_literal() {
            let old = "int value = 42;";
            let new = "int value = 100;";

            assert_eq!(
                render(old, new, Side::Old),
                vec![
                    DiffSegment::unchanged("int value = "),
                    DiffSegment::changed("42"),
                    DiffSegment::unchanged(";"),
                ]
            );
            assert_eq!(
                render(old, new, Side::New),
                vec![
                    DiffSegment::unchanged("int value = "),
                    DiffSegment::changed("100"),
                    DiffSegment::unchanged(";"),
                ]
            );
        }

        #[test]
        fn inserted_argument_only_shows_on_new_side() {
            let old = "DoThing(a, b);";
            let new = "DoThing(a, b, c);";

            let old_side = render(old, new, Side::Old);
            assert!(old_side.iter().all(|s| !s.changed));

            let new_side = render(old, new, Side::New);
            let changed: String = new_side
                .iter()
                .filter(|s| s.changed)
                .map(|s| s.text.as_str())
                .collect();
            assert_eq!(changed, ", c");
        }

        #[test]
        fn round_trip_both_sides() {
            let pairs = [
                ("int value = 42;", "int value = 100;"),
                ("    pawn.Kill(null);", "    pawn.Kill(dinfo, exactCulprit);"),
                ("return a + b;", "return a - b * c;"),
                ("var x = Foo<int>(y);", "var x = Bar<string>(y, z);"),
            ];
            for (old, new) in pairs {
                assert_eq!(concat(&render(old, new, Side::Old)), old);
                assert_eq!(concat(&render(old, new, Side::New)), new);
            }
        }

        #[test]
        fn adjacent_segments_are_merged() {
            let segments = render("a.b.c = 1;", "a.b.d = 1;", Side::Old);
            for window in segments.windows(2) {
                assert_ne!(window[0].changed, window[1].changed);
            }
        }
    }

    mod degenerate {
        use super::*;

        #[test]
        fn short_lines_render_whole() {
            assert_eq!(render("}", "};", Side::Old), vec![DiffSegment::unchanged("}")]);
            assert_eq!(render("}", "};", Side::New), vec![DiffSegment::unchanged("};")]);
        }

        #[test]
        fn unrelated_lines_render_whole() {
            let old = "return;";
            let new = "foreach (var thing in list) Process(thing);";
            assert_eq!(render(old, new, Side::Old), vec![DiffSegment::unchanged(old)]);
            assert_eq!(render(old, new, Side::New), vec![DiffSegment::unchanged(new)]);
        }

        #[test]
        fn empty_side_renders_nothing() {
            assert!(render("", "something", Side::Old).is_empty());
        }
    }
}
