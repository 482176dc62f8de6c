//! Normalized edit-distance similarity between two lines.
//!
//! `similarity(a, b) = 1 - edit_distance(a, b) / max(len(a), len(b))`, with
//! lengths and edits counted in Unicode scalar values. The table is
//! O(len(a) * len(b)); callers only feed it single source lines.

/// Classic Levenshtein distance with unit insert/delete/substitute costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let width = b.len() + 1;
    let mut table = vec![0usize; (a.len() + 1) * width];
    for (j, cell) in table.iter_mut().take(width).enumerate() {
        *cell = j;
    }
    for i in 1..=a.len() {
        table[i * width] = i;
        for j in 1..=b.len() {
            let substitution = table[(i - 1) * width + (j - 1)] + usize::from(a[i - 1] != b[j - 1]);
            let deletion = table[(i - 1) * width + j] + 1;
            let insertion = table[i * width + (j - 1)] + 1;
            table[i * width + j] = substitution.min(deletion).min(insertion);
        }
    }

    table[a.len() * width + b.len()]
}

/// Similarity in `[0, 1]`.
///
/// Two empty strings are defined as identical (1.0); one empty string
/// against a non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    match (a_len, b_len) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => {
            let distance = edit_distance(a, b) as f64;
            let longest = a_len.max(b_len) as f64;
            1.0 - distance / longest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod distance {
        use super::*;

        #[test]
        fn classic_examples() {
            assert_eq!(edit_distance("kitten", "sitting"), 3);
            assert_eq!(edit_distance("flaw", "lawn"), 2);
            assert_eq!(edit_distance("same", "same"), 0);
        }

        #[test]
        fn empty_inputs() {
            assert_eq!(edit_distance("", ""), 0);
            assert_eq!(edit_distance("", "abc"), 3);
            assert_eq!(edit_distance("abc", ""), 3);
        }

        #[test]
        fn counts_chars_not_bytes() {
            assert_eq!(edit_distance("größe", "grösse"), 2);
        }
    }

    mod score {
        use super::*;

        #[test]
        fn identical_lines_score_one() {
            assert_eq!(similarity("int value = 42;", "int value = 42;"), 1.0);
        }

        #[test]
        fn empty_cases() {
            assert_eq!(similarity("", ""), 1.0);
            assert_eq!(similarity("", "x"), 0.0);
            assert_eq!(similarity("x", ""), 0.0);
        }

        #[test]
        fn half_way_is_exactly_one_half() {
            assert_eq!(similarity("abcd", "abxy"), 0.5);
        }

        #[test]
        fn stays_within_bounds() {
            let samples = [
                "a",
                "return x;",
                "foo(bar, baz);",
                "}",
                "completely different text here",
                "    if (pawn == null) return;",
            ];
            for a in samples {
                for b in samples {
                    let s = similarity(a, b);
                    assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} gave {s}");
                }
            }
        }

        #[test]
        fn symmetric() {
            let a = "int value = 42;";
            let b = "int value = 100;";
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }
}
