//! Plain-text summary of a report.

use std::fmt;

use patchdrift_core::align::{AlignedDiff, RenderedRow, RowKind};
use patchdrift_core::report::Report;

/// Displays counts, then one line per drifted method and per skipped patch.
pub struct TextSummary<'a> {
    report: &'a Report,
}

impl<'a> TextSummary<'a> {
    pub fn new(report: &'a Report) -> Self {
        TextSummary { report }
    }
}

fn count_rows(rows: &[RenderedRow], kind: RowKind) -> usize {
    rows.iter().filter(|row| row.kind == kind).count()
}

/// `(deleted, inserted, modified)` line counts of a diff.
fn change_counts(diff: &AlignedDiff) -> (usize, usize, usize) {
    (
        count_rows(&diff.old_pane, RowKind::Deleted),
        count_rows(&diff.new_pane, RowKind::Inserted),
        diff.pairs.len(),
    )
}

impl fmt::Display for TextSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "patches found: {}", report.patches_found)?;
        writeln!(f, "changed:       {}", report.changed_count())?;
        writeln!(f, "unchanged:     {}", report.unchanged)?;
        writeln!(f, "skipped:       {}", report.skipped_count())?;

        if !report.items.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changed targets:")?;
            for item in &report.items {
                let (deleted, inserted, modified) = change_counts(&item.diff);
                writeln!(
                    f,
                    "  {}  {}  (-{} +{} ~{})",
                    item.id, item.label, deleted, inserted, modified
                )?;
            }
        }

        if !report.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped patches:")?;
            for skipped in &report.skipped {
                writeln!(
                    f,
                    "  {} ({}): {}",
                    skipped.patch.declaring_label(),
                    skipped.patch.target_label(),
                    skipped.message
                )?;
            }
        }
        Ok(())
    }
}
