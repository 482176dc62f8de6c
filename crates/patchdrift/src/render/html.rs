//! Self-contained HTML report.
//!
//! One `<section>` per drifted method, each with the old and new method side
//! by side. Rows of the two panes line up one to one; changed segments are
//! wrapped in `<span class="del">` on the old side and `<span class="ins">`
//! on the new side. All source text is escaped.

use std::fmt;

use patchdrift_core::align::{RenderedRow, RowKind};
use patchdrift_core::report::{Report, ReportItem};
use patchdrift_core::token_diff::Side;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em; }
nav li { font-family: monospace; }
section.item { margin-bottom: 3em; }
.panes { display: flex; gap: 1em; }
.pane { flex: 1; border-collapse: collapse; font-family: monospace; font-size: 13px; }
.pane caption { text-align: left; font-weight: bold; padding: 4px 0; }
.pane td { padding: 0 6px; white-space: pre; vertical-align: top; }
.pane td.ln { color: #888; text-align: right; user-select: none; width: 3em; }
tr.deleted { background: #fdecea; }
tr.inserted { background: #e9f7ec; }
tr.modified { background: #fff8e1; }
tr.placeholder { background: #f4f4f4; }
span.del { background: #f5b7b1; text-decoration: line-through; }
span.ins { background: #a9dfbf; }
pre.source { background: #f8f8f8; padding: 8px; overflow-x: auto; }
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Displays a [`Report`] as a complete HTML document.
pub struct HtmlReport<'a> {
    report: &'a Report,
}

impl<'a> HtmlReport<'a> {
    pub fn new(report: &'a Report) -> Self {
        HtmlReport { report }
    }
}

impl fmt::Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>Patch drift report</title>")?;
        writeln!(f, "<style>{}</style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<h1>Patch drift report</h1>")?;
        writeln!(
            f,
            "<p class=\"summary\">{} patches found, {} changed, {} unchanged, {} skipped</p>",
            report.patches_found,
            report.changed_count(),
            report.unchanged,
            report.skipped_count()
        )?;

        if !report.items.is_empty() {
            writeln!(f, "<nav><ul>")?;
            for item in &report.items {
                writeln!(
                    f,
                    "<li><a href=\"#{}\">{}</a></li>",
                    escape_html(&item.id),
                    escape_html(&item.label)
                )?;
            }
            writeln!(f, "</ul></nav>")?;
        }

        for item in &report.items {
            write_item(f, item)?;
        }

        if !report.skipped.is_empty() {
            writeln!(f, "<section class=\"skipped\">")?;
            writeln!(f, "<h2>Skipped patches</h2>")?;
            writeln!(f, "<ul>")?;
            for skipped in &report.skipped {
                writeln!(
                    f,
                    "<li><code>{}</code> ({}): {}</li>",
                    escape_html(&skipped.patch.declaring_label()),
                    escape_html(&skipped.patch.target_label()),
                    escape_html(&skipped.message)
                )?;
            }
            writeln!(f, "</ul>")?;
            writeln!(f, "</section>")?;
        }

        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &ReportItem) -> fmt::Result {
    writeln!(
        f,
        "<section class=\"item\" id=\"{}\">",
        escape_html(&item.id)
    )?;
    writeln!(f, "<h2>{}</h2>", escape_html(&item.label))?;
    writeln!(
        f,
        "<details><summary>Patch source</summary><pre class=\"source\">{}</pre></details>",
        escape_html(&item.patch_source)
    )?;
    writeln!(f, "<div class=\"panes\">")?;
    write_pane(f, &item.old_file, "old", &item.diff.old_pane, Side::Old)?;
    write_pane(f, &item.new_file, "new", &item.diff.new_pane, Side::New)?;
    writeln!(f, "</div>")?;
    writeln!(f, "</section>")
}

fn write_pane(
    f: &mut fmt::Formatter<'_>,
    file: &str,
    class: &str,
    rows: &[RenderedRow],
    side: Side,
) -> fmt::Result {
    writeln!(f, "<table class=\"pane {}\">", class)?;
    writeln!(f, "<caption>{} ({})</caption>", escape_html(file), class)?;
    for row in rows {
        let number = match side {
            Side::Old => row.old_number,
            Side::New => row.new_number,
        };
        let number = number.map(|n| n.to_string()).unwrap_or_default();
        writeln!(
            f,
            "<tr class=\"{}\"><td class=\"ln\">{}</td><td>{}</td></tr>",
            row_class(row.kind),
            number,
            row_markup(row, side)
        )?;
    }
    writeln!(f, "</table>")
}

fn row_class(kind: RowKind) -> &'static str {
    match kind {
        RowKind::Unchanged => "unchanged",
        RowKind::Deleted => "deleted",
        RowKind::Inserted => "inserted",
        RowKind::Modified => "modified",
        RowKind::Placeholder => "placeholder",
    }
}

/// Escaped row text with changed segments highlighted for `side`.
fn row_markup(row: &RenderedRow, side: Side) -> String {
    let class = match side {
        Side::Old => "del",
        Side::New => "ins",
    };
    let mut out = String::new();
    for segment in &row.segments {
        let text = escape_html(&segment.text);
        if segment.changed {
            out.push_str(&format!("<span class=\"{}\">{}</span>", class, text));
        } else {
            out.push_str(&text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchdrift_core::align::align;
    use patchdrift_core::config::AnalysisConfig;
    use patchdrift_core::report::{MethodPair, SkipReason};
    use patchdrift_core::token_diff::DiffSegment;
    use patchdrift_core::types::{PatchDeclaration, TreeKind};

    fn patch() -> PatchDeclaration {
        PatchDeclaration {
            declaring_file: "Patches.cs".to_string(),
            declaring_type: "Mod.P".to_string(),
            declaring_member: "Prefix".to_string(),
            declaring_line: 3,
            target_class: "Pawn".to_string(),
            target_member: "Kill".to_string(),
            source: "static bool Prefix() => a < b;".to_string(),
        }
    }

    fn report(old: &str, new: &str) -> Report {
        let mut report = Report::new(2);
        report.push_item(
            patch(),
            MethodPair {
                old_file: "Verse/Pawn.cs".to_string(),
                new_file: "Verse/Pawn.cs".to_string(),
                old_source: old.to_string(),
                new_source: new.to_string(),
            },
            align(old, new, &AnalysisConfig::default()),
        );
        report
    }

    mod escaping {
        use super::*;

        #[test]
        fn escapes_markup_characters() {
            assert_eq!(
                escape_html(r#"if (a < b && c > "d") x = 'e';"#),
                "if (a &lt; b &amp;&amp; c &gt; &quot;d&quot;) x = &#39;e&#39;;"
            );
        }

        #[test]
        fn plain_text_is_untouched() {
            assert_eq!(escape_html("int value = 42;"), "int value = 42;");
        }

        #[test]
        fn generic_types_in_source_are_escaped() {
            let html = HtmlReport::new(&report(
                "List<int> xs = new List<int>();\n",
                "List<long> xs = new List<long>();\n",
            ))
            .to_string();
            assert!(!html.contains("List<int>"));
            assert!(html.contains("List&lt;"));
            assert!(html.contains("a &lt; b"));
        }
    }

    mod panes {
        use super::*;

        #[test]
        fn changed_segments_are_wrapped_per_side() {
            let row = RenderedRow {
                old_number: Some(1),
                new_number: Some(1),
                kind: RowKind::Modified,
                pair: Some(0),
                segments: vec![
                    DiffSegment::unchanged("x = "),
                    DiffSegment::changed("<1>"),
                ],
            };
            assert_eq!(
                row_markup(&row, Side::Old),
                "x = <span class=\"del\">&lt;1&gt;</span>"
            );
            assert_eq!(
                row_markup(&row, Side::New),
                "x = <span class=\"ins\">&lt;1&gt;</span>"
            );
        }

        #[test]
        fn both_panes_have_the_same_row_count() {
            let html = HtmlReport::new(&report(
                "{\n    a();\n    int value = 42;\n}\n",
                "{\n    int value = 100;\n    b();\n}\n",
            ))
            .to_string();
            let tables: Vec<&str> = html.split("<table").skip(1).collect();
            assert_eq!(tables.len(), 2);
            let rows = |t: &str| t.matches("<tr").count();
            assert_eq!(rows(tables[0]), rows(tables[1]));
        }

        #[test]
        fn placeholder_rows_have_no_line_number() {
            let html = HtmlReport::new(&report("{\n    a();\n}\n", "{\n}\n")).to_string();
            assert!(html.contains("<tr class=\"placeholder\"><td class=\"ln\"></td><td></td></tr>"));
            assert!(html.contains("<span class=\"del\">    a();</span>"));
        }
    }

    mod document {
        use super::*;

        #[test]
        fn sections_are_linked_by_id() {
            let html = HtmlReport::new(&report("int a = 1;\n", "int a = 2;\n")).to_string();
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("<section class=\"item\" id=\"patch-1\">"));
            assert!(html.contains(
                "<a href=\"#patch-1\">Patches.cs:Prefix -&gt; Verse/Pawn.cs:Kill</a>"
            ));
        }

        #[test]
        fn skipped_patches_are_listed() {
            let mut report = Report::new(1);
            report.record_skip(
                patch(),
                SkipReason::TargetAmbiguous {
                    tree: TreeKind::Old,
                    name: "Pawn".to_string(),
                    candidates: vec!["A.Pawn".to_string(), "B.Pawn".to_string()],
                },
            );
            let html = HtmlReport::new(&report).to_string();
            assert!(html.contains("<h2>Skipped patches</h2>"));
            assert!(html.contains("A.Pawn, B.Pawn"));
            assert!(!html.contains("<nav>"));
        }
    }
}
