//! HTML data quality report.
//!
//! Produces one standalone page with embedded CSS: summary counts, the issue
//! tally, a preview of the first invalid rows and the list of artifacts.

use chrono::NaiveDateTime;

use super::{IssueCount, Partition, QualitySummary};
use crate::constants;

/// Everything the page shows, gathered before rendering
pub struct ReportContext<'a> {
    pub generated_at: NaiveDateTime,
    pub summary: QualitySummary,
    pub issues: &'a [IssueCount],
    pub partition: &'a Partition,
    pub preview_rows: usize,
    /// Output directory as shown in the artifact list
    pub output_dir: &'a str,
}

const CSS_STYLES: &str = "    body { font-family: Arial, sans-serif; margin: 24px; }
    h1 { margin-bottom: 4px; }
    .muted { color: #666; margin-top: 0; }
    .card { border: 1px solid #ddd; border-radius: 10px; padding: 16px; margin: 16px 0; }
    table { border-collapse: collapse; }
    th { background: #f3f3f3; }
";

pub fn render_html(ctx: &ReportContext<'_>) -> String {
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <title>Data Quality Report</title>\n");
    html.push_str("  <style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("  </style>\n</head>\n<body>\n");

    html.push_str("  <h1>Data Quality Report</h1>\n");
    html.push_str(&format!(
        "  <p class=\"muted\">Generated: {}</p>\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    // Summary
    let s = &ctx.summary;
    html.push_str("\n  <div class=\"card\">\n    <h2>Summary</h2>\n    <ul>\n");
    html.push_str(&format!("      <li><b>Total rows:</b> {}</li>\n", s.total));
    html.push_str(&format!("      <li><b>Valid rows:</b> {}</li>\n", s.valid));
    html.push_str(&format!("      <li><b>Invalid rows:</b> {}</li>\n", s.invalid));
    html.push_str(&format!("      <li><b>Invalid %:</b> {}%</li>\n", s.invalid_pct_text()));
    html.push_str("    </ul>\n  </div>\n");

    html.push_str("\n  <div class=\"card\">\n    <h2>Top Issues</h2>\n    ");
    html.push_str(&issues_table(ctx.issues));
    html.push_str("\n  </div>\n");

    html.push_str(&format!(
        "\n  <div class=\"card\">\n    <h2>Invalid Records Preview (first {})</h2>\n",
        ctx.preview_rows
    ));
    html.push_str(&invalid_preview_table(ctx.partition, ctx.preview_rows));
    html.push_str("  </div>\n");

    html.push_str("\n  <div class=\"card\">\n    <h2>Output Files</h2>\n    <ul>\n");
    for file in constants::output_artifacts() {
        html.push_str(&format!(
            "      <li>{}/{}</li>\n",
            escape_html(ctx.output_dir),
            file
        ));
    }
    html.push_str("    </ul>\n  </div>\n</body>\n</html>\n");

    html
}

fn issues_table(issues: &[IssueCount]) -> String {
    let mut table =
        String::from("<table border='1' cellpadding='6' cellspacing='0'><tr><th>Issue</th><th>Count</th></tr>");
    for issue in issues {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&issue.issue),
            issue.count
        ));
    }
    table.push_str("</table>");
    table
}

/// First `limit` invalid rows with every column the CSV artifacts carry
fn invalid_preview_table(partition: &Partition, limit: usize) -> String {
    let mut header: Vec<&str> = partition.columns.names().iter().map(String::as_str).collect();
    header.extend([
        constants::TRANSACTION_DATE_STD,
        constants::AMOUNT_STD,
        constants::AMOUNT_PARSE_ERROR,
        constants::DQ_ISSUES,
    ]);

    let mut table = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n");
    for name in &header {
        table.push_str(&format!("      <th>{}</th>\n", escape_html(name)));
    }
    table.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in partition.invalid.iter().take(limit) {
        table.push_str("    <tr>\n");
        let derived = [
            row.record.transaction_date_text(),
            row.record.amount_text(),
            row.record.amount_parse_error().to_string(),
            row.dq_issues(),
        ];
        for cell in row.record.raw.values.iter().chain(derived.iter()) {
            table.push_str(&format!("      <td>{}</td>\n", escape_html(cell)));
        }
        table.push_str("    </tr>\n");
    }

    table.push_str("  </tbody>\n</table>\n");
    table
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::parse_table;
    use crate::pipeline::processing::normalize::standardize;
    use crate::pipeline::processing::quality_gate::validate;
    use crate::pipeline::report::partition;
    use crate::schema::Schema;
    use chrono::NaiveDate;

    fn sample_partition(rows: &str) -> Partition {
        let table = parse_table(&format!(
            "customer_id,transaction_date,amount,currency,status,country\n{rows}"
        ))
        .unwrap();
        let schema = Schema::new(r"C\d{3}", 0.0, vec!["USD".into()], vec!["completed".into()]).unwrap();
        partition(validate(standardize(table), &schema))
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 5))
            .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_report_contains_summary_and_issues() {
        let split = sample_partition("C001,2024-01-01,1,USD,completed,US\nC002,2024-01-02,-3,USD,completed,US\n");
        let issues = split.issue_counts();
        let html = render_html(&ReportContext {
            generated_at: generated_at(),
            summary: split.summary(),
            issues: &issues,
            partition: &split,
            preview_rows: 20,
            output_dir: "outputs",
        });

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Generated: 2024-03-01 09:30:05"));
        assert!(html.contains("<li><b>Total rows:</b> 2</li>"));
        assert!(html.contains("<li><b>Invalid %:</b> 50.00%</li>"));
        assert!(html.contains("<tr><td>negative_amount</td><td>1</td></tr>"));
        assert!(html.contains("<li>outputs/invalid_records.csv</li>"));
        assert!(html.contains("<li>outputs/data_quality_report.html</li>"));
    }

    #[test]
    fn test_preview_escapes_cells_and_respects_limit() {
        let split = sample_partition(
            "<script>,2024-01-01,1,USD,completed,US\nC0x,2024-01-01,1,USD,completed,US\nC0y,2024-01-01,1,USD,completed,US\n",
        );
        let html = invalid_preview_table(&split, 2);

        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<td>C0x</td>"));
        assert!(!html.contains("<td>C0y</td>"));
        assert!(html.contains("<th>dq_issues</th>"));
    }
}
