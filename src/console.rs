//! Plain-text tables printed after a run.

use std::path::PathBuf;

use crate::pipeline::processing::normalize::StandardizedRecord;
use crate::pipeline::report::{Partition, QualitySummary};
use crate::pipeline::PipelineResult;
use crate::types::Table;

/// Render rows as a right-aligned text table with a leading row index column.
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let index_width = rows.len().saturating_sub(1).to_string().len();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (name, width) in header.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", name, width = *width));
    }
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("{:<width$}", i, width = index_width));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", cell, width = *width));
        }
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

/// Standardized preview: raw and standardized date and amount per row.
pub fn format_standardized_preview(table: &Table<StandardizedRecord>) -> String {
    let c = &table.columns;
    let rows: Vec<Vec<String>> = table
        .records
        .iter()
        .map(|r| {
            vec![
                r.raw.get(c.customer_id).to_string(),
                r.raw.get(c.transaction_date).to_string(),
                r.transaction_date_text(),
                r.raw.get(c.amount).to_string(),
                r.amount_text(),
                r.amount_parse_error().to_string(),
            ]
        })
        .collect();

    let mut out = String::from("=== Standardized Preview ===\n");
    out.push_str(&render_table(
        &[
            "customer_id",
            "transaction_date",
            "transaction_date_std",
            "amount",
            "amount_std",
            "amount_parse_error",
        ],
        &rows,
    ));
    out
}

/// Row counts followed by every invalid record's customer and issues.
pub fn format_validation_summary(summary: &QualitySummary, partition: &Partition) -> String {
    let customer_id = partition.columns.customer_id;
    let rows: Vec<Vec<String>> = partition
        .invalid
        .iter()
        .map(|r| vec![r.record.raw.get(customer_id).to_string(), r.dq_issues()])
        .collect();

    let mut out = String::from("\n=== Validation Summary ===\n");
    out.push_str(&format!("Total rows: {}\n", summary.total));
    out.push_str(&format!("Valid rows: {}\n", summary.valid));
    out.push_str(&format!("Invalid rows: {}\n", summary.invalid));
    out.push_str("\nInvalid records and reasons:\n");
    out.push_str(&render_table(&["customer_id", "dq_issues"], &rows));
    out
}

pub fn format_saved(written: &[PathBuf]) -> String {
    let mut out = String::from("\n");
    for path in written {
        out.push_str(&format!("Saved: {}\n", path.display()));
    }
    out
}

pub fn print_standardized_preview(result: &PipelineResult) {
    print!("{}", format_standardized_preview(&result.standardized));
}

pub fn print_validation_summary(result: &PipelineResult) {
    print!("{}", format_validation_summary(&result.summary, &result.partition));
}

pub fn print_saved(result: &PipelineResult) {
    print!("{}", format_saved(&result.written));
}
