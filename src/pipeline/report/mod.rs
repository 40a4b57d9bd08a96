// Report: partition assessed rows, summarize them and persist the artifacts

pub mod csv_out;
pub mod html;

use std::collections::HashMap;

use crate::observability::metrics;
use crate::pipeline::processing::quality_gate::AssessedRecord;
use crate::types::{Columns, Table};

/// Assessed rows split by validation outcome, original order kept on each side
#[derive(Debug, Clone)]
pub struct Partition {
    pub columns: Columns,
    pub valid: Vec<AssessedRecord>,
    pub invalid: Vec<AssessedRecord>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn summary(&self) -> QualitySummary {
        QualitySummary::from_counts(self.total(), self.valid.len(), self.invalid.len())
    }

    /// Issue tally over the invalid rows
    pub fn issue_counts(&self) -> Vec<IssueCount> {
        let issues: Vec<String> = self.invalid.iter().map(AssessedRecord::dq_issues).collect();
        issue_counts(issues.iter().map(String::as_str))
    }
}

pub fn partition(table: Table<AssessedRecord>) -> Partition {
    let (valid, invalid): (Vec<_>, Vec<_>) = table.records.into_iter().partition(AssessedRecord::is_valid);
    metrics::quality::rows_partitioned(valid.len(), invalid.len());
    Partition {
        columns: table.columns,
        valid,
        invalid,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Share of invalid rows in percent, 0 for an empty table
    pub invalid_pct: f64,
}

impl QualitySummary {
    pub fn from_counts(total: usize, valid: usize, invalid: usize) -> Self {
        let invalid_pct = if total == 0 {
            0.0
        } else {
            invalid as f64 / total as f64 * 100.0
        };
        Self {
            total,
            valid,
            invalid,
            invalid_pct,
        }
    }

    pub fn invalid_pct_text(&self) -> String {
        format!("{:.2}", self.invalid_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

/// Count rule codes across `dq_issues` values.
///
/// Values are split on `;` and trimmed; empty tokens are skipped. The result
/// is ordered by count, highest first. Codes with equal counts stay in the
/// order they were first seen, which callers should not rely on.
pub fn issue_counts<'a>(dq_issues: impl IntoIterator<Item = &'a str>) -> Vec<IssueCount> {
    let mut counts: Vec<IssueCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for cell in dq_issues {
        for token in cell.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            match index.get(token) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(token.to_string(), counts.len());
                    counts.push(IssueCount {
                        issue: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::parse_table;
    use crate::pipeline::processing::normalize::standardize;
    use crate::pipeline::processing::quality_gate::validate;
    use crate::schema::Schema;

    #[test]
    fn test_issue_counts_orders_by_frequency() {
        let counts = issue_counts(["invalid_date;missing_country", "missing_country"]);
        assert_eq!(
            counts,
            vec![
                IssueCount {
                    issue: "missing_country".into(),
                    count: 2
                },
                IssueCount {
                    issue: "invalid_date".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_issue_counts_trims_and_skips_empty_tokens() {
        let counts = issue_counts(["", " invalid_status ; ", ";;invalid_status"]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].issue, "invalid_status");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_summary_handles_empty_table() {
        let summary = QualitySummary::from_counts(0, 0, 0);
        assert_eq!(summary.invalid_pct, 0.0);
        assert_eq!(summary.invalid_pct_text(), "0.00");
    }

    #[test]
    fn test_summary_percentage() {
        let summary = QualitySummary::from_counts(3, 2, 1);
        assert_eq!(summary.invalid_pct_text(), "33.33");
    }

    #[test]
    fn test_partition_is_total_disjoint_and_ordered() {
        let table = parse_table(
            "customer_id,transaction_date,amount,currency,status,country\n\
             C001,2024-01-01,1,USD,completed,US\n\
             C002,bad,1,USD,completed,US\n\
             C003,2024-01-03,1,USD,completed,US\n\
             C004,2024-01-04,x,USD,completed,\n",
        )
        .unwrap();
        let schema = Schema::new(r"C\d{3}", 0.0, vec!["USD".into()], vec!["completed".into()]).unwrap();
        let split = partition(validate(standardize(table), &schema));

        assert_eq!(split.total(), 4);
        let ids = |rows: &[AssessedRecord]| -> Vec<String> {
            rows.iter().map(|r| r.record.raw.get(0).to_string()).collect()
        };
        assert_eq!(ids(&split.valid), vec!["C001", "C003"]);
        assert_eq!(ids(&split.invalid), vec!["C002", "C004"]);
        assert!(split.valid.iter().all(|r| r.dq_issues().is_empty()));
        assert!(split.invalid.iter().all(|r| !r.dq_issues().is_empty()));

        let counts = split.issue_counts();
        let total_tokens: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total_tokens, 3);
        assert_eq!(counts[0].count, 1);
    }
}
