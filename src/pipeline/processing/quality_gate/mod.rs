use std::fmt;
use tracing::{debug, info};

use crate::observability::metrics;
use crate::pipeline::processing::normalize::StandardizedRecord;
use crate::schema::Schema;
use crate::types::{Columns, Table};

/// Codes recorded in `dq_issues` when a rule is violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCode {
    CustomerIdPattern,
    InvalidDate,
    InvalidAmount,
    NegativeAmount,
    InvalidCurrency,
    InvalidStatus,
    MissingCountry,
}

impl RuleCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::CustomerIdPattern => "pattern:customer_id",
            RuleCode::InvalidDate => "invalid_date",
            RuleCode::InvalidAmount => "invalid_amount",
            RuleCode::NegativeAmount => "negative_amount",
            RuleCode::InvalidCurrency => "invalid_currency",
            RuleCode::InvalidStatus => "invalid_status",
            RuleCode::MissingCountry => "missing_country",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule gets to look at for one row
pub struct RuleInput<'a> {
    pub record: &'a StandardizedRecord,
    pub columns: &'a Columns,
    pub schema: &'a Schema,
}

impl RuleInput<'_> {
    fn raw(&self, column: usize) -> &str {
        self.record.raw.get(column)
    }
}

/// Returns true when the row violates the rule
type RuleCheck = fn(&RuleInput<'_>) -> bool;

/// Rules in the order their codes appear in `dq_issues`. Each check is
/// independent of the others.
pub const RULES: [(RuleCode, RuleCheck); 7] = [
    (RuleCode::CustomerIdPattern, customer_id_mismatch),
    (RuleCode::InvalidDate, date_missing),
    (RuleCode::InvalidAmount, amount_missing),
    (RuleCode::NegativeAmount, amount_below_minimum),
    (RuleCode::InvalidCurrency, currency_not_allowed),
    (RuleCode::InvalidStatus, status_not_allowed),
    (RuleCode::MissingCountry, country_blank),
];

fn customer_id_mismatch(i: &RuleInput<'_>) -> bool {
    !i.schema.customer_id_matches(i.raw(i.columns.customer_id))
}

fn date_missing(i: &RuleInput<'_>) -> bool {
    i.record.transaction_date_std.is_none()
}

fn amount_missing(i: &RuleInput<'_>) -> bool {
    i.record.amount_std().is_none()
}

// only amounts that parsed can be below the minimum
fn amount_below_minimum(i: &RuleInput<'_>) -> bool {
    i.record
        .amount_std()
        .is_some_and(|v| v < i.schema.amount_minimum)
}

fn currency_not_allowed(i: &RuleInput<'_>) -> bool {
    !i.schema.currency_allowed(i.raw(i.columns.currency))
}

fn status_not_allowed(i: &RuleInput<'_>) -> bool {
    !i.schema.status_allowed(i.raw(i.columns.status))
}

fn country_blank(i: &RuleInput<'_>) -> bool {
    i.raw(i.columns.country).trim().is_empty()
}

/// A standardized record with the rules it violated
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedRecord {
    pub record: StandardizedRecord,
    pub issues: Vec<RuleCode>,
}

impl AssessedRecord {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Violated rule codes joined with `;`, empty for a valid row
    pub fn dq_issues(&self) -> String {
        self.issues
            .iter()
            .map(RuleCode::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Evaluate every rule against one record.
pub fn assess(record: &StandardizedRecord, columns: &Columns, schema: &Schema) -> Vec<RuleCode> {
    let input = RuleInput {
        record,
        columns,
        schema,
    };
    RULES
        .iter()
        .filter(|(_, violated)| violated(&input))
        .map(|(code, _)| *code)
        .collect()
}

/// Assess every record of the table against the schema. No record is dropped.
pub fn validate(table: Table<StandardizedRecord>, schema: &Schema) -> Table<AssessedRecord> {
    let columns = table.columns.clone();
    let mut invalid = 0usize;

    let assessed = table.map(|record| {
        let issues = assess(&record, &columns, schema);
        for code in &issues {
            metrics::quality::issue_detected(code.as_str());
        }

        let assessed = AssessedRecord { record, issues };
        if !assessed.is_valid() {
            invalid += 1;
            debug!(
                line = assessed.record.raw.line,
                customer_id = assessed.record.raw.get(columns.customer_id),
                issues = %assessed.dq_issues(),
                "Row failed validation"
            );
        }
        assessed
    });

    info!(rows = assessed.len(), invalid, "Validated rows against schema");
    assessed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::parse_table;
    use crate::pipeline::processing::normalize::standardize;

    const HEADER: &str = "customer_id,transaction_date,amount,currency,status,country";

    fn schema() -> Schema {
        Schema::new(
            r"C\d{3}",
            0.0,
            vec!["USD".into(), "EUR".into()],
            vec!["completed".into(), "pending".into()],
        )
        .unwrap()
    }

    fn assess_row(row: &str) -> String {
        let table = standardize(parse_table(&format!("{HEADER}\n{row}\n")).unwrap());
        let out = validate(table, &schema());
        out.records[0].dq_issues()
    }

    #[test]
    fn test_clean_row_has_no_issues() {
        assert_eq!(assess_row("C001,31/01/2024,$10.00,USD,completed,US"), "");
    }

    #[test]
    fn test_each_rule_reports_its_code() {
        assert_eq!(assess_row("X1,2024-01-01,1,USD,completed,US"), "pattern:customer_id");
        assert_eq!(assess_row("C001,not-a-date,1,USD,completed,US"), "invalid_date");
        assert_eq!(assess_row("C001,2024-01-01,abc,USD,completed,US"), "invalid_amount");
        assert_eq!(assess_row("C001,2024-01-01,-5,USD,completed,US"), "negative_amount");
        assert_eq!(assess_row("C001,2024-01-01,1,JPY,completed,US"), "invalid_currency");
        assert_eq!(assess_row("C001,2024-01-01,1,USD,refunded,US"), "invalid_status");
        assert_eq!(assess_row("C001,2024-01-01,1,USD,completed,\"  \""), "missing_country");
    }

    #[test]
    fn test_all_failures_are_reported_in_rule_order() {
        assert_eq!(
            assess_row("bad,nope,,XXX,???,"),
            "pattern:customer_id;invalid_date;invalid_amount;invalid_currency;invalid_status;missing_country"
        );
    }

    #[test]
    fn test_unparsable_negative_is_only_invalid_amount() {
        assert_eq!(assess_row("C001,2024-01-01,--5,USD,completed,US"), "invalid_amount");
    }

    #[test]
    fn test_currency_is_compared_verbatim() {
        assert_eq!(assess_row("C001,2024-01-01,1,usd,completed,US"), "invalid_currency");
        assert_eq!(assess_row("C001,2024-01-01,1, USD,completed,US"), "invalid_currency");
    }

    #[test]
    fn test_zero_meets_minimum() {
        assert_eq!(assess_row("C001,2024-01-01,0,USD,completed,US"), "");
    }
}
