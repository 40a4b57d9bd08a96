use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use crate::error::SchemaError;

// Shape of the schema document on disk. Only the keys the quality rules read
// are declared; everything else in the document is ignored.
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    customer_id: PatternRule,
    amount: MinimumRule,
    currency: EnumRule,
    status: EnumRule,
}

#[derive(Debug, Deserialize)]
struct PatternRule {
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct MinimumRule {
    minimum: f64,
}

#[derive(Debug, Deserialize)]
struct EnumRule {
    #[serde(rename = "enum")]
    values: Vec<String>,
}

/// Validation rules for one run, compiled once and read-only afterwards
#[derive(Debug, Clone)]
pub struct Schema {
    customer_id_pattern: Regex,
    pub amount_minimum: f64,
    pub currencies: Vec<String>,
    pub statuses: Vec<String>,
}

impl Schema {
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SchemaError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SchemaError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let schema = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            currencies = schema.currencies.len(),
            statuses = schema.statuses.len(),
            "Loaded validation schema"
        );
        Ok(schema)
    }

    pub fn from_json(content: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(content)?;
        let p = document.properties;
        Self::new(&p.customer_id.pattern, p.amount.minimum, p.currency.values, p.status.values)
    }

    pub fn new(
        customer_id_pattern: &str,
        amount_minimum: f64,
        currencies: Vec<String>,
        statuses: Vec<String>,
    ) -> Result<Self, SchemaError> {
        // anchor both ends so the pattern has to cover the whole value
        let anchored = format!("^(?:{})$", customer_id_pattern);
        let customer_id_pattern = Regex::new(&anchored).map_err(|source| SchemaError::InvalidPattern {
            pattern: customer_id_pattern.to_string(),
            source,
        })?;

        Ok(Self {
            customer_id_pattern,
            amount_minimum,
            currencies,
            statuses,
        })
    }

    pub fn customer_id_matches(&self, value: &str) -> bool {
        self.customer_id_pattern.is_match(value)
    }

    pub fn currency_allowed(&self, value: &str) -> bool {
        self.currencies.iter().any(|c| c == value)
    }

    pub fn status_allowed(&self, value: &str) -> bool {
        self.statuses.iter().any(|s| s == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCHEMA_JSON: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "customer_id": {"type": "string", "pattern": "C\\d{3}"},
            "transaction_date": {"type": "string"},
            "amount": {"type": "number", "minimum": 0},
            "currency": {"enum": ["USD", "EUR", "GBP"]},
            "status": {"enum": ["completed", "pending", "failed"]}
        }
    }"#;

    #[test]
    fn test_from_json_reads_rules() {
        let schema = Schema::from_json(SCHEMA_JSON).unwrap();
        assert_eq!(schema.amount_minimum, 0.0);
        assert!(schema.currency_allowed("EUR"));
        assert!(!schema.currency_allowed("eur"));
        assert!(schema.status_allowed("pending"));
        assert!(!schema.status_allowed(" pending"));
    }

    #[test]
    fn test_pattern_must_match_whole_value() {
        let schema = Schema::from_json(SCHEMA_JSON).unwrap();
        assert!(schema.customer_id_matches("C001"));
        assert!(!schema.customer_id_matches("C0001"));
        assert!(!schema.customer_id_matches("XC001"));
        assert!(!schema.customer_id_matches(""));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_group() {
        let schema = Schema::new("A\\d|B\\d", 0.0, vec![], vec![]).unwrap();
        assert!(schema.customer_id_matches("B1"));
        assert!(!schema.customer_id_matches("A1x"));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let json = r#"{"properties": {"customer_id": {"pattern": "x"}}}"#;
        assert!(matches!(Schema::from_json(json), Err(SchemaError::Json(_))));
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let err = Schema::new("C(\\d", 0.0, vec![], vec![]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Schema::load(&dir.path().join("schema.json")).unwrap_err();
        assert!(matches!(err, SchemaError::NotFound { .. }));
    }
}
