use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the transaction table. These stop the run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read input file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file '{}' has no header row", path.display())]
    Empty { path: PathBuf },

    #[error("input file is not valid delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at most {expected} fields, found {found}")]
    RaggedRow { line: u64, expected: usize, found: usize },

    #[error("input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Failures while loading the validation schema. These stop the run.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("schema file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read schema file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("customer_id pattern '{pattern}' does not compile: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Error, Debug)]
pub enum QualityError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QualityError {
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QualityError::Output {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, QualityError>;
