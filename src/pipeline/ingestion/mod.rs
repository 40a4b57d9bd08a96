// Ingestion: read the transaction table into memory as text

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::IngestError;
use crate::observability::metrics;
use crate::types::{Columns, RawRecord, Table};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Read a comma-delimited table from `path`.
///
/// Every cell is kept as text. Short rows are padded with empty cells; rows
/// with more cells than the header are rejected.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_table(path: &Path) -> Result<Table<RawRecord>, IngestError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IngestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let table = parse_table(&content).map_err(|e| match e {
        IngestError::Empty { .. } => IngestError::Empty {
            path: path.to_path_buf(),
        },
        other => other,
    })?;

    info!(
        rows = table.len(),
        columns = table.columns.len(),
        "Ingested transaction table"
    );
    metrics::ingest::rows_read(table.len());
    Ok(table)
}

/// Parse delimited text that has already been read into memory.
pub fn parse_table(content: &str) -> Result<Table<RawRecord>, IngestError> {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(record) => record?,
        None => {
            return Err(IngestError::Empty {
                path: Default::default(),
            })
        }
    };
    let names: Vec<String> = header.iter().map(str::to_string).collect();
    let width = names.len();
    let columns = Columns::resolve(names).map_err(IngestError::MissingColumns)?;

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() > width {
            return Err(IngestError::RaggedRow {
                line,
                expected: width,
                found: row.len(),
            });
        }

        let mut values: Vec<String> = row.iter().map(str::to_string).collect();
        if values.len() < width {
            debug!(line, found = values.len(), expected = width, "Padding short row");
            values.resize(width, String::new());
        }
        records.push(RawRecord::new(line, values));
    }

    Ok(Table::new(columns, records))
}
