use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants;
use crate::error::{QualityError, Result};
use crate::pipeline::processing::normalize::StandardizedRecord;
use crate::pipeline::processing::quality_gate::AssessedRecord;
use crate::types::Columns;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn standardized_header(columns: &Columns) -> Vec<&str> {
    let mut header: Vec<&str> = columns.names().iter().map(String::as_str).collect();
    header.extend([
        constants::TRANSACTION_DATE_STD,
        constants::AMOUNT_STD,
        constants::AMOUNT_PARSE_ERROR,
    ]);
    header
}

fn standardized_fields(record: &StandardizedRecord) -> Vec<String> {
    let mut fields = record.raw.values.clone();
    fields.push(record.transaction_date_text());
    fields.push(record.amount_text());
    fields.push(record.amount_parse_error().to_string());
    fields
}

/// Write rows through `emit` into a UTF-8 CSV file that starts with a BOM.
fn write_bom_csv<F>(path: &Path, header: &[&str], emit: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<BufWriter<File>>) -> Result<()>,
{
    let file = File::create(path).map_err(|e| QualityError::output(path, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM).map_err(|e| QualityError::output(path, e))?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header)?;
    emit(&mut writer)?;
    writer.flush().map_err(|e| QualityError::output(path, e))?;
    Ok(())
}

/// Every input row with the original columns plus the standardized ones
pub fn write_standardized(path: &Path, columns: &Columns, records: &[StandardizedRecord]) -> Result<()> {
    write_bom_csv(path, &standardized_header(columns), |writer| {
        for record in records {
            writer.write_record(standardized_fields(record))?;
        }
        Ok(())
    })
}

/// Assessed rows with the standardized columns and `dq_issues`
pub fn write_assessed(path: &Path, columns: &Columns, records: &[AssessedRecord]) -> Result<()> {
    let mut header = standardized_header(columns);
    header.push(constants::DQ_ISSUES);

    write_bom_csv(path, &header, |writer| {
        for record in records {
            let mut fields = standardized_fields(&record.record);
            fields.push(record.dq_issues());
            writer.write_record(fields)?;
        }
        Ok(())
    })
}
