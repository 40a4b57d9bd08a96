/// Fixed locations and column names shared across the pipeline stages.
/// The pipeline reads and writes only these paths; tests redirect them through
/// `PipelinePaths` rather than changing the constants.

// Input locations
pub const INPUT_PATH: &str = "data/raw_data1.csv";
pub const SCHEMA_PATH: &str = "data/schema.json";

// Output locations
pub const OUTPUT_DIR: &str = "outputs";
pub const STANDARDIZED_PREVIEW_FILE: &str = "standardized_preview.csv";
pub const CLEANED_DATA_FILE: &str = "cleaned_data.csv";
pub const INVALID_RECORDS_FILE: &str = "invalid_records.csv";
pub const REPORT_HTML_FILE: &str = "data_quality_report.html";

// Optional configuration file, read from the working directory
pub const CONFIG_PATH: &str = "config.toml";

// Source columns every input table must carry
pub const CUSTOMER_ID: &str = "customer_id";
pub const TRANSACTION_DATE: &str = "transaction_date";
pub const AMOUNT: &str = "amount";
pub const CURRENCY: &str = "currency";
pub const STATUS: &str = "status";
pub const COUNTRY: &str = "country";

pub const REQUIRED_COLUMNS: [&str; 6] = [CUSTOMER_ID, TRANSACTION_DATE, AMOUNT, CURRENCY, STATUS, COUNTRY];

// Derived columns appended by the standardize and validate stages
pub const TRANSACTION_DATE_STD: &str = "transaction_date_std";
pub const AMOUNT_STD: &str = "amount_std";
pub const AMOUNT_PARSE_ERROR: &str = "amount_parse_error";
pub const DQ_ISSUES: &str = "dq_issues";

/// Output artifact file names in the order they are listed in the HTML report
pub fn output_artifacts() -> Vec<&'static str> {
    vec![
        STANDARDIZED_PREVIEW_FILE,
        CLEANED_DATA_FILE,
        INVALID_RECORDS_FILE,
        REPORT_HTML_FILE,
    ]
}
