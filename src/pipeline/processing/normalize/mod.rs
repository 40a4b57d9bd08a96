use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, info};

use crate::observability::metrics;
use crate::types::{RawRecord, Table};

/// Characters dropped from raw amounts: everything but digits, `.` and `-`.
static AMOUNT_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]").expect("static regex"));

/// Why a raw amount could not be standardized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountParseError {
    NotNumeric,
}

impl AmountParseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountParseError::NotNumeric => "not_numeric",
        }
    }
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standardized amount: a value, or the reason there is none.
pub type AmountStd = Result<f64, AmountParseError>;

/// A raw record with its standardized date and amount attached
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedRecord {
    pub raw: RawRecord,
    pub transaction_date_std: Option<NaiveDate>,
    pub amount: AmountStd,
}

impl StandardizedRecord {
    pub fn amount_std(&self) -> Option<f64> {
        self.amount.ok()
    }

    /// Error code for the amount column, empty when the amount parsed
    pub fn amount_parse_error(&self) -> &'static str {
        match &self.amount {
            Ok(_) => "",
            Err(e) => e.as_str(),
        }
    }

    /// `YYYY-MM-DD`, or empty when the date did not parse
    pub fn transaction_date_text(&self) -> String {
        self.transaction_date_std
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Amount as written to CSV, see `format_amount`
    pub fn amount_text(&self) -> String {
        self.amount_std().map(format_amount).unwrap_or_default()
    }
}

/// Shortest round-trip text, switching to exponent form (`1e+20`, `1e-05`)
/// outside `[1e-4, 1e16)`.
pub fn format_amount(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        value.to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        exponent_form(value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// `{:e}` writes `1e20`; the exponent gets an explicit sign and two digits
fn exponent_form(value: f64) -> String {
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            Err(_) => text,
        },
        None => text,
    }
}

/// Strip everything but digits, `.` and `-`, then parse what is left.
///
/// Currency symbols, thousands separators and whitespace are discarded; sign
/// and decimal point survive.
pub fn normalize_amount(raw: &str) -> AmountStd {
    let stripped = AMOUNT_NOISE.replace_all(raw, "");
    match stripped.as_ref() {
        "" | "." | "-" => Err(AmountParseError::NotNumeric),
        s => s.parse::<f64>().map_err(|_| AmountParseError::NotNumeric),
    }
}

// Date-only formats with a four digit year, tried in order. Day-first
// readings come before their month-first fallbacks.
const FULL_YEAR_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d %b, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%a, %d %b %Y",
];

const SHORT_YEAR_DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%m/%d/%y", "%m-%d-%y", "%d-%b-%y", "%d %b %y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a transaction date, preferring day-first readings of ambiguous
/// numeric dates (`01/02/2024` is the 1st of February).
///
/// Returns `None` for anything that cannot be read as a calendar date.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // %Y accepts one to four digits, so reject implausible years here and let
    // the two digit year formats handle them
    let full_year = FULL_YEAR_DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| d.year() >= 1000);
    if full_year.is_some() {
        return full_year;
    }

    let with_time = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .find(|d| d.year() >= 1000);
    if with_time.is_some() {
        return with_time;
    }

    SHORT_YEAR_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Attach the standardized date and amount to every record. No record is
/// dropped.
pub fn standardize(table: Table<RawRecord>) -> Table<StandardizedRecord> {
    let date_col = table.columns.transaction_date;
    let amount_col = table.columns.amount;

    let mut unparsed_dates = 0usize;
    let mut bad_amounts = 0usize;

    let standardized = table.map(|raw| {
        let transaction_date_std = normalize_date(raw.get(date_col));
        let amount = normalize_amount(raw.get(amount_col));

        if transaction_date_std.is_none() {
            unparsed_dates += 1;
            metrics::standardize::date_unparsed();
            debug!(line = raw.line, value = raw.get(date_col), "Unparsable transaction date");
        }
        if amount.is_err() {
            bad_amounts += 1;
            metrics::standardize::amount_not_numeric();
            debug!(line = raw.line, value = raw.get(amount_col), "Non-numeric amount");
        }

        StandardizedRecord {
            raw,
            transaction_date_std,
            amount,
        }
    });

    info!(
        rows = standardized.len(),
        unparsed_dates, bad_amounts, "Standardized dates and amounts"
    );
    standardized
}
