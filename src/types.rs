use crate::constants;

/// Header of the ingested table along with the positions of the columns the
/// pipeline reads by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    names: Vec<String>,
    pub customer_id: usize,
    pub transaction_date: usize,
    pub amount: usize,
    pub currency: usize,
    pub status: usize,
    pub country: usize,
}

impl Columns {
    /// Resolve the required columns in a header row. Returns the names of the
    /// required columns that are missing when resolution fails.
    pub fn resolve(names: Vec<String>) -> Result<Self, Vec<String>> {
        let position = |wanted: &str| names.iter().position(|n| n == wanted);

        let missing: Vec<String> = constants::REQUIRED_COLUMNS
            .iter()
            .filter(|c| position(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        // every lookup below succeeded in the check above
        let at = |wanted: &str| position(wanted).unwrap_or_default();
        let customer_id = at(constants::CUSTOMER_ID);
        let transaction_date = at(constants::TRANSACTION_DATE);
        let amount = at(constants::AMOUNT);
        let currency = at(constants::CURRENCY);
        let status = at(constants::STATUS);
        let country = at(constants::COUNTRY);

        Ok(Self {
            names,
            customer_id,
            transaction_date,
            amount,
            currency,
            status,
            country,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One input row, verbatim, aligned with `Columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line of the record in the source file (header is line 1)
    pub line: u64,
    pub values: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, values: Vec<String>) -> Self {
        Self { line, values }
    }

    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

/// An ordered set of records sharing one header.
#[derive(Debug, Clone)]
pub struct Table<R> {
    pub columns: Columns,
    pub records: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(columns: Columns, records: Vec<R>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Transform every record while keeping the header and row order.
    pub fn map<T>(self, f: impl FnMut(R) -> T) -> Table<T> {
        Table {
            columns: self.columns,
            records: self.records.into_iter().map(f).collect(),
        }
    }
}
