//! CSV row reading.
//!
//! Header names are trimmed and upper-cased so `content`, ` Content ` and
//! `CONTENT` all land on the same column. Cell values are trimmed.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use crate::domain::Row;

/// Errors that can occur while reading rows
#[derive(Debug, Error)]
pub enum RowReadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no CONTENT column (headers: {0:?})")]
    MissingContentColumn(Vec<String>),
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_uppercase()
}

/// Read every row from a CSV file
pub fn read_rows(path: &Path) -> Result<Vec<Row>, RowReadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_rows_from(file)
}

/// Read every row from any reader producing UTF-8 CSV
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<Row>, RowReadError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize_header).collect();
    if !headers.iter().any(|h| h == "CONTENT") {
        return Err(RowReadError::MissingContentColumn(headers));
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(Row::from_fields(&fields));
    }

    Ok(rows)
}
