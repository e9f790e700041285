//! CSV-backed tabular I/O for the four tabular inputs (tank registry,
//! hydrostatic table, stage table, sensor readings). Column matching is by
//! header name so that consumers only need an ordinary
//! `#[derive(Deserialize)]` struct using the exact expected column names.

use crate::error::InputError;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Parse rows from a reader of CSV text with a header row.
///
/// Missing required columns surface as `csv`'s own deserialize error
/// (wrapped into `InputError::Csv`) immediately at load, so the run aborts
/// before any stage executes.
pub fn read_rows<T: DeserializeOwned>(mut source: impl Read) -> Result<Vec<T>, InputError> {
    let mut buf = String::new();
    source.read_to_string(&mut buf)?;
    read_rows_str(&buf)
}

/// Parse rows from an in-memory CSV string (used heavily by tests and by
/// callers that already have the file contents in hand).
pub fn read_rows_str<T: DeserializeOwned>(csv_text: &str) -> Result<Vec<T>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record?;
        rows.push(row);
    }
    Ok(rows)
}
