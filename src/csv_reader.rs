use crate::error::{ChartError, Result};
use std::io::{self, Read};

/// Raw CSV contents: header names plus string records.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

/// Read CSV data with a header row from any reader.
///
/// Records must all have as many fields as the header; at least one data row
/// is required.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ChartError::Dataset("CSV input has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    if rows.is_empty() {
        return Err(ChartError::Dataset(
            "CSV input must contain at least one data row".to_string(),
        ));
    }

    log::debug!("read {} CSV rows with {} columns", rows.len(), headers.len());

    Ok(CsvData { headers, rows })
}
