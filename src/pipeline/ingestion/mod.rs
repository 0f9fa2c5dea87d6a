// Pipeline ingestion: reading the delimited source file into untyped rows

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// The source dataset as loaded: original column labels and string cells.
/// No invariants are assumed; the normalizer validates everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a delimited table from any reader. The first line must be the header row.
pub fn read_raw_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "Read raw table");
    Ok(RawTable { headers, rows })
}

/// Read a delimited table from a file on disk
pub fn read_raw_file(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = File::open(path)?;
    read_raw_table(file, delimiter)
}
