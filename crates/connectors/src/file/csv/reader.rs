use crate::file::csv::{error::FileError, headers::sanitize_headers};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::{fs::File, path::Path};
use tracing::debug;

/// One data row; `None` marks an empty cell.
pub type CsvRow = Vec<Option<String>>;

/// Streams a headered CSV file in batches.
///
/// Headers are sanitized on open. Rows shorter than the header are padded
/// with `None`, longer rows are rejected.
pub struct CsvReader {
    reader: Reader<File>,
    raw_headers: Vec<String>,
    headers: Vec<String>,
    rows_read: usize,
}

impl CsvReader {
    pub fn open(path: &Path) -> Result<Self, FileError> {
        if !path.exists() {
            return Err(FileError::NotFound(path.display().to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
            return Err(FileError::InvalidFormat(format!(
                "{} has no header row",
                path.display()
            )));
        }

        let headers = sanitize_headers(&raw_headers);
        debug!("CSV headers for {}: {:?}", path.display(), headers);

        Ok(Self {
            reader,
            raw_headers,
            headers,
            rows_read: 0,
        })
    }

    /// Sanitized column names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn raw_headers(&self) -> &[String] {
        &self.raw_headers
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reads up to `size` rows. An empty batch means the file is exhausted.
    pub fn next_batch(&mut self, size: usize) -> Result<Vec<CsvRow>, FileError> {
        let mut batch = Vec::with_capacity(size);
        let mut record = StringRecord::new();

        while batch.len() < size && self.reader.read_record(&mut record)? {
            self.rows_read += 1;
            if record.len() > self.headers.len() {
                return Err(FileError::InvalidFormat(format!(
                    "row {} has {} fields, header has {}",
                    self.rows_read,
                    record.len(),
                    self.headers.len()
                )));
            }

            let mut row: CsvRow = record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect();
            row.resize(self.headers.len(), None);
            batch.push(row);
        }

        Ok(batch)
    }

    /// Reads every remaining row.
    pub fn read_all(&mut self) -> Result<Vec<CsvRow>, FileError> {
        let mut rows = Vec::new();
        loop {
            let batch = self.next_batch(1024)?;
            if batch.is_empty() {
                return Ok(rows);
            }
            rows.extend(batch);
        }
    }
}
