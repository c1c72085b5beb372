//! CSV snapshot reading

use crate::error::{DeltaError, Result};
use crate::record::{Field, Header, Row, SnapshotRole};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Parsing options shared by both snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub delimiter: u8,
    /// Text that denotes a missing field
    pub null_value: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: crate::DEFAULT_DELIMITER,
            null_value: None,
        }
    }
}

/// Reader for one snapshot: a header followed by a lazy stream of rows
pub struct SnapshotReader<R: Read> {
    reader: csv::Reader<R>,
    header: Header,
    role: SnapshotRole,
    source: PathBuf,
    null_value: Option<String>,
}

impl SnapshotReader<File> {
    /// Open a snapshot file and read its header row
    pub fn open(path: &Path, role: SnapshotRole, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| DeltaError::stream_read(role, path, csv::Error::from(e)))?;
        Self::from_reader(file, path, role, options)
    }
}

impl<R: Read> SnapshotReader<R> {
    /// Wrap any byte source; `source` is only used in diagnostics
    pub fn from_reader(
        input: R,
        source: impl Into<PathBuf>,
        role: SnapshotRole,
        options: &ReadOptions,
    ) -> Result<Self> {
        let source = source.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(input);

        let columns = reader
            .headers()
            .map_err(|e| DeltaError::stream_read(role, &source, e))?
            .clone();

        if columns.is_empty() {
            return Err(DeltaError::invalid_input(format!(
                "{} snapshot '{}' has no header row",
                role,
                source.display()
            )));
        }

        Ok(Self {
            reader,
            header: Header::new(columns.iter()),
            role,
            source,
            null_value: options.null_value.clone(),
        })
    }

    /// Split into the header and a row stream that stops after the first error
    pub fn into_parts(self) -> (Header, SnapshotRows<R>) {
        let rows = SnapshotRows {
            records: self.reader.into_records(),
            role: self.role,
            source: self.source,
            null_value: self.null_value,
            failed: false,
        };
        (self.header, rows)
    }
}

/// Iterator over the data rows of a snapshot
pub struct SnapshotRows<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    role: SnapshotRole,
    source: PathBuf,
    null_value: Option<String>,
    failed: bool,
}

impl<R: Read> SnapshotRows<R> {
    fn to_field(&self, value: &str) -> Field {
        match &self.null_value {
            Some(marker) if marker == value => None,
            _ => Some(value.to_string()),
        }
    }
}

impl<R: Read> Iterator for SnapshotRows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.records.next()? {
            Ok(record) => {
                let fields = record.iter().map(|value| self.to_field(value)).collect();
                Some(Ok(Row::new(fields)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(DeltaError::stream_read(self.role, &self.source, e)))
            }
        }
    }
}
