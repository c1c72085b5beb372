//! Delta file writing and run summary formatting

use crate::change_detection::ChangeSet;
use crate::error::{DeltaError, Result};
use crate::record::{Header, Partition, Row};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Output path for one partition: `<prefix><suffix>`
pub fn delta_path(prefix: &Path, partition: Partition) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(partition.file_suffix());
    PathBuf::from(path)
}

/// A partition that was written successfully
#[derive(Debug, Clone, Serialize)]
pub struct WrittenDelta {
    pub partition: Partition,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of writing all three partitions
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<WrittenDelta>,
    pub failures: Vec<DeltaError>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn collected failures into a single run-level error
    pub fn into_result(self) -> Result<Vec<WrittenDelta>> {
        if self.failures.is_empty() {
            Ok(self.written)
        } else {
            Err(DeltaError::WriteFailed {
                failures: self.failures,
            })
        }
    }
}

/// Writes the inserted, updated and deleted partitions as CSV files
pub struct DeltaWriter {
    prefix: PathBuf,
    delimiter: u8,
    null_value: Option<String>,
}

impl DeltaWriter {
    pub fn new(prefix: impl Into<PathBuf>, delimiter: u8, null_value: Option<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter,
            null_value,
        }
    }

    pub fn path_for(&self, partition: Partition) -> PathBuf {
        delta_path(&self.prefix, partition)
    }

    /// Write every partition. A failing output does not stop the others.
    pub fn write_all(&self, changes: &ChangeSet) -> WriteReport {
        let mut report = WriteReport::default();

        for partition in Partition::ALL {
            let path = self.path_for(partition);
            let rows = changes.rows(partition);

            match self.write_partition(&path, &changes.header, rows) {
                Ok(()) => {
                    log::info!("Wrote {} {} rows to {}", rows.len(), partition, path.display());
                    report.written.push(WrittenDelta {
                        partition,
                        path,
                        rows: rows.len(),
                    });
                }
                Err(source) => {
                    let error = DeltaError::stream_write(partition, path, source);
                    log::error!("{}", error);
                    report.failures.push(error);
                }
            }
        }

        report
    }

    fn write_partition(&self, path: &Path, header: &Header, rows: &[Row]) -> std::result::Result<(), csv::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.delimiter)
            .from_writer(file);

        writer.write_record(header.columns())?;
        for row in rows {
            writer.write_record(row.fields().iter().map(|f| self.render(f)))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn render<'a>(&'a self, field: &'a Option<String>) -> &'a str {
        match field {
            Some(value) => value.as_str(),
            None => self.null_value.as_deref().unwrap_or(""),
        }
    }
}

/// Everything reported about a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub reference: PathBuf,
    pub current: PathBuf,
    pub key_column: String,
    pub columns: Vec<String>,
    pub reference_rows: u64,
    pub current_rows: u64,
    pub duplicate_reference_keys: u64,
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: u64,
    pub outputs: Vec<WrittenDelta>,
}

impl RunSummary {
    pub fn new(
        reference: &Path,
        current: &Path,
        changes: &ChangeSet,
        duplicate_reference_keys: u64,
        outputs: Vec<WrittenDelta>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            reference: reference.to_path_buf(),
            current: current.to_path_buf(),
            key_column: changes.header.key_column().unwrap_or_default().to_string(),
            columns: changes.header.columns().to_vec(),
            reference_rows: changes.reference_rows,
            current_rows: changes.current_rows,
            duplicate_reference_keys,
            inserted: changes.inserted.len(),
            updated: changes.updated.len(),
            deleted: changes.deleted.len(),
            unchanged: changes.unchanged,
            outputs,
        }
    }

    pub fn total_changes(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// Pretty printer for csvdelta output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the run summary as a tree
    pub fn print_summary(summary: &RunSummary) {
        println!(
            "🔍 Delta: {} → {}",
            summary.reference.display(),
            summary.current.display()
        );
        println!("├─ Key column: {}", summary.key_column);
        println!("├─ Reference rows: {}", summary.reference_rows);
        println!("├─ Current rows: {}", summary.current_rows);
        if summary.duplicate_reference_keys > 0 {
            println!(
                "├─ ⚠️  Duplicate reference keys: {} (later rows kept)",
                summary.duplicate_reference_keys
            );
        }

        if summary.total_changes() == 0 {
            println!("├─ ✅ No changes");
        } else {
            println!("├─ ➕ Inserted: {}", summary.inserted);
            println!("├─ ✏️  Updated: {}", summary.updated);
            println!("├─ ➖ Deleted: {}", summary.deleted);
        }
        println!("├─ Unchanged: {}", summary.unchanged);

        println!("└─ Outputs:");
        for (i, output) in summary.outputs.iter().enumerate() {
            let prefix = if i == summary.outputs.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {} ({} rows)", prefix, output.path.display(), output.rows);
        }
    }

    /// Machine-readable `key=value` lines
    pub fn print_quiet(summary: &RunSummary) {
        println!("inserted={}", summary.inserted);
        println!("updated={}", summary.updated);
        println!("deleted={}", summary.deleted);
        println!("unchanged={}", summary.unchanged);
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}
