//! Error types for csvdelta operations

use crate::record::{Partition, SnapshotRole};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeltaError>;

#[derive(Error, Debug)]
pub enum DeltaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {role} snapshot '{}': {source}", .path.display())]
    StreamRead {
        role: SnapshotRole,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Row width mismatch in {role} snapshot at record {record}: expected {expected} fields, found {found}")]
    RowWidthMismatch {
        role: SnapshotRole,
        record: u64,
        expected: usize,
        found: usize,
    },

    #[error("Failed to write {partition} rows to '{}': {source}", .path.display())]
    StreamWrite {
        partition: Partition,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} of 3 delta outputs failed: {}", .failures.len(), describe_failures(.failures))]
    WriteFailed { failures: Vec<DeltaError> },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl DeltaError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn stream_read(role: SnapshotRole, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::StreamRead {
            role,
            path: path.into(),
            source,
        }
    }

    pub fn stream_write(partition: Partition, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::StreamWrite {
            partition,
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error. Status 2 is left to clap's usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StreamWrite { .. } | Self::WriteFailed { .. } => 3,
            _ => 1,
        }
    }
}

fn describe_failures(failures: &[DeltaError]) -> String {
    failures
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
