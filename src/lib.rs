//! # csvdelta
//!
//! Snapshot-based change capture for CSV datasets: indexes an older snapshot
//! by its first column, scans a newer snapshot against that index and splits
//! the difference into inserted, updated and deleted rows.

pub mod cli;
pub mod error;
pub mod record;
pub mod data;
pub mod snapshot;
pub mod change_detection;
pub mod output;
pub mod progress;
pub mod commands;

pub use change_detection::{ChangeSet, DeltaClassifier};
pub use error::{DeltaError, Result};
pub use record::{Field, Header, Partition, Row, SnapshotRole, WidthPolicy};
pub use snapshot::{ReferenceIndex, SnapshotIndexer};

/// Default field delimiter for reading and writing snapshots
pub const DEFAULT_DELIMITER: u8 = b',';
