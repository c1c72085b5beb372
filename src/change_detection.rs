//! Row classification of the current snapshot against the reference index

use crate::error::Result;
use crate::record::{Header, Partition, Row, SnapshotRole, WidthPolicy};
use crate::snapshot::{check_row_width, ReferenceIndex};
use serde::Serialize;

/// Three-way classification of two snapshots
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeSet {
    /// Header shared by all three outputs, taken from the current snapshot
    pub header: Header,
    /// Keys only in the current snapshot, in current-snapshot order
    pub inserted: Vec<Row>,
    /// Keys in both snapshots with at least one differing field
    pub updated: Vec<Row>,
    /// Keys only in the reference snapshot, in reference-snapshot order
    pub deleted: Vec<Row>,
    pub unchanged: u64,
    pub reference_rows: u64,
    pub current_rows: u64,
}

impl ChangeSet {
    pub fn rows(&self, partition: Partition) -> &[Row] {
        match partition {
            Partition::Inserted => &self.inserted,
            Partition::Updated => &self.updated,
            Partition::Deleted => &self.deleted,
        }
    }

    pub fn total_changes(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }
}

/// Scans the current snapshot once against a [`ReferenceIndex`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaClassifier {
    width_policy: WidthPolicy,
}

impl DeltaClassifier {
    pub fn new(width_policy: WidthPolicy) -> Self {
        Self { width_policy }
    }

    /// Classify every current row, consuming the index.
    ///
    /// Matched keys are removed from the index as they are found, so what
    /// remains after the scan is exactly the delete set.
    pub fn classify<I>(&self, mut index: ReferenceIndex, header: Header, rows: I) -> Result<ChangeSet>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        if index.header() != &header {
            log::warn!(
                "Snapshot headers differ; using current header [{}] for all outputs",
                header.columns().join(", ")
            );
        }

        let mut changes = ChangeSet {
            reference_rows: index.rows_read(),
            ..ChangeSet::default()
        };

        for row in rows {
            let row = row?;
            changes.current_rows += 1;
            check_row_width(
                self.width_policy,
                SnapshotRole::Current,
                header.len(),
                changes.current_rows,
                &row,
            )?;

            let previous = index.take(row.key());
            match previous {
                None => changes.inserted.push(row),
                Some(previous) if !row.same_values(&previous) => changes.updated.push(row),
                Some(_) => changes.unchanged += 1,
            }
        }

        changes.deleted = index.into_remaining();
        changes.header = header;

        log::debug!(
            "Classified {} current rows: {} inserted, {} updated, {} deleted, {} unchanged",
            changes.current_rows,
            changes.inserted.len(),
            changes.updated.len(),
            changes.deleted.len(),
            changes.unchanged
        );

        Ok(changes)
    }
}
