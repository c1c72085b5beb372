//! Reference snapshot indexing

use crate::error::{DeltaError, Result};
use crate::record::{Header, Row, SnapshotRole, WidthPolicy};
use indexmap::IndexMap;

/// Indexed row plus the ordinal of the record that produced it
#[derive(Debug, Clone)]
struct IndexedRow {
    ordinal: u64,
    row: Row,
}

/// Primary key → row lookup built from the reference (older) snapshot.
///
/// The classifier drains this index; whatever is left afterwards is the
/// delete set.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    header: Header,
    entries: IndexMap<String, IndexedRow>,
    rows_read: u64,
    duplicate_keys: u64,
}

impl ReferenceIndex {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Insert a row under its key, returning the row it replaced
    pub fn insert(&mut self, row: Row) -> Option<Row> {
        let ordinal = self.rows_read;
        self.rows_read += 1;

        let key = row.key().to_string();
        let replaced = self
            .entries
            .insert(key, IndexedRow { ordinal, row })
            .map(|previous| previous.row);

        if replaced.is_some() {
            self.duplicate_keys += 1;
        }
        replaced
    }

    /// Remove and return the row stored under `key`
    pub fn take(&mut self, key: &str) -> Option<Row> {
        self.entries.swap_remove(key).map(|entry| entry.row)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of distinct keys currently indexed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total records consumed while building, duplicates included
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Records that overwrote an earlier record with the same key
    pub fn duplicate_keys(&self) -> u64 {
        self.duplicate_keys
    }

    /// Consume the index, yielding the surviving rows in the order they were read
    pub fn into_remaining(self) -> Vec<Row> {
        let mut remaining: Vec<IndexedRow> = self.entries.into_values().collect();
        remaining.sort_by_key(|entry| entry.ordinal);
        remaining.into_iter().map(|entry| entry.row).collect()
    }
}

/// Builds a [`ReferenceIndex`] from the older snapshot's row stream
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotIndexer {
    width_policy: WidthPolicy,
}

impl SnapshotIndexer {
    pub fn new(width_policy: WidthPolicy) -> Self {
        Self { width_policy }
    }

    /// Materialize the whole reference snapshot. Later duplicates win.
    pub fn build<I>(&self, header: Header, rows: I) -> Result<ReferenceIndex>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut index = ReferenceIndex::new(header);

        for row in rows {
            let row = row?;
            check_row_width(
                self.width_policy,
                SnapshotRole::Reference,
                index.header().len(),
                index.rows_read() + 1,
                &row,
            )?;

            if index.insert(row).is_some() {
                log::debug!(
                    "Duplicate key at reference record {}; keeping the later row",
                    index.rows_read()
                );
            }
        }

        log::debug!(
            "Indexed {} reference rows ({} distinct keys, {} duplicates)",
            index.rows_read(),
            index.len(),
            index.duplicate_keys()
        );

        Ok(index)
    }
}

/// Apply the width policy to a single record (`record` is 1-based)
pub(crate) fn check_row_width(
    policy: WidthPolicy,
    role: SnapshotRole,
    expected: usize,
    record: u64,
    row: &Row,
) -> Result<()> {
    if row.len() == expected {
        return Ok(());
    }

    match policy {
        WidthPolicy::Strict => Err(DeltaError::RowWidthMismatch {
            role,
            record,
            expected,
            found: row.len(),
        }),
        WidthPolicy::Lenient => {
            log::warn!(
                "{} snapshot record {} has {} fields, header has {}",
                role,
                record,
                row.len(),
                expected
            );
            Ok(())
        }
    }
}
