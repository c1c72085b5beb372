//! Row, header and field model shared by the indexer, classifier and I/O adapters

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell. `None` is a missing field and never equals `Some("")`.
pub type Field = Option<String>;

/// Ordered column names of a snapshot. The first column holds the primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Name of the primary key column
    pub fn key_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }
}

/// One record of a snapshot, positionally aligned to its [`Header`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a row where every field is present text
    pub fn from_text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `index`; positions past the end read as missing
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }

    /// Primary key: text of the first field, empty when that field is missing
    pub fn key(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    /// Positional field comparison over the longer of the two rows.
    ///
    /// A missing field only matches another missing field, so a short row
    /// never equals a row carrying empty text in the same position.
    pub fn same_values(&self, other: &Row) -> bool {
        let width = self.len().max(other.len());
        (0..width).all(|i| self.get(i) == other.get(i))
    }
}

/// Which side of the comparison a snapshot plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotRole {
    /// The older snapshot that gets indexed
    Reference,
    /// The newer snapshot that is scanned against the index
    Current,
}

impl fmt::Display for SnapshotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// The three classified outputs of a delta run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Inserted,
    Updated,
    Deleted,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Inserted, Partition::Updated, Partition::Deleted];

    /// File name suffix appended to the output prefix
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Inserted => "_new.csv",
            Self::Updated => "_updated.csv",
            Self::Deleted => "_deleted.csv",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted => write!(f, "inserted"),
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// How rows whose width differs from the header are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidthPolicy {
    /// Accept the row as-is and log a warning
    #[default]
    Lenient,
    /// Reject the row with a `RowWidthMismatch` error
    Strict,
}
