//! Error types for the fedsplit dataset and partitioning layer.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PartitionError>;

/// Errors that can occur while partitioning a dataset or reading a view.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// A trace or manifest file could not be opened or read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    
    /// A data row carried fewer fields than required (line is 1-based)
    #[error("Malformed row at line {line}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    
    /// A dataset identity has no entry in the trace mapping
    #[error("Sample {index} ({identity}) is not mapped to any client in the trace")]
    UnmappedSample { index: usize, identity: String },
    
    /// The dataset does not expose an identity for this element
    #[error("Dataset exposes no identity for element {index}")]
    MissingIdentity { index: usize },
    
    /// Partition id beyond the partition count
    #[error("Partition {id} out of range ({count} partitions)")]
    PartitionOutOfRange { id: usize, count: usize },
    
    /// Local index beyond a view's length
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    
    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    
    /// A report or size summary could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PartitionError {
    /// Creates an I/O error tagged with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
    
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
    
    /// Returns true for bounds failures (partition id or local index).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::PartitionOutOfRange { .. } | Self::IndexOutOfRange { .. }
        )
    }
}
