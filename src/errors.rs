use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration, IO, and partitioning failures.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input folder yielded no records.
    #[error("no records loaded from '{}'", path.display())]
    EmptyInput {
        /// Folder that was scanned.
        path: PathBuf,
    },
    /// Invalid settings or input path.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A split lost, repeated or invented a record index.
    #[error("partition invariant violated: {0}")]
    PartitionInvariant(String),
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// CSV writer failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
