//! DatasetError for loading input data

use std::path::PathBuf;

/// Error type for reading and validating a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Failed to read dataset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or does not match the expected shape.
    #[error("Invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two columns share the same id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumn { id: String },

    /// Two rows share the same id.
    #[error("Duplicate row id '{id}'")]
    DuplicateRow { id: String },
}

impl DatasetError {
    /// Creates a new duplicate column error.
    pub fn duplicate_column(id: impl Into<String>) -> Self {
        Self::DuplicateColumn { id: id.into() }
    }

    /// Creates a new duplicate row error.
    pub fn duplicate_row(id: impl Into<String>) -> Self {
        Self::DuplicateRow { id: id.into() }
    }
}
