//! StoreError for session storage

/// Error type for reading and writing view state snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),

    /// A stored blob could not be decoded.
    #[error("deserialization error for key '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
