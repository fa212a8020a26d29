//! Session-scoped key-value storage
//!
//! Provides a `SessionStore` trait standing in for browser-style session
//! storage, an in-memory implementation, and the view state snapshot written
//! through it. The store is injected, so tests and hosts can swap it.

mod memory;
mod snapshot;

pub use memory::*;
pub use snapshot::*;

/// Backend trait for session storage.
///
/// Implementations store opaque string blobs by key. Writes are synchronous
/// and overwrite any previous value for the key.
///
/// # Example
///
/// ```
/// use datagrid_lib::store::{MemoryStore, SessionStore};
///
/// let store = MemoryStore::new();
/// store.set_item("greeting", "hello".to_string());
/// assert_eq!(store.get_item("greeting").as_deref(), Some("hello"));
/// ```
pub trait SessionStore: Send + Sync {
    /// Get the blob stored under a key.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a blob under a key, replacing any previous one.
    fn set_item(&self, key: &str, value: String);
}
