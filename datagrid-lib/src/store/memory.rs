//! In-memory session store using DashMap

use dashmap::DashMap;

use super::SessionStore;

/// A session store backed by a concurrent hash map.
///
/// This is the default store. Data lives as long as the process, which is the
/// terminal equivalent of a browser session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    store: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    fn set_item(&self, key: &str, value: String) {
        self.store.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set_item("k", "one".to_string());
        store.set_item("k", "two".to_string());

        assert_eq!(store.get_item("k").as_deref(), Some("two"));
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.set_item("b", "bee".to_string());
        store.set_item("a", String::new());

        assert_eq!(store.get_item("b").as_deref(), Some("bee"));
        assert_eq!(store.get_item("a").as_deref(), Some(""));
        assert_eq!(store.get_item("c"), None);
    }
}
