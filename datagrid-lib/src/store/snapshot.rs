//! View state snapshots written to the session store.

use log::info;
use serde::Deserialize;
use serde::Serialize;

use super::SessionStore;
use crate::error::StoreError;
use crate::view::EditOverrides;
use crate::view::SortOrder;
use crate::view::ViewState;

/// Fixed key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "dataTableState";

/// The persisted part of a [`ViewState`].
///
/// Wire format:
///
/// ```json
/// {
///   "sortKey": "age",
///   "sortOrder": "desc",
///   "visibleColumns": ["name", "age"],
///   "editedData": {"1": {"name": "Rob"}},
///   "searchQuery": "bo"
/// }
/// ```
///
/// The reveal count is a rendering bound, not user intent, and is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub sort_key: Option<String>,
    pub sort_order: SortOrder,
    pub visible_columns: Vec<String>,
    pub edited_data: EditOverrides,
    pub search_query: String,
}

impl Snapshot {
    /// Captures the persisted fields of a view state.
    pub fn capture(state: &ViewState) -> Self {
        Self {
            sort_key: state.sort_key.clone(),
            sort_order: state.sort_order,
            visible_columns: state.visible_columns.clone(),
            edited_data: state.edits.clone(),
            search_query: state.search_query.clone(),
        }
    }

    /// Encodes the snapshot as compact JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::Serialization)
    }

    /// Encodes the snapshot as indented JSON, for display.
    pub fn to_pretty_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(StoreError::Serialization)
    }

    /// Reads the last snapshot back from a store, for inspection.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    pub fn load(store: &dyn SessionStore) -> Result<Option<Self>, StoreError> {
        match store.get_item(SNAPSHOT_KEY) {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StoreError::Deserialization {
                    key: SNAPSHOT_KEY.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

impl ViewState {
    /// Writes the view state to the store under [`SNAPSHOT_KEY`], replacing
    /// any earlier snapshot. Returns what was written.
    pub fn snapshot(&self, store: &dyn SessionStore) -> Result<Snapshot, StoreError> {
        let snapshot = Snapshot::capture(self);
        let json = snapshot.to_json()?;
        store.set_item(SNAPSHOT_KEY, json);
        info!(
            "Saved view state snapshot ({} edited cells)",
            snapshot.edited_data.len()
        );
        Ok(snapshot)
    }
}
