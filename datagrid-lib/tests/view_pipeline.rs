//! Integration tests for the view pipeline over a realistic dataset.
//!
//! Covers the behavioral guarantees the grid relies on: stable sorting,
//! search, column visibility, edit overrides, and incremental reveal.

use datagrid_lib::model::{Column, ColumnType, DataRow, Dataset, Value};
use datagrid_lib::store::{MemoryStore, SNAPSHOT_KEY, SessionStore, Snapshot};
use datagrid_lib::view::{SortOrder, ViewState, derive};

fn scenario() -> Dataset {
    Dataset::from_json(
        r#"{
            "columns": [
                {"id": "name", "ordinalNo": 1, "title": "Name", "type": "string"},
                {"id": "age", "ordinalNo": 2, "title": "Age", "type": "number"}
            ],
            "data": [
                {"id": "1", "name": "Bob", "age": 30},
                {"id": "2", "name": "Amy", "age": 25}
            ]
        }"#,
    )
    .unwrap()
}

/// 60 rows with only four distinct `team` values, so sorting by team has many
/// ties.
fn teams() -> Dataset {
    let names = ["delta", "alpha", "charlie", "bravo"];
    let rows = (0..60)
        .map(|i| {
            DataRow::new(format!("r{i}"))
                .set("team", names[i % names.len()])
                .set("score", (i * 7 % 13) as i64)
                .set("active", i % 3 == 0)
        })
        .collect();
    Dataset::new(
        vec![
            Column::new("team", 1, "Team", ColumnType::Text),
            Column::new("score", 2, "Score", ColumnType::Numeric),
            Column::new("active", 3, "Active", ColumnType::Boolean),
        ],
        rows,
    )
    .unwrap()
}

fn row_ids(dataset: &Dataset, state: &ViewState) -> Vec<String> {
    derive(dataset, state)
        .rows
        .iter()
        .map(|row| row.id().to_string())
        .collect()
}

fn names(dataset: &Dataset, state: &ViewState) -> Vec<String> {
    derive(dataset, state)
        .rows
        .iter()
        .map(|row| row.row.get("name").unwrap().to_display_string())
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_sort_by_age_ascending_then_descending() {
    let dataset = scenario();
    let mut state = ViewState::for_dataset(&dataset);

    state.set_sort("age");
    assert_eq!(names(&dataset, &state), ["Amy", "Bob"]);

    state.set_sort("age");
    assert_eq!(state.sort_order(), SortOrder::Desc);
    assert_eq!(names(&dataset, &state), ["Bob", "Amy"]);
}

#[test]
fn test_search_amy_keeps_only_row_two() {
    let dataset = scenario();
    let mut state = ViewState::for_dataset(&dataset);
    state.set_search_query("amy");

    assert_eq!(row_ids(&dataset, &state), ["2"]);
}

#[test]
fn test_hide_age_column() {
    let dataset = scenario();
    let mut state = ViewState::for_dataset(&dataset);
    state.toggle_column_visibility("age");

    let view = derive(&dataset, &state);
    assert!(view.columns.iter().all(|column| column.id != "age"));
    assert!(view.rows.iter().all(|row| row.cells.len() == 1));
    assert_eq!(dataset.row("1").unwrap().get("age"), Some(&Value::from(30)));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_sort_is_ordered_permutation_and_stable() {
    let dataset = teams();
    let mut state = ViewState::for_dataset(&dataset).with_reveal_count(usize::MAX);

    for order in [SortOrder::Asc, SortOrder::Desc] {
        state.set_sort("team");
        assert_eq!(state.sort_order(), order);

        let view = derive(&dataset, &state);
        assert_eq!(view.rows.len(), dataset.rows().len());

        let mut seen: Vec<&str> = view.rows.iter().map(|row| row.id()).collect();
        seen.sort_unstable();
        let mut all: Vec<&str> = dataset.rows().iter().map(|row| row.id()).collect();
        all.sort_unstable();
        assert_eq!(seen, all);

        for pair in view.rows.windows(2) {
            let a = pair[0].row.get("team").unwrap();
            let b = pair[1].row.get("team").unwrap();
            let ordering = order.apply(a.sort_cmp(b));
            assert!(ordering.is_le(), "{a} before {b} under {order}");

            if a == b {
                let source = |id: &str| dataset.rows().iter().position(|r| r.id() == id);
                assert!(source(pair[0].id()) < source(pair[1].id()));
            }
        }
    }
}

#[test]
fn test_empty_search_is_noop() {
    let dataset = teams();
    let state = ViewState::for_dataset(&dataset).with_reveal_count(usize::MAX);

    let view = derive(&dataset, &state);
    assert_eq!(view.matched, dataset.rows().len());
    assert_eq!(view.rows.len(), dataset.rows().len());
}

#[test]
fn test_recorded_edit_always_resolves() {
    let dataset = teams();
    let mut state = ViewState::for_dataset(&dataset).with_reveal_count(usize::MAX);

    for value in [Value::from("x"), Value::Null, Value::from(false), Value::from(9.5)] {
        state.record_edit("r5", "score", value.clone());
        let view = derive(&dataset, &state);
        let row = view.rows.iter().find(|row| row.id() == "r5").unwrap();
        let score = view.columns.iter().position(|c| c.id == "score").unwrap();
        assert_eq!(row.cells[score], Some(&value));
    }
}

#[test]
fn test_toggle_twice_restores_visible_set() {
    let dataset = teams();
    let mut state = ViewState::for_dataset(&dataset);
    let before = state.visible_columns().to_vec();

    state.toggle_column_visibility("active");
    state.toggle_column_visibility("active");
    assert_eq!(state.visible_columns(), before.as_slice());
}

#[test]
fn test_rendered_rows_bounded_by_reveal_and_matches() {
    let dataset = teams();
    let mut state = ViewState::for_dataset(&dataset);
    state.set_search_query("alpha");

    let mut last_reveal = state.reveal_count();
    for _ in 0..5 {
        let view = derive(&dataset, &state);
        assert_eq!(view.matched, 15);
        assert!(view.rows.len() <= state.reveal_count().min(view.matched));

        state.grow_reveal(10);
        assert!(state.reveal_count() > last_reveal);
        last_reveal = state.reveal_count();
    }
}

#[test]
fn test_reveal_surfaces_next_filtered_sorted_rows() {
    let dataset = teams();
    let mut state = ViewState::for_dataset(&dataset).with_reveal_count(5);
    state.set_search_query("bravo");
    state.set_sort("score");

    let first = row_ids(&dataset, &state);
    state.grow_reveal(5);
    let grown = row_ids(&dataset, &state);

    assert_eq!(first.len(), 5);
    assert_eq!(grown.len(), 10);
    assert_eq!(&grown[..5], first.as_slice());
}

// =============================================================================
// Snapshot
// =============================================================================

#[test]
fn test_snapshot_reflects_interaction() {
    let dataset = scenario();
    let store = MemoryStore::new();
    let mut state = ViewState::for_dataset(&dataset);

    state.set_sort("name");
    state.set_search_query("o");
    let bob = dataset.row("1").unwrap();
    state.prime_edit(bob, "name");
    state.record_edit("1", "name", Value::from("Bobby"));
    state.snapshot(&store).unwrap();

    assert!(store.get_item(SNAPSHOT_KEY).is_some());
    let loaded = Snapshot::load(&store).unwrap().unwrap();
    assert_eq!(loaded.sort_key.as_deref(), Some("name"));
    assert_eq!(loaded.search_query, "o");
    assert_eq!(loaded.edited_data.get("1", "name"), Some(&Value::from("Bobby")));
}
