//! Data grid core library
//!
//! The in-memory view pipeline behind the data grid: a static dataset plus
//! transient view state (sort, visible columns, search, edit overrides, reveal
//! count) derived into the exact rows and cells to paint.

pub mod error;
pub mod model;
pub mod store;
pub mod view;
