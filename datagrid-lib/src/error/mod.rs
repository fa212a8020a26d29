//! Error types

mod dataset;
mod store;

pub use dataset::*;
pub use store::*;
