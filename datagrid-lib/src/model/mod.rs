//! Dataset model

mod column;
mod dataset;
mod row;
mod row_serde;
mod value;

pub use column::*;
pub use dataset::*;
pub use row::*;
pub use value::*;
