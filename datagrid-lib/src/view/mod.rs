//! View state and view derivation

mod derive;
mod edits;
mod order;
mod reveal;
mod state;

pub use derive::*;
pub use edits::*;
pub use order::*;
pub use reveal::*;
pub use state::*;
