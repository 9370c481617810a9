//! Core data models: the match log and the statistics derived from it.

mod game;
mod ids;
mod stats;

pub use game::*;
pub use ids::*;
pub use stats::*;
