pub use entity::{draft_picks, Id};

pub mod draft_pick;
pub mod error;
