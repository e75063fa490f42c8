//! Business logic for the Dynasty Cube draft server: the draft pick write
//! path with its duplicate-card cache, and the CubeCobra gateway with its
//! outbound rate limiter.

pub use entity_api::{draft_picks, Id};

pub mod draft;
pub mod error;
pub mod gateway;
