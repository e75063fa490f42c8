//! Clients for the external services the draft server talks to.

pub mod cube_cobra;
pub mod rate_limit;
