//! Users-related HTTP API.

pub mod get;
pub mod patch;
