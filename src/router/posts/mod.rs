//! Posts-related HTTP API.

pub mod create;
pub mod feed;
pub mod remove;
