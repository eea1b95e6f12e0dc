//! Registration and authentication HTTP API.

pub mod login;
pub mod me;
pub mod register;
