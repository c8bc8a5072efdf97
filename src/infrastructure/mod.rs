//! Infrastructure: configuration, logging and host policies.

pub mod accounts;
pub mod config;
