//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for accounts, symbols, call contexts and wager terms.
//! - [`book`] - Ready-made [`WagerBook`](crate::application::WagerBook)
//!   fixtures: minted, funded, with wagers already matched.

pub mod book;
pub mod domain;
