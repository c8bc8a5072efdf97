//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe what the ledger needs from its host: durable
//! storage, a clock and an account-identifier check.

pub mod host;
pub mod store;
