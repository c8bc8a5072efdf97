//! Implementations of ports (hexagonal adapters).
//!
//! - [`outbound`] - Stores, snapshot files and clocks the ledger runs on.
//! - [`inbound`] - The command-line host.

pub mod inbound;
pub mod outbound;
