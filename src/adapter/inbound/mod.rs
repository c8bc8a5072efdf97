//! Inbound adapters driving the ledger.

pub mod cli;
