//! Application services (use cases).
//!
//! These services orchestrate domain logic through the store ports.
//! [`WagerBook`] is the entry point hosts use; the services below it are
//! exposed for callers that manage their own transactions.

pub mod audit;
pub mod book;
pub mod ledger;
pub mod lifecycle;
pub mod settlement;

pub use audit::{audit, AuditReport};
pub use book::{BookSettings, WagerBook, DEFAULT_MAX_SYMBOL_LEN, DEFAULT_TOTAL_SUPPLY};
pub use ledger::BalanceLedger;
pub use lifecycle::{Cancellation, WagerRegistry};
pub use settlement::{SettlementEngine, SettlementSummary};
