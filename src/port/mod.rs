//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate the ledger with
//! its host.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Clock  │            │   Store     │              │ Account   │
//! │ Adapter │            │   Adapter   │              │  Rules    │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`LedgerStore`] and its per-index repositories - Persistence
//! - [`Clock`], [`AccountRules`], [`CallContext`] - Host primitives

pub mod outbound;

pub use outbound::host::{AccountRules, CallContext, Clock};
pub use outbound::store::{
    AccountWagerIndex, BalanceStore, ContractState, LedgerStore, MatchedQueueStore,
    OpenWagerIndex, SymbolRegistry, SymbolReport, Transactional, WagerStore,
};
