//! Persistence ports for balances, wagers and their indices.
//!
//! One trait per index, each exposing only what the lifecycle and
//! settlement services need. Method names are distinct across traits so a
//! single adapter can implement all of them without call-site ambiguity.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, QueueEntry, Symbol, Timestamp, Value, Wager, WagerId};
use crate::error::Result;

/// Account balances.
pub trait BalanceStore: Send + Sync {
    /// Balance record for an account; `None` if it has never held funds.
    fn balance(&self, account: &AccountId) -> Result<Option<Amount>>;

    /// Create or overwrite a balance record.
    fn set_balance(&self, account: &AccountId, amount: Amount) -> Result<()>;

    /// Every balance record, ordered by account.
    fn balances(&self) -> Result<Vec<(AccountId, Amount)>>;
}

/// Wager records by id.
pub trait WagerStore: Send + Sync {
    fn wager(&self, id: WagerId) -> Result<Option<Wager>>;

    /// Insert or replace a wager record.
    fn put_wager(&self, wager: &Wager) -> Result<()>;

    /// Delete a wager record. Returns whether it existed.
    fn delete_wager(&self, id: WagerId) -> Result<bool>;

    /// Every live wager, ordered by id.
    fn wagers(&self) -> Result<Vec<Wager>>;
}

/// Per-symbol set of Open wager ids.
pub trait OpenWagerIndex: Send + Sync {
    fn insert_open(&self, symbol: &Symbol, id: WagerId) -> Result<()>;

    /// Returns whether the id was present.
    fn remove_open(&self, symbol: &Symbol, id: WagerId) -> Result<bool>;

    /// Open ids for a symbol in ascending order.
    fn open_wagers(&self, symbol: &Symbol) -> Result<Vec<WagerId>>;

    fn clear_open(&self, symbol: &Symbol) -> Result<()>;
}

/// Per-symbol expiry queue of Matched wagers.
pub trait MatchedQueueStore: Send + Sync {
    fn push_matched(&self, symbol: &Symbol, entry: QueueEntry) -> Result<()>;

    /// Earliest-expiring entry for a symbol.
    fn peek_matched(&self, symbol: &Symbol) -> Result<Option<QueueEntry>>;

    fn pop_matched(&self, symbol: &Symbol) -> Result<Option<QueueEntry>>;

    /// Excise a wager's entry wherever it sits in the queue.
    fn remove_matched(&self, symbol: &Symbol, id: WagerId) -> Result<Option<QueueEntry>>;

    /// Entries for a symbol in settlement order.
    fn matched_wagers(&self, symbol: &Symbol) -> Result<Vec<QueueEntry>>;

    fn clear_matched(&self, symbol: &Symbol) -> Result<()>;
}

/// Per-account list of wager ids the account holds a side of.
pub trait AccountWagerIndex: Send + Sync {
    /// Append an id to the account's list if not already present.
    fn link_account(&self, account: &AccountId, id: WagerId) -> Result<()>;

    /// Returns whether the id was present.
    fn unlink_account(&self, account: &AccountId, id: WagerId) -> Result<bool>;

    /// Ids in the order they were linked.
    fn account_wagers(&self, account: &AccountId) -> Result<Vec<WagerId>>;

    fn clear_account(&self, account: &AccountId) -> Result<()>;
}

/// The last value reported for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub value: Value,
    pub reported_at: Timestamp,
}

/// Symbols wagers have been created on, and their latest reports.
pub trait SymbolRegistry: Send + Sync {
    fn register_symbol(&self, symbol: &Symbol) -> Result<()>;

    /// Registered symbols in ascending order.
    fn symbols(&self) -> Result<Vec<Symbol>>;

    fn record_report(&self, symbol: &Symbol, report: SymbolReport) -> Result<()>;

    fn last_report(&self, symbol: &Symbol) -> Result<Option<SymbolReport>>;
}

/// Ledger-wide singleton state.
///
/// A fresh store is unminted, has no reporter, a zero supply and allocates
/// [`WagerId::FIRST`] next.
pub trait ContractState: Send + Sync {
    fn is_minted(&self) -> Result<bool>;

    /// Record the mint: the fixed supply and the sole authorized reporter.
    fn mark_minted(&self, total_supply: Amount, reporter: &AccountId) -> Result<()>;

    fn reporter(&self) -> Result<Option<AccountId>>;

    /// Supply fixed at mint; zero before.
    fn total_supply(&self) -> Result<Amount>;

    /// Hand out the next wager id and advance the counter.
    fn allocate_wager_id(&self) -> Result<WagerId>;
}

/// All-or-nothing grouping of mutations.
///
/// Everything written between [`begin`](Self::begin) and
/// [`rollback`](Self::rollback) is undone; [`commit`](Self::commit) keeps it.
pub trait Transactional: Send + Sync {
    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;
}

/// Every port the ledger needs from its store.
pub trait LedgerStore:
    BalanceStore
    + WagerStore
    + OpenWagerIndex
    + MatchedQueueStore
    + AccountWagerIndex
    + SymbolRegistry
    + ContractState
    + Transactional
{
}

impl<T> LedgerStore for T where
    T: BalanceStore
        + WagerStore
        + OpenWagerIndex
        + MatchedQueueStore
        + AccountWagerIndex
        + SymbolRegistry
        + ContractState
        + Transactional
{
}
