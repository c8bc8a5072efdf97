//! In-memory ledger store.
//!
//! Tables live behind a single [`RwLock`]. While a transaction is open,
//! every mutation pushes its inverse onto an undo journal; rollback
//! replays the journal backwards, so a rejected call costs time
//! proportional to what it touched rather than to the size of the ledger.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AccountId, Amount, ExpiryQueue, QueueEntry, Symbol, Wager, WagerId};
use crate::error::{Error, Result};
use crate::port::{
    AccountWagerIndex, BalanceStore, ContractState, MatchedQueueStore, OpenWagerIndex,
    SymbolRegistry, SymbolReport, Transactional, WagerStore,
};

/// Ledger-wide singleton record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ContractRecord {
    minted: bool,
    reporter: Option<AccountId>,
    total_supply: Amount,
    next_wager_id: WagerId,
}

/// Every table of the ledger, in a serializable form.
///
/// Empty index entries are dropped rather than kept as empty collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerTables {
    #[serde(default)]
    balances: BTreeMap<AccountId, Amount>,
    #[serde(default)]
    wagers: BTreeMap<WagerId, Wager>,
    #[serde(default)]
    open: BTreeMap<Symbol, BTreeSet<WagerId>>,
    #[serde(default)]
    matched: BTreeMap<Symbol, ExpiryQueue>,
    #[serde(default)]
    accounts: BTreeMap<AccountId, Vec<WagerId>>,
    #[serde(default)]
    symbols: BTreeSet<Symbol>,
    #[serde(default)]
    reports: BTreeMap<Symbol, SymbolReport>,
    #[serde(default)]
    contract: ContractRecord,
}

/// Inverse of one mutation.
#[derive(Debug)]
enum Undo {
    Balance {
        account: AccountId,
        previous: Option<Amount>,
    },
    Wager {
        id: WagerId,
        previous: Option<Wager>,
    },
    OpenInserted {
        symbol: Symbol,
        id: WagerId,
    },
    OpenRemoved {
        symbol: Symbol,
        id: WagerId,
    },
    OpenCleared {
        symbol: Symbol,
        ids: BTreeSet<WagerId>,
    },
    MatchedPushed {
        symbol: Symbol,
        id: WagerId,
    },
    MatchedRemoved {
        symbol: Symbol,
        entry: QueueEntry,
    },
    MatchedCleared {
        symbol: Symbol,
        queue: ExpiryQueue,
    },
    Linked {
        account: AccountId,
        id: WagerId,
    },
    Unlinked {
        account: AccountId,
        index: usize,
        id: WagerId,
    },
    AccountCleared {
        account: AccountId,
        ids: Vec<WagerId>,
    },
    SymbolRegistered {
        symbol: Symbol,
    },
    Report {
        symbol: Symbol,
        previous: Option<SymbolReport>,
    },
    Contract {
        previous: ContractRecord,
    },
}

impl LedgerTables {
    fn undo(&mut self, step: Undo) {
        match step {
            Undo::Balance { account, previous } => match previous {
                Some(amount) => {
                    self.balances.insert(account, amount);
                }
                None => {
                    self.balances.remove(&account);
                }
            },
            Undo::Wager { id, previous } => match previous {
                Some(wager) => {
                    self.wagers.insert(id, wager);
                }
                None => {
                    self.wagers.remove(&id);
                }
            },
            Undo::OpenInserted { symbol, id } => {
                remove_from_set(&mut self.open, &symbol, id);
            }
            Undo::OpenRemoved { symbol, id } => {
                self.open.entry(symbol).or_default().insert(id);
            }
            Undo::OpenCleared { symbol, ids } => {
                self.open.insert(symbol, ids);
            }
            Undo::MatchedPushed { symbol, id } => {
                remove_from_queue(&mut self.matched, &symbol, id);
            }
            Undo::MatchedRemoved { symbol, entry } => {
                self.matched.entry(symbol).or_default().push(entry);
            }
            Undo::MatchedCleared { symbol, queue } => {
                self.matched.insert(symbol, queue);
            }
            Undo::Linked { account, id } => {
                remove_from_list(&mut self.accounts, &account, id);
            }
            Undo::Unlinked { account, index, id } => {
                let list = self.accounts.entry(account).or_default();
                list.insert(index.min(list.len()), id);
            }
            Undo::AccountCleared { account, ids } => {
                self.accounts.insert(account, ids);
            }
            Undo::SymbolRegistered { symbol } => {
                self.symbols.remove(&symbol);
            }
            Undo::Report { symbol, previous } => match previous {
                Some(report) => {
                    self.reports.insert(symbol, report);
                }
                None => {
                    self.reports.remove(&symbol);
                }
            },
            Undo::Contract { previous } => self.contract = previous,
        }
    }
}

fn remove_from_set(
    sets: &mut BTreeMap<Symbol, BTreeSet<WagerId>>,
    symbol: &Symbol,
    id: WagerId,
) -> bool {
    let Some(set) = sets.get_mut(symbol) else {
        return false;
    };
    let removed = set.remove(&id);
    if set.is_empty() {
        sets.remove(symbol);
    }
    removed
}

fn remove_from_queue(
    queues: &mut BTreeMap<Symbol, ExpiryQueue>,
    symbol: &Symbol,
    id: WagerId,
) -> Option<QueueEntry> {
    let queue = queues.get_mut(symbol)?;
    let removed = queue.remove(id);
    if queue.is_empty() {
        queues.remove(symbol);
    }
    removed
}

/// Returns the index the id was removed from.
fn remove_from_list(
    lists: &mut BTreeMap<AccountId, Vec<WagerId>>,
    account: &AccountId,
    id: WagerId,
) -> Option<usize> {
    let list = lists.get_mut(account)?;
    let index = list.iter().position(|linked| *linked == id)?;
    list.remove(index);
    if list.is_empty() {
        lists.remove(account);
    }
    Some(index)
}

#[derive(Debug, Default)]
struct Inner {
    tables: LedgerTables,
    journal: Option<Vec<Undo>>,
}

impl Inner {
    fn record(&mut self, step: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(step);
        }
    }
}

/// In-memory implementation of every ledger store port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously saved tables.
    #[must_use]
    pub fn from_tables(tables: LedgerTables) -> Self {
        Self {
            inner: RwLock::new(Inner {
                tables,
                journal: None,
            }),
        }
    }

    /// Copy of the current tables.
    #[must_use]
    pub fn tables(&self) -> LedgerTables {
        self.inner.read().tables.clone()
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.inner.read().journal.is_some()
    }
}

impl BalanceStore for MemoryStore {
    fn balance(&self, account: &AccountId) -> Result<Option<Amount>> {
        Ok(self.inner.read().tables.balances.get(account).copied())
    }

    fn set_balance(&self, account: &AccountId, amount: Amount) -> Result<()> {
        let mut inner = self.inner.write();
        let previous = inner.tables.balances.insert(account.clone(), amount);
        inner.record(Undo::Balance {
            account: account.clone(),
            previous,
        });
        Ok(())
    }

    fn balances(&self) -> Result<Vec<(AccountId, Amount)>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .balances
            .iter()
            .map(|(account, amount)| (account.clone(), *amount))
            .collect())
    }
}

impl WagerStore for MemoryStore {
    fn wager(&self, id: WagerId) -> Result<Option<Wager>> {
        Ok(self.inner.read().tables.wagers.get(&id).cloned())
    }

    fn put_wager(&self, wager: &Wager) -> Result<()> {
        let mut inner = self.inner.write();
        let previous = inner.tables.wagers.insert(wager.id(), wager.clone());
        inner.record(Undo::Wager {
            id: wager.id(),
            previous,
        });
        Ok(())
    }

    fn delete_wager(&self, id: WagerId) -> Result<bool> {
        let mut inner = self.inner.write();
        let previous = inner.tables.wagers.remove(&id);
        let existed = previous.is_some();
        if existed {
            inner.record(Undo::Wager { id, previous });
        }
        Ok(existed)
    }

    fn wagers(&self) -> Result<Vec<Wager>> {
        Ok(self.inner.read().tables.wagers.values().cloned().collect())
    }
}

impl OpenWagerIndex for MemoryStore {
    fn insert_open(&self, symbol: &Symbol, id: WagerId) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.tables.open.entry(symbol.clone()).or_default().insert(id) {
            inner.record(Undo::OpenInserted {
                symbol: symbol.clone(),
                id,
            });
        }
        Ok(())
    }

    fn remove_open(&self, symbol: &Symbol, id: WagerId) -> Result<bool> {
        let mut inner = self.inner.write();
        let removed = remove_from_set(&mut inner.tables.open, symbol, id);
        if removed {
            inner.record(Undo::OpenRemoved {
                symbol: symbol.clone(),
                id,
            });
        }
        Ok(removed)
    }

    fn open_wagers(&self, symbol: &Symbol) -> Result<Vec<WagerId>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .open
            .get(symbol)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    fn clear_open(&self, symbol: &Symbol) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(ids) = inner.tables.open.remove(symbol) {
            inner.record(Undo::OpenCleared {
                symbol: symbol.clone(),
                ids,
            });
        }
        Ok(())
    }
}

impl MatchedQueueStore for MemoryStore {
    fn push_matched(&self, symbol: &Symbol, entry: QueueEntry) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.tables.matched.entry(symbol.clone()).or_default().push(entry) {
            return Err(Error::Storage(format!(
                "wager {} is already queued for {symbol}",
                entry.wager_id()
            )));
        }
        inner.record(Undo::MatchedPushed {
            symbol: symbol.clone(),
            id: entry.wager_id(),
        });
        Ok(())
    }

    fn peek_matched(&self, symbol: &Symbol) -> Result<Option<QueueEntry>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .matched
            .get(symbol)
            .and_then(|queue| queue.peek().copied()))
    }

    fn pop_matched(&self, symbol: &Symbol) -> Result<Option<QueueEntry>> {
        let Some(first) = self.peek_matched(symbol)? else {
            return Ok(None);
        };
        self.remove_matched(symbol, first.wager_id())
    }

    fn remove_matched(&self, symbol: &Symbol, id: WagerId) -> Result<Option<QueueEntry>> {
        let mut inner = self.inner.write();
        let removed = remove_from_queue(&mut inner.tables.matched, symbol, id);
        if let Some(entry) = removed {
            inner.record(Undo::MatchedRemoved {
                symbol: symbol.clone(),
                entry,
            });
        }
        Ok(removed)
    }

    fn matched_wagers(&self, symbol: &Symbol) -> Result<Vec<QueueEntry>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .matched
            .get(symbol)
            .map(ExpiryQueue::sorted)
            .unwrap_or_default())
    }

    fn clear_matched(&self, symbol: &Symbol) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(queue) = inner.tables.matched.remove(symbol) {
            inner.record(Undo::MatchedCleared {
                symbol: symbol.clone(),
                queue,
            });
        }
        Ok(())
    }
}

impl AccountWagerIndex for MemoryStore {
    fn link_account(&self, account: &AccountId, id: WagerId) -> Result<()> {
        let mut inner = self.inner.write();
        let list = inner.tables.accounts.entry(account.clone()).or_default();
        if list.contains(&id) {
            return Ok(());
        }
        list.push(id);
        inner.record(Undo::Linked {
            account: account.clone(),
            id,
        });
        Ok(())
    }

    fn unlink_account(&self, account: &AccountId, id: WagerId) -> Result<bool> {
        let mut inner = self.inner.write();
        let Some(index) = remove_from_list(&mut inner.tables.accounts, account, id) else {
            return Ok(false);
        };
        inner.record(Undo::Unlinked {
            account: account.clone(),
            index,
            id,
        });
        Ok(true)
    }

    fn account_wagers(&self, account: &AccountId) -> Result<Vec<WagerId>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .accounts
            .get(account)
            .cloned()
            .unwrap_or_default())
    }

    fn clear_account(&self, account: &AccountId) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(ids) = inner.tables.accounts.remove(account) {
            inner.record(Undo::AccountCleared {
                account: account.clone(),
                ids,
            });
        }
        Ok(())
    }
}

impl SymbolRegistry for MemoryStore {
    fn register_symbol(&self, symbol: &Symbol) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.tables.symbols.insert(symbol.clone()) {
            inner.record(Undo::SymbolRegistered {
                symbol: symbol.clone(),
            });
        }
        Ok(())
    }

    fn symbols(&self) -> Result<Vec<Symbol>> {
        Ok(self.inner.read().tables.symbols.iter().cloned().collect())
    }

    fn record_report(&self, symbol: &Symbol, report: SymbolReport) -> Result<()> {
        let mut inner = self.inner.write();
        let previous = inner.tables.reports.insert(symbol.clone(), report);
        inner.record(Undo::Report {
            symbol: symbol.clone(),
            previous,
        });
        Ok(())
    }

    fn last_report(&self, symbol: &Symbol) -> Result<Option<SymbolReport>> {
        Ok(self.inner.read().tables.reports.get(symbol).copied())
    }
}

impl ContractState for MemoryStore {
    fn is_minted(&self) -> Result<bool> {
        Ok(self.inner.read().tables.contract.minted)
    }

    fn mark_minted(&self, total_supply: Amount, reporter: &AccountId) -> Result<()> {
        let mut inner = self.inner.write();
        let previous = inner.tables.contract.clone();
        let contract = &mut inner.tables.contract;
        contract.minted = true;
        contract.total_supply = total_supply;
        contract.reporter = Some(reporter.clone());
        inner.record(Undo::Contract { previous });
        Ok(())
    }

    fn reporter(&self) -> Result<Option<AccountId>> {
        Ok(self.inner.read().tables.contract.reporter.clone())
    }

    fn total_supply(&self) -> Result<Amount> {
        Ok(self.inner.read().tables.contract.total_supply)
    }

    fn allocate_wager_id(&self) -> Result<WagerId> {
        let mut inner = self.inner.write();
        let previous = inner.tables.contract.clone();
        let id = previous.next_wager_id;
        inner.tables.contract.next_wager_id = id.next();
        inner.record(Undo::Contract { previous });
        Ok(id)
    }
}

impl Transactional for MemoryStore {
    fn begin(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.journal.is_some() {
            return Err(Error::Storage("transaction already in progress".into()));
        }
        inner.journal = Some(Vec::new());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner
            .journal
            .take()
            .ok_or_else(|| Error::Storage("no transaction in progress".into()))?;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let mut inner = self.inner.write();
        let journal = inner
            .journal
            .take()
            .ok_or_else(|| Error::Storage("no transaction in progress".into()))?;
        debug!(steps = journal.len(), "Rolling back transaction");
        for step in journal.into_iter().rev() {
            inner.tables.undo(step);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewWager, Side};

    fn account(name: &str) -> AccountId {
        AccountId::from(name)
    }

    fn wager(id: u64) -> Wager {
        let terms = NewWager::new("BTC", Side::Over, 100, 10, 50);
        Wager::open(WagerId::new(id), terms, account("alice"))
    }

    #[test]
    fn fresh_store_allocates_from_one() {
        let store = MemoryStore::new();
        assert!(!store.is_minted().unwrap());
        assert_eq!(store.total_supply().unwrap(), 0);
        assert_eq!(store.allocate_wager_id().unwrap(), WagerId::new(1));
        assert_eq!(store.allocate_wager_id().unwrap(), WagerId::new(2));
    }

    #[test]
    fn rollback_restores_every_table() {
        let store = MemoryStore::new();
        let symbol = Symbol::from("BTC");
        store.set_balance(&account("alice"), 100).unwrap();
        store.link_account(&account("alice"), WagerId::new(1)).unwrap();
        store.link_account(&account("alice"), WagerId::new(2)).unwrap();
        store
            .push_matched(&symbol, QueueEntry::new(WagerId::new(1), 10))
            .unwrap();
        let before = serde_json::to_value(store.tables()).unwrap();

        store.begin().unwrap();
        store.set_balance(&account("alice"), 90).unwrap();
        store.set_balance(&account("bob"), 10).unwrap();
        store.put_wager(&wager(3)).unwrap();
        store.insert_open(&symbol, WagerId::new(3)).unwrap();
        store.unlink_account(&account("alice"), WagerId::new(1)).unwrap();
        store.pop_matched(&symbol).unwrap();
        store
            .push_matched(&symbol, QueueEntry::new(WagerId::new(4), 5))
            .unwrap();
        store.register_symbol(&symbol).unwrap();
        store.mark_minted(1_000, &account("alice")).unwrap();
        store.allocate_wager_id().unwrap();
        store.rollback().unwrap();

        assert_eq!(serde_json::to_value(store.tables()).unwrap(), before);
        assert_eq!(
            store.account_wagers(&account("alice")).unwrap(),
            vec![WagerId::new(1), WagerId::new(2)]
        );
        assert_eq!(store.balance(&account("bob")).unwrap(), None);
        assert!(!store.in_transaction());
    }

    #[test]
    fn commit_keeps_changes() {
        let store = MemoryStore::new();
        store.begin().unwrap();
        store.set_balance(&account("alice"), 5).unwrap();
        store.commit().unwrap();

        assert_eq!(store.balance(&account("alice")).unwrap(), Some(5));
        assert!(store.rollback().is_err());
    }

    #[test]
    fn nested_begin_is_rejected() {
        let store = MemoryStore::new();
        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(Error::Storage(_))));
    }

    #[test]
    fn empty_index_entries_are_dropped() {
        let store = MemoryStore::new();
        let symbol = Symbol::from("ETH");
        store.insert_open(&symbol, WagerId::new(1)).unwrap();
        assert!(store.remove_open(&symbol, WagerId::new(1)).unwrap());
        assert!(!store.remove_open(&symbol, WagerId::new(1)).unwrap());
        assert!(store.tables().open.is_empty());
    }

    #[test]
    fn duplicate_queue_push_is_an_error() {
        let store = MemoryStore::new();
        let symbol = Symbol::from("ETH");
        let entry = QueueEntry::new(WagerId::new(1), 10);
        store.push_matched(&symbol, entry).unwrap();
        assert!(store.push_matched(&symbol, entry).is_err());
    }

    #[test]
    fn link_is_idempotent_and_ordered() {
        let store = MemoryStore::new();
        let alice = account("alice");
        for id in [3, 1, 3, 2] {
            store.link_account(&alice, WagerId::new(id)).unwrap();
        }
        let ids: Vec<_> = store
            .account_wagers(&alice)
            .unwrap()
            .iter()
            .map(WagerId::value)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
