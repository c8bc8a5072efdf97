//! The wager book: every ledger entry point behind one facade.
//!
//! Each mutating call runs inside a store transaction. A call that fails
//! for any reason is rolled back in full, so callers only ever observe the
//! state before or after a complete call.

use tracing::{error, warn};

use super::audit::{audit, AuditReport};
use super::ledger::BalanceLedger;
use super::lifecycle::{Cancellation, WagerRegistry};
use super::settlement::{SettlementEngine, SettlementSummary};
use crate::domain::{AccountId, Amount, NewWager, QueueEntry, Symbol, Value, Wager, WagerId};
use crate::error::Result;
use crate::infrastructure::accounts::AccountPolicy;
use crate::port::{AccountRules, CallContext, LedgerStore, SymbolReport};

/// Supply credited to the first minter.
pub const DEFAULT_TOTAL_SUPPLY: Amount = 100_000_000;

/// Longest symbol accepted by create and report.
pub const DEFAULT_MAX_SYMBOL_LEN: usize = 32;

/// Ledger-wide parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSettings {
    pub total_supply: Amount,
    pub max_symbol_len: usize,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            total_supply: DEFAULT_TOTAL_SUPPLY,
            max_symbol_len: DEFAULT_MAX_SYMBOL_LEN,
        }
    }
}

/// Over/under wager ledger over a store.
pub struct WagerBook<S> {
    store: S,
    settings: BookSettings,
    accounts: Box<dyn AccountRules>,
}

impl<S: LedgerStore> WagerBook<S> {
    /// Create a book with the default account policy.
    pub fn new(store: S, settings: BookSettings) -> Self {
        Self {
            store,
            settings,
            accounts: Box::new(AccountPolicy::default()),
        }
    }

    #[must_use]
    pub fn with_account_rules(mut self, rules: impl AccountRules + 'static) -> Self {
        self.accounts = Box::new(rules);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn settings(&self) -> &BookSettings {
        &self.settings
    }

    fn ledger(&self) -> BalanceLedger<'_, S> {
        BalanceLedger::new(&self.store)
    }

    fn registry(&self) -> WagerRegistry<'_, S> {
        WagerRegistry::new(&self.store, self.settings.max_symbol_len)
    }

    /// Run `f` as one all-or-nothing call.
    fn atomically<T>(
        &self,
        operation: &'static str,
        ctx: &CallContext,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        self.store.begin()?;
        match f() {
            Ok(value) => {
                self.store.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.store.rollback() {
                    error!(operation, error = %rollback, "Rollback failed");
                }
                warn!(operation, caller = %ctx.caller(), error = %err, "Call rejected");
                Err(err)
            }
        }
    }

    /// Credit the configured total supply to the caller, who becomes the
    /// reporter. Succeeds once per ledger.
    ///
    /// # Errors
    ///
    /// `AlreadyMinted` after the first successful mint.
    pub fn mint(&self, ctx: &CallContext) -> Result<Amount> {
        self.atomically("mint", ctx, || {
            self.ledger().mint(ctx, self.settings.total_supply)
        })
    }

    /// Move `amount` from the caller to `to`.
    pub fn transfer(&self, ctx: &CallContext, to: &AccountId, amount: Amount) -> Result<()> {
        self.atomically("transfer", ctx, || {
            self.ledger().transfer(ctx, to, amount, self.accounts.as_ref())
        })
    }

    /// Open a wager with the caller on `terms.side`, escrowing the bet.
    pub fn create_wager(&self, ctx: &CallContext, terms: NewWager) -> Result<WagerId> {
        self.atomically("create_wager", ctx, || {
            self.registry().create(ctx, terms).map(|wager| wager.id())
        })
    }

    /// Take the open side of wager `id`.
    pub fn accept_wager(&self, ctx: &CallContext, id: WagerId) -> Result<Wager> {
        self.atomically("accept_wager", ctx, || self.registry().accept(ctx, id))
    }

    /// Cancel wager `id` and refund its escrow.
    pub fn cancel_wager(&self, ctx: &CallContext, id: WagerId) -> Result<Cancellation> {
        self.atomically("cancel_wager", ctx, || self.registry().cancel(ctx, id))
    }

    /// Report a value for `symbol` and settle every matured wager on it.
    pub fn report_symbol(
        &self,
        ctx: &CallContext,
        symbol: &Symbol,
        value: Value,
    ) -> Result<SettlementSummary> {
        self.atomically("report_symbol", ctx, || {
            SettlementEngine::new(&self.store, self.settings.max_symbol_len)
                .report(ctx, symbol, value)
        })
    }

    /// Every symbol that has ever had a wager.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        self.store.symbols()
    }

    /// Open wagers on `symbol`, by id.
    pub fn open_wagers(&self, symbol: &Symbol) -> Result<Vec<WagerId>> {
        self.store.open_wagers(symbol)
    }

    /// Matched wagers on `symbol`, in settlement order.
    pub fn matched_wagers(&self, symbol: &Symbol) -> Result<Vec<WagerId>> {
        Ok(self
            .matched_queue(symbol)?
            .into_iter()
            .map(|entry| entry.wager_id())
            .collect())
    }

    /// Matched queue entries on `symbol`, in settlement order.
    pub fn matched_queue(&self, symbol: &Symbol) -> Result<Vec<QueueEntry>> {
        self.store.matched_wagers(symbol)
    }

    /// Live wagers the account holds a side of, in the order it joined them.
    pub fn account_wagers(&self, account: &AccountId) -> Result<Vec<WagerId>> {
        self.store.account_wagers(account)
    }

    /// # Errors
    ///
    /// `InvalidWager` when `id` is unknown or already terminal.
    pub fn wager(&self, id: WagerId) -> Result<Wager> {
        self.registry().wager(id)
    }

    pub fn balance(&self, account: &AccountId) -> Result<Amount> {
        self.ledger().balance(account)
    }

    /// The minted supply, or the configured one before the mint.
    pub fn total_supply(&self) -> Result<Amount> {
        if self.store.is_minted()? {
            self.store.total_supply()
        } else {
            Ok(self.settings.total_supply)
        }
    }

    pub fn reporter(&self) -> Result<Option<AccountId>> {
        self.store.reporter()
    }

    pub fn last_report(&self, symbol: &Symbol) -> Result<Option<SymbolReport>> {
        self.store.last_report(symbol)
    }

    pub fn audit(&self) -> Result<AuditReport> {
        audit(&self.store)
    }
}

#[cfg(any(test, feature = "testkit"))]
impl<S: LedgerStore> WagerBook<S> {
    fn require_reporter(&self, ctx: &CallContext) -> Result<()> {
        if self.store.reporter()?.as_ref() == Some(ctx.caller()) {
            Ok(())
        } else {
            Err(crate::domain::LedgerError::account(
                ctx.caller(),
                crate::domain::AccountIssue::NotReporter,
            )
            .into())
        }
    }

    /// Drop an account's wager list without touching the wagers.
    pub fn clear_account_index(&self, ctx: &CallContext, account: &AccountId) -> Result<()> {
        self.atomically("clear_account_index", ctx, || {
            self.require_reporter(ctx)?;
            self.store.clear_account(account)
        })
    }

    /// Drop a symbol's open set and matched queue without touching the
    /// wagers.
    pub fn clear_symbol_index(&self, ctx: &CallContext, symbol: &Symbol) -> Result<()> {
        self.atomically("clear_symbol_index", ctx, || {
            self.require_reporter(ctx)?;
            self.store.clear_open(symbol)?;
            self.store.clear_matched(symbol)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::MemoryStore;
    use crate::domain::{LedgerError, Side};

    fn book() -> WagerBook<MemoryStore> {
        WagerBook::new(
            MemoryStore::new(),
            BookSettings {
                total_supply: 1_000,
                ..BookSettings::default()
            },
        )
    }

    #[test]
    fn rejected_call_leaves_no_partial_state() {
        let book = book();
        let alice = CallContext::new("alice", 0);
        book.mint(&alice).unwrap();
        let before = serde_json::to_value(book.store().tables()).unwrap();

        let err = book
            .create_wager(&alice, NewWager::new("X", Side::Over, 10, 2_000, 5))
            .unwrap_err();
        assert_eq!(err.as_ledger().map(LedgerError::code), Some("InsufficientBalance"));
        assert_eq!(serde_json::to_value(book.store().tables()).unwrap(), before);
        assert!(!book.store().in_transaction());
    }

    #[test]
    fn total_supply_follows_mint() {
        let book = book();
        assert_eq!(book.total_supply().unwrap(), 1_000);
        book.mint(&CallContext::new("alice", 0)).unwrap();
        assert_eq!(book.total_supply().unwrap(), 1_000);
        assert_eq!(book.reporter().unwrap(), Some("alice".into()));
    }

    #[test]
    fn admin_clears_are_reporter_only() {
        let book = book();
        book.mint(&CallContext::new("alice", 0)).unwrap();
        let bob = CallContext::new("bob", 0);
        assert!(book.clear_symbol_index(&bob, &"X".into()).is_err());
        assert!(book
            .clear_account_index(&CallContext::new("alice", 0), &"alice".into())
            .is_ok());
    }
}
