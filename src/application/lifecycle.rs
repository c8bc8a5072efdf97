//! Wager registry and lifecycle controller.
//!
//! Owns the `Open -> Matched -> Terminal` and `Open -> Terminal`
//! transitions and keeps the open-set, the matched queue and the
//! per-account lists in lock-step with them. Every path that ends a
//! wager goes through [`WagerRegistry::retire`].

use serde::Serialize;
use tracing::{debug, info, warn};

use super::ledger::BalanceLedger;
use crate::domain::{
    AcceptRefusal, CancelRefusal, Credit, LedgerError, NewWager, QueueEntry, Symbol, Wager,
    WagerId, WagerState,
};
use crate::error::Result;
use crate::port::{CallContext, LedgerStore};

/// Result of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cancellation {
    pub wager_id: WagerId,
    pub symbol: Symbol,
    /// State the wager was cancelled from.
    pub state: WagerState,
    pub refunds: Vec<Credit>,
}

/// Check a symbol against the configured length bound.
pub(crate) fn check_symbol(symbol: &Symbol, max_len: usize) -> Result<()> {
    let reason = if symbol.is_empty() {
        "must not be empty".to_string()
    } else if symbol.len() > max_len {
        format!("longer than {max_len} characters")
    } else {
        return Ok(());
    };
    Err(LedgerError::InvalidSymbol {
        symbol: symbol.to_string(),
        reason,
    }
    .into())
}

/// Lifecycle transitions over a store.
pub struct WagerRegistry<'a, S: ?Sized> {
    store: &'a S,
    max_symbol_len: usize,
}

impl<'a, S> WagerRegistry<'a, S>
where
    S: LedgerStore + ?Sized,
{
    pub const fn new(store: &'a S, max_symbol_len: usize) -> Self {
        Self {
            store,
            max_symbol_len,
        }
    }

    fn ledger(&self) -> BalanceLedger<'a, S> {
        BalanceLedger::new(self.store)
    }

    /// Load a live wager.
    ///
    /// # Errors
    ///
    /// `InvalidWager` when no record exists for `id`.
    pub fn wager(&self, id: WagerId) -> Result<Wager> {
        self.store
            .wager(id)?
            .ok_or_else(|| LedgerError::InvalidWager { id }.into())
    }

    /// Escrow the caller's bet and open a wager on the requested side.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for a zero bet or strike
    /// - `InvalidTime` for an expiry not after `now`, or a cancel-after
    ///   threshold not after the expiry
    /// - `InvalidSymbol` for an empty or over-long symbol
    /// - `InvalidAccount` when the caller has no balance record
    /// - `InsufficientBalance` when the caller cannot cover the bet
    pub fn create(&self, ctx: &CallContext, terms: NewWager) -> Result<Wager> {
        let now = ctx.now();
        if terms.bet == 0 {
            return Err(LedgerError::InvalidAmount {
                field: "bet",
                amount: terms.bet,
            }
            .into());
        }
        if terms.strike == 0 {
            return Err(LedgerError::InvalidAmount {
                field: "strike",
                amount: terms.strike,
            }
            .into());
        }
        if terms.expires_at <= now {
            return Err(LedgerError::InvalidTime {
                field: "expiry",
                value: terms.expires_at,
                after: now,
            }
            .into());
        }
        if let Some(at) = terms.cancel_after {
            if at <= terms.expires_at {
                return Err(LedgerError::InvalidTime {
                    field: "cancel_after",
                    value: at,
                    after: terms.expires_at,
                }
                .into());
            }
        }
        check_symbol(&terms.symbol, self.max_symbol_len)?;

        let caller = ctx.caller();
        let ledger = self.ledger();
        ledger.require_record(caller)?;
        ledger.debit(caller, terms.bet)?;

        let side = terms.side;
        let id = self.store.allocate_wager_id()?;
        let wager = Wager::open(id, terms, caller.clone());
        self.store.put_wager(&wager)?;
        self.store.insert_open(wager.symbol(), id)?;
        self.store.link_account(caller, id)?;
        self.store.register_symbol(wager.symbol())?;

        info!(
            wager_id = %id,
            symbol = %wager.symbol(),
            creator = %caller,
            side = %side,
            strike = wager.strike(),
            bet = wager.bet(),
            expires_at = wager.expires_at(),
            "Wager created"
        );
        Ok(wager)
    }

    /// Take the open side of a wager, moving it to the matched queue.
    ///
    /// # Errors
    ///
    /// - `InvalidWager` for an unknown id
    /// - `InvalidAccount` when the caller has no balance record
    /// - `CannotAccept` when the wager has expired, is already matched, or
    ///   the caller holds the other side
    /// - `InsufficientBalance` when the caller cannot cover the bet
    pub fn accept(&self, ctx: &CallContext, id: WagerId) -> Result<Wager> {
        let mut wager = self.wager(id)?;
        let caller = ctx.caller();
        let ledger = self.ledger();
        ledger.require_record(caller)?;

        if wager.is_expired(ctx.now()) {
            return Err(LedgerError::CannotAccept {
                id,
                reason: AcceptRefusal::Expired,
            }
            .into());
        }
        let side = wager
            .fill(caller.clone())
            .map_err(|reason| LedgerError::CannotAccept { id, reason })?;
        ledger.debit(caller, wager.bet())?;

        self.store.put_wager(&wager)?;
        self.store.link_account(caller, id)?;
        self.store.remove_open(wager.symbol(), id)?;
        self.store
            .push_matched(wager.symbol(), QueueEntry::new(id, wager.expires_at()))?;

        info!(
            wager_id = %id,
            symbol = %wager.symbol(),
            taker = %caller,
            side = %side,
            expires_at = wager.expires_at(),
            "Wager matched"
        );
        Ok(wager)
    }

    /// Cancel a wager and refund every escrowed bet.
    ///
    /// An Open wager may be cancelled by its only participant at any time.
    /// A Matched wager may be cancelled by either participant once its
    /// cancel-after threshold has been reached; both sides are refunded
    /// and its queue entry is removed.
    ///
    /// # Errors
    ///
    /// - `InvalidWager` for an unknown id
    /// - `InvalidAccount` when the caller has no balance record
    /// - `CannotCancel` when the caller holds no side, or the wager is
    ///   matched and not yet cancellable
    pub fn cancel(&self, ctx: &CallContext, id: WagerId) -> Result<Cancellation> {
        let wager = self.wager(id)?;
        let caller = ctx.caller();
        let ledger = self.ledger();
        ledger.require_record(caller)?;

        if !wager.is_participant(caller) {
            return Err(LedgerError::CannotCancel {
                id,
                reason: CancelRefusal::NotParticipant,
            }
            .into());
        }
        let state = wager.state();
        if state == WagerState::Matched && !wager.cancel_unlocked(ctx.now()) {
            return Err(LedgerError::CannotCancel {
                id,
                reason: CancelRefusal::Matched,
            }
            .into());
        }

        let refunds = wager.refunds();
        for refund in &refunds {
            ledger.credit(&refund.account, refund.amount)?;
        }
        self.retire(&wager)?;

        info!(
            wager_id = %id,
            symbol = %wager.symbol(),
            by = %caller,
            state = %state,
            refunded = wager.escrowed(),
            "Wager cancelled"
        );
        Ok(Cancellation {
            wager_id: id,
            symbol: wager.symbol().clone(),
            state,
            refunds,
        })
    }

    /// Remove a wager from every index that references it and delete its
    /// record.
    ///
    /// Participants are taken from the record itself, never from whoever
    /// triggered the call.
    pub(crate) fn retire(&self, wager: &Wager) -> Result<()> {
        let id = wager.id();
        let symbol = wager.symbol();
        match wager.state() {
            WagerState::Open => {
                self.store.remove_open(symbol, id)?;
            }
            WagerState::Matched => {
                self.store.remove_matched(symbol, id)?;
            }
        }
        for account in wager.participants() {
            if !self.store.unlink_account(account, id)? {
                warn!(wager_id = %id, account = %account, "Wager missing from account list");
            }
        }
        if !self.store.delete_wager(id)? {
            return Err(LedgerError::InvalidWager { id }.into());
        }
        debug!(wager_id = %id, symbol = %symbol, "Wager retired");
        Ok(())
    }
}
