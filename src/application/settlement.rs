//! Oracle reports and the settlement drain.

use serde::Serialize;
use tracing::{debug, info};

use super::ledger::BalanceLedger;
use super::lifecycle::{check_symbol, WagerRegistry};
use crate::domain::{AccountIssue, LedgerError, Settlement, Symbol, Timestamp, Value};
use crate::error::{Error, Result};
use crate::port::{CallContext, LedgerStore, SymbolReport};

/// Everything one report resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementSummary {
    pub symbol: Symbol,
    pub value: Value,
    pub reported_at: Timestamp,
    /// Settled wagers in the order they left the queue.
    pub settlements: Vec<Settlement>,
}

impl SettlementSummary {
    #[must_use]
    pub fn settled(&self) -> usize {
        self.settlements.len()
    }
}

/// Settles matched wagers against reported values.
pub struct SettlementEngine<'a, S: ?Sized> {
    store: &'a S,
    max_symbol_len: usize,
}

impl<'a, S> SettlementEngine<'a, S>
where
    S: LedgerStore + ?Sized,
{
    pub const fn new(store: &'a S, max_symbol_len: usize) -> Self {
        Self {
            store,
            max_symbol_len,
        }
    }

    /// Record `value` for `symbol` and settle every matched wager on it
    /// whose expiry is strictly before `now`, earliest first.
    ///
    /// Wagers expiring at exactly `now` stay queued for a later report.
    ///
    /// # Errors
    ///
    /// - `InvalidAccount` when the caller is not the reporter
    /// - `InvalidSymbol` for an empty or over-long symbol
    pub fn report(
        &self,
        ctx: &CallContext,
        symbol: &Symbol,
        value: Value,
    ) -> Result<SettlementSummary> {
        if self.store.reporter()?.as_ref() != Some(ctx.caller()) {
            return Err(LedgerError::account(ctx.caller(), AccountIssue::NotReporter).into());
        }
        check_symbol(symbol, self.max_symbol_len)?;

        let now = ctx.now();
        self.store.record_report(
            symbol,
            SymbolReport {
                value,
                reported_at: now,
            },
        )?;

        let ledger = BalanceLedger::new(self.store);
        let registry = WagerRegistry::new(self.store, self.max_symbol_len);
        let mut settlements = Vec::new();

        while let Some(head) = self.store.peek_matched(symbol)? {
            if !head.is_matured(now) {
                break;
            }
            let id = head.wager_id();
            let wager = registry.wager(id)?;
            let settlement = Settlement::compute(&wager, value).ok_or_else(|| {
                Error::Storage(format!("queued wager {id} has an open side"))
            })?;

            for credit in &settlement.credits {
                ledger.credit(&credit.account, credit.amount)?;
            }
            registry.retire(&wager)?;

            info!(
                wager_id = %id,
                symbol = %symbol,
                strike = settlement.strike,
                value,
                outcome = %settlement.outcome,
                "Wager settled"
            );
            settlements.push(settlement);
        }

        debug!(symbol = %symbol, value, settled = settlements.len(), "Report processed");
        Ok(SettlementSummary {
            symbol: symbol.clone(),
            value,
            reported_at: now,
            settlements,
        })
    }
}
