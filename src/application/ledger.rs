//! Balance ledger: the one-time mint, transfers, and the debit/credit
//! pair every escrow goes through.

use tracing::{debug, info};

use crate::domain::{AccountId, AccountIssue, Amount, LedgerError};
use crate::error::{Error, Result};
use crate::port::{AccountRules, BalanceStore, CallContext, ContractState};

/// Balance operations over a store.
///
/// Debits check sufficiency before writing, so no negative balance is ever
/// stored.
pub struct BalanceLedger<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> BalanceLedger<'a, S>
where
    S: BalanceStore + ContractState + ?Sized,
{
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Balance of an account, zero if it has no record.
    pub fn balance(&self, account: &AccountId) -> Result<Amount> {
        Ok(self.store.balance(account)?.unwrap_or(0))
    }

    /// Balance of an account that must already hold a record.
    ///
    /// # Errors
    ///
    /// `InvalidAccount` when the account has never held funds.
    pub fn require_record(&self, account: &AccountId) -> Result<Amount> {
        self.store
            .balance(account)?
            .ok_or_else(|| LedgerError::account(account, AccountIssue::NoBalanceRecord).into())
    }

    /// Credit the whole supply to the caller and make it the reporter.
    ///
    /// # Errors
    ///
    /// `AlreadyMinted` on every call after the first.
    pub fn mint(&self, ctx: &CallContext, supply: Amount) -> Result<Amount> {
        if self.store.is_minted()? {
            return Err(LedgerError::AlreadyMinted.into());
        }
        self.store.mark_minted(supply, ctx.caller())?;
        self.credit(ctx.caller(), supply)?;
        info!(reporter = %ctx.caller(), supply, "Ledger minted");
        Ok(supply)
    }

    /// Move `amount` from the caller to `to`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for a zero amount
    /// - `InvalidAccount` for a malformed recipient or a caller without a
    ///   balance record
    /// - `InsufficientBalance` when the caller holds less than `amount`
    pub fn transfer(
        &self,
        ctx: &CallContext,
        to: &AccountId,
        amount: Amount,
        rules: &dyn AccountRules,
    ) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount {
                field: "amount",
                amount,
            }
            .into());
        }
        if !rules.is_valid_account(to.as_str()) {
            return Err(LedgerError::account(to, AccountIssue::Malformed).into());
        }
        let caller = ctx.caller();
        self.require_record(caller)?;
        self.debit(caller, amount)?;
        self.credit(to, amount)?;
        info!(from = %caller, to = %to, amount, "Transfer");
        Ok(())
    }

    /// Take `amount` out of an account. Returns the remaining balance.
    pub(crate) fn debit(&self, account: &AccountId, amount: Amount) -> Result<Amount> {
        let available = self.balance(account)?;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                available,
                required: amount,
            }
            .into());
        }
        let remaining = available - amount;
        self.store.set_balance(account, remaining)?;
        debug!(account = %account, amount, remaining, "Debit");
        Ok(remaining)
    }

    /// Add `amount` to an account, creating its record if needed.
    /// Returns the new balance.
    pub(crate) fn credit(&self, account: &AccountId, amount: Amount) -> Result<Amount> {
        let updated = self
            .balance(account)?
            .checked_add(amount)
            .ok_or_else(|| Error::Storage(format!("balance overflow crediting {account}")))?;
        self.store.set_balance(account, updated)?;
        debug!(account = %account, amount, balance = updated, "Credit");
        Ok(updated)
    }
}
