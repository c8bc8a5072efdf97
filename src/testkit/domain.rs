//! Builders for domain primitives used across tests.

use crate::domain::{AccountId, Amount, NewWager, Side, Symbol, Timestamp, Value};
use crate::port::CallContext;

/// Create an [`AccountId`] from a string.
pub fn account(id: &str) -> AccountId {
    AccountId::from(id)
}

/// Create a [`Symbol`] from a string.
pub fn symbol(name: &str) -> Symbol {
    Symbol::from(name)
}

/// Call made by `caller` at time `now`.
pub fn ctx(caller: &str, now: Timestamp) -> CallContext {
    CallContext::new(caller, now)
}

/// Over-side terms with no cancel-after threshold.
pub fn over(symbol: &str, strike: Value, bet: Amount, expires_at: Timestamp) -> NewWager {
    NewWager::new(symbol, Side::Over, strike, bet, expires_at)
}

/// Under-side terms with no cancel-after threshold.
pub fn under(symbol: &str, strike: Value, bet: Amount, expires_at: Timestamp) -> NewWager {
    NewWager::new(symbol, Side::Under, strike, bet, expires_at)
}
