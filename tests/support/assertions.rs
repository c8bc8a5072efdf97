use std::fmt::Debug;

use overunder::adapter::outbound::MemoryStore;
use overunder::application::WagerBook;
use overunder::domain::LedgerError;
use overunder::error::{Error, Result};

/// The ledger error a rejected call returned.
pub fn rejection<T: Debug>(result: Result<T>) -> LedgerError {
    match result {
        Err(Error::Ledger(err)) => err,
        other => panic!("expected a ledger rejection, got {other:?}"),
    }
}

/// Kind name of the ledger error a rejected call returned.
pub fn rejection_code<T: Debug>(result: Result<T>) -> &'static str {
    rejection(result).code()
}

/// Balances plus escrow equal the supply and every index agrees with the
/// wager records.
pub fn assert_books_balance(book: &WagerBook<MemoryStore>) {
    let report = book.audit().expect("audit");
    assert!(report.is_balanced(), "books do not balance: {report:?}");
    assert!(report.is_consistent(), "indexes diverged: {report:?}");
}

/// Serialized tables, for before/after comparisons.
pub fn snapshot(book: &WagerBook<MemoryStore>) -> serde_json::Value {
    serde_json::to_value(book.store().tables()).expect("serialize tables")
}
