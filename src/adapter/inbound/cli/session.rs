//! One CLI invocation against the state file.
//!
//! The session loads the configuration and the ledger state, pins the
//! clock, and writes the state back only after a call has committed.

use std::path::Path;

use tracing::debug;

use super::command::Cli;
use crate::adapter::outbound::{FixedClock, MemoryStore, StateFile, SystemClock};
use crate::application::WagerBook;
use crate::domain::{AccountId, AccountIssue, LedgerError, Timestamp};
use crate::error::Result;
use crate::infrastructure::accounts::AccountPolicy;
use crate::infrastructure::config::settings::Config;
use crate::port::{AccountRules, CallContext, Clock};

/// Loaded ledger plus the host parameters of this invocation.
pub struct Session {
    book: WagerBook<MemoryStore>,
    state: StateFile,
    accounts: AccountPolicy,
    clock: Box<dyn Clock>,
}

impl Session {
    /// Load the state file named by the CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists but cannot be read.
    pub fn open(cli: &Cli, config: &Config) -> Result<Self> {
        let state = StateFile::new(cli.state.clone());
        let store = state.load()?;
        let accounts = config.account_policy();
        let book = WagerBook::new(store, config.book_settings()).with_account_rules(accounts);
        Ok(Self {
            book,
            state,
            accounts,
            clock: clock(cli.at),
        })
    }

    pub fn book(&self) -> &WagerBook<MemoryStore> {
        &self.book
    }

    pub fn state_path(&self) -> &Path {
        self.state.path()
    }

    /// Build the call context for `caller` at the pinned clock.
    ///
    /// # Errors
    ///
    /// `InvalidAccount` when `caller` is not a well-formed account id.
    pub fn call(&self, caller: &str) -> Result<CallContext> {
        if !self.accounts.is_valid_account(caller) {
            return Err(
                LedgerError::account(&AccountId::from(caller), AccountIssue::Malformed).into(),
            );
        }
        Ok(CallContext::at(self.clock.as_ref(), caller))
    }

    /// Persist the committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.state.save(self.book.store())?;
        debug!(path = %self.state.path().display(), "Ledger state saved");
        Ok(())
    }
}

fn clock(at: Option<Timestamp>) -> Box<dyn Clock> {
    match at {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    }
}
