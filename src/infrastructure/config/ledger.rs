//! Ledger and account-identifier configuration.

use serde::{Deserialize, Serialize};

use crate::application::book::{BookSettings, DEFAULT_MAX_SYMBOL_LEN, DEFAULT_TOTAL_SUPPLY};
use crate::domain::Amount;
use crate::infrastructure::accounts::AccountPolicy;

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Supply credited to the minter. Fixed once the ledger is minted.
    #[serde(default = "default_total_supply")]
    pub total_supply: Amount,
    /// Longest accepted symbol, in characters.
    #[serde(default = "default_max_symbol_len")]
    pub max_symbol_len: usize,
}

const fn default_total_supply() -> Amount {
    DEFAULT_TOTAL_SUPPLY
}

const fn default_max_symbol_len() -> usize {
    DEFAULT_MAX_SYMBOL_LEN
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            total_supply: default_total_supply(),
            max_symbol_len: default_max_symbol_len(),
        }
    }
}

impl From<&LedgerConfig> for BookSettings {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            total_supply: config.total_supply,
            max_symbol_len: config.max_symbol_len,
        }
    }
}

/// Account identifier syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

const fn default_min_len() -> usize {
    1
}

const fn default_max_len() -> usize {
    64
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            min_len: default_min_len(),
            max_len: default_max_len(),
        }
    }
}

impl From<&AccountsConfig> for AccountPolicy {
    fn from(config: &AccountsConfig) -> Self {
        Self::new(config.min_len, config.max_len)
    }
}
