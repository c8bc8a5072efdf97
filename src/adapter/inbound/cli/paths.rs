//! Path utilities for overunder.
//!
//! All data lives under `~/.overunder/`:
//! - `~/.overunder/config.toml` - configuration
//! - `~/.overunder/ledger.json` - ledger state

use std::path::PathBuf;

/// Returns the overunder home directory (`~/.overunder/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".overunder")
}

/// Returns the default config file path (`~/.overunder/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default state file path (`~/.overunder/ledger.json`).
pub fn default_state() -> PathBuf {
    home_dir().join("ledger.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_overunder_home() {
        assert!(home_dir().to_string_lossy().contains(".overunder"));
        assert!(default_config().ends_with(".overunder/config.toml"));
        assert!(default_state().ends_with(".overunder/ledger.json"));
    }
}
