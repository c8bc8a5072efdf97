//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use super::diagnostic;
use super::output;
use crate::error::{ConfigError, Error};
use crate::infrastructure::config::settings::Config;

/// Execute `config show`: the effective configuration, defaults applied.
pub fn execute_show(path: &Path) -> miette::Result<()> {
    let config = load(path)?;

    if output::is_json() {
        output::record("config", &config).map_err(|err| diagnostic::report(&err))?;
        return Ok(());
    }
    output::section("Effective Configuration");
    output::field("Path", path.display());
    output::field("Exists", path.exists());

    output::section("Ledger");
    output::field("Supply", config.ledger.total_supply);
    output::field("Symbol max", config.ledger.max_symbol_len);

    output::section("Accounts");
    output::field("Min length", config.accounts.min_len);
    output::field("Max length", config.accounts.max_len);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> miette::Result<()> {
    if !path.exists() {
        return Err(diagnostic::report(
            &ConfigError::InvalidValue {
                field: "config",
                reason: format!("{} does not exist", path.display()),
            }
            .into(),
        ));
    }
    load(path)?;
    output::record("config", &serde_json::json!({ "path": path, "valid": true }))
        .map_err(|err| diagnostic::report(&err))?;
    output::success(&format!("{} is valid", path.display()));
    Ok(())
}

/// Load the configuration, rendering parse errors against the file.
pub fn load(path: &Path) -> miette::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let src = fs::read_to_string(path)
        .map_err(|err| diagnostic::report(&ConfigError::ReadFile(err).into()))?;
    Config::parse_toml(&src).map_err(|err| {
        let located = match &err {
            Error::Config(config) => diagnostic::config_parse(config, &src),
            _ => None,
        };
        located.map_or_else(|| diagnostic::report(&err), miette::Report::new)
    })
}
