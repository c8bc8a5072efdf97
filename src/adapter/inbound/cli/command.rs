//! Command-line interface definitions.
//!
//! Every invocation is one ledger call or one read-only query against the
//! state file. Calls are made as `--caller` at `--at` (or the system
//! clock).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::paths;
use crate::domain::{Amount, Side, Timestamp, Value};

/// Deterministic over/under wager ledger
#[derive(Parser, Debug)]
#[command(name = "overunder")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Path to the ledger state file
    #[arg(long, global = true, default_value_os_t = paths::default_state())]
    pub state: PathBuf,

    /// Clock reading in unix seconds (defaults to the system clock)
    #[arg(long, global = true)]
    pub at: Option<Timestamp>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the overunder CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Credit the total supply to the caller and make it the reporter
    Mint(CallerArg),

    /// Move tokens from the caller to another account
    Transfer(TransferArgs),

    /// Open a wager, escrowing the caller's bet
    Create(CreateArgs),

    /// Take the open side of a wager
    Accept(WagerCallArgs),

    /// Cancel a wager and refund its escrow
    Cancel(WagerCallArgs),

    /// Report a symbol's value and settle matured wagers (reporter only)
    Report(ReportArgs),

    /// Show an account's balance
    Balance(AccountArg),

    /// Show the total supply and reporter
    Supply,

    /// Show one live wager
    Wager(WagerIdArg),

    /// List the live wagers an account holds a side of
    Wagers(AccountArg),

    /// List every symbol that has had a wager
    Symbols,

    /// List open wagers on a symbol
    Open(SymbolArg),

    /// List matched wagers on a symbol in settlement order
    Matched(SymbolArg),

    /// Check that balances and escrow add up to the supply
    Audit,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `overunder config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate a configuration file for correctness.
    Validate,
}

/// Wager side as typed on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SideArg {
    Over,
    Under,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Over => Self::Over,
            SideArg::Under => Self::Under,
        }
    }
}

/// Account making a ledger call.
#[derive(Parser, Debug)]
pub struct CallerArg {
    /// Account making the call
    #[arg(long)]
    pub caller: String,
}

#[derive(Parser, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub caller: CallerArg,
    /// Recipient account
    pub to: String,
    /// Amount to move
    pub amount: Amount,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub caller: CallerArg,
    /// Symbol the wager is on
    pub symbol: String,
    /// Side the caller takes
    #[arg(value_enum)]
    pub side: SideArg,
    /// Value the reported value is compared with
    pub strike: Value,
    /// Bet each side escrows
    pub bet: Amount,
    /// Expiry in unix seconds
    pub expires_at: Timestamp,
    /// Let either participant cancel a matched wager from this time on
    #[arg(long)]
    pub cancel_after: Option<Timestamp>,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub caller: CallerArg,
    /// Symbol being reported
    pub symbol: String,
    /// Reported value
    pub value: Value,
}

#[derive(Parser, Debug)]
pub struct WagerCallArgs {
    #[command(flatten)]
    pub caller: CallerArg,
    /// Wager id
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct WagerIdArg {
    /// Wager id
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct AccountArg {
    /// Account to inspect
    pub account: String,
}

#[derive(Parser, Debug)]
pub struct SymbolArg {
    /// Symbol to inspect
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_cancel_after() {
        let cli = Cli::try_parse_from([
            "overunder",
            "create",
            "--caller",
            "alice",
            "BTC",
            "under",
            "100",
            "5",
            "20",
            "--cancel-after",
            "40",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.symbol, "BTC");
                assert!(matches!(args.side, SideArg::Under));
                assert_eq!(args.cancel_after, Some(40));
                assert_eq!(args.caller.caller, "alice");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn calls_require_a_caller() {
        assert!(Cli::try_parse_from(["overunder", "accept", "1"]).is_err());
        assert!(Cli::try_parse_from(["overunder", "wager", "1"]).is_ok());
    }
}
