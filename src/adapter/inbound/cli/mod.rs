//! CLI module graph and command dispatch.

pub mod call;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
pub mod paths;
pub mod query;
pub mod session;

use command::{Cli, Commands, ConfigCommand};
use output::OutputConfig;
use session::Session;

/// Run one parsed invocation.
///
/// # Errors
///
/// Returns a rendered diagnostic for any failed load, call or query.
pub fn execute(cli: Cli) -> miette::Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let config = config::load(&cli.config)?;
    match log_level(cli.quiet, cli.verbose) {
        Some(level) => config.logging.with_level(level).init(),
        None => config.init_logging(),
    }

    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Show => config::execute_show(&cli.config),
            ConfigCommand::Validate => config::execute_validate(&cli.config),
        };
    }

    let session = Session::open(&cli, &config).map_err(|err| diagnostic::report(&err))?;
    let result = match &cli.command {
        Commands::Mint(args) => call::mint(&session, args),
        Commands::Transfer(args) => call::transfer(&session, args),
        Commands::Create(args) => call::create(&session, args),
        Commands::Accept(args) => call::accept(&session, args),
        Commands::Cancel(args) => call::cancel(&session, args),
        Commands::Report(args) => call::report(&session, args),
        Commands::Balance(args) => query::balance(&session, args),
        Commands::Supply => query::supply(&session),
        Commands::Wager(args) => query::wager(&session, args),
        Commands::Wagers(args) => query::wagers(&session, args),
        Commands::Symbols => query::symbols(&session),
        Commands::Open(args) => query::open(&session, args),
        Commands::Matched(args) => query::matched(&session, args),
        Commands::Audit => query::audit(&session),
        Commands::Config(_) => Ok(()),
    };
    result.map_err(|err| diagnostic::report(&err))
}

/// Level forced by `-q` / `-v`, overriding the configured one.
fn log_level(quiet: bool, verbose: u8) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, 2) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(false, 0), None);
        assert_eq!(log_level(false, 1), Some("info"));
        assert_eq!(log_level(false, 5), Some("trace"));
        assert_eq!(log_level(true, 3), Some("error"));
    }
}
