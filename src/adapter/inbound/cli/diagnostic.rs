//! Miette-based error diagnostics for CLI error presentation.
//!
//! Ledger rejections are rendered with their error kind as the diagnostic
//! code and a hint on how to proceed. Config parse errors point at the
//! offending span of the file.

use std::fmt::Display;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::domain::{AccountIssue, CancelRefusal, LedgerError};
use crate::error::{ConfigError as ConfigFailure, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(overunder::config))]
pub struct ConfigError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A failed ledger call or query.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CallError {
    pub message: String,
    pub code: String,
    pub help: Option<String>,
}

impl Diagnostic for CallError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }
}

impl From<&Error> for CallError {
    fn from(err: &Error) -> Self {
        let (code, help) = match err {
            Error::Ledger(ledger) => (
                format!("overunder::{}", ledger.code()),
                ledger_help(ledger).map(str::to_string),
            ),
            Error::Config(_) => (
                "overunder::config".to_string(),
                Some("run `overunder config validate` to check the file".to_string()),
            ),
            Error::Json(_) | Error::Storage(_) => (
                "overunder::state".to_string(),
                Some("the state file may be corrupt; pass --state to use another".to_string()),
            ),
            Error::Io(_) => ("overunder::io".to_string(), None),
        };
        Self {
            message: err.to_string(),
            code,
            help,
        }
    }
}

/// Wrap a crate error for rendering.
#[must_use]
pub fn report(err: &Error) -> miette::Report {
    miette::Report::new(CallError::from(err))
}

fn ledger_help(err: &LedgerError) -> Option<&'static str> {
    match err {
        LedgerError::AlreadyMinted => {
            Some("the ledger is minted once; `overunder supply` shows the reporter")
        }
        LedgerError::InvalidAccount { issue, .. } => Some(match issue {
            AccountIssue::Malformed => "account ids are ASCII letters, digits and `_ - . :`",
            AccountIssue::NoBalanceRecord => "an account must receive a transfer before it can act",
            AccountIssue::NotReporter => "only the account that minted may report values",
        }),
        LedgerError::InvalidAmount { .. } => Some("amounts must be greater than zero"),
        LedgerError::InvalidTime { .. } => {
            Some("times are unix seconds; pass --at to pin the clock")
        }
        LedgerError::InvalidWager { .. } => {
            Some("settled and cancelled wagers are removed; `overunder wagers` lists live ones")
        }
        LedgerError::InvalidSymbol { .. } | LedgerError::CannotAccept { .. } => None,
        LedgerError::CannotCancel { reason, .. } => match reason {
            CancelRefusal::Matched => {
                Some("a matched wager can be cancelled only once its cancel-after time is reached")
            }
            CancelRefusal::NotParticipant => None,
        },
        LedgerError::InsufficientBalance { .. } => Some("check funds with `overunder balance`"),
    }
}

/// Render a parse failure against the file it came from.
#[must_use]
pub fn config_parse(err: &ConfigFailure, src: &str) -> Option<ConfigError> {
    let ConfigFailure::Parse(parse) = err else {
        return None;
    };
    let span = parse.span().unwrap_or(0..0);
    Some(
        ConfigError::new(parse.message(), src, span.start, span.len())
            .with_help("see `overunder config show` for every key and its default"),
    )
}
