//! Read-only views of the ledger.

use serde_json::json;
use tabled::Tabled;

use super::command::{AccountArg, SymbolArg, WagerIdArg};
use super::output;
use super::session::Session;
use crate::domain::{AccountId, Symbol, Wager, WagerId};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct WagerRow {
    #[tabled(rename = "Id")]
    id: WagerId,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Strike")]
    strike: u64,
    #[tabled(rename = "Bet")]
    bet: u64,
    #[tabled(rename = "Expires")]
    expires_at: u64,
    #[tabled(rename = "Over")]
    over: String,
    #[tabled(rename = "Under")]
    under: String,
}

impl From<&Wager> for WagerRow {
    fn from(wager: &Wager) -> Self {
        let slot = |holder: Option<&AccountId>| {
            holder.map_or_else(|| "-".to_string(), ToString::to_string)
        };
        Self {
            id: wager.id(),
            symbol: wager.symbol().to_string(),
            state: wager.state().to_string(),
            strike: wager.strike(),
            bet: wager.bet(),
            expires_at: wager.expires_at(),
            over: slot(wager.over()),
            under: slot(wager.under()),
        }
    }
}

fn load_all(session: &Session, ids: &[WagerId]) -> Result<Vec<Wager>> {
    ids.iter().map(|id| session.book().wager(*id)).collect()
}

fn print_wagers(kind: &str, wagers: &[Wager], empty: &str) -> Result<()> {
    output::record(kind, &wagers)?;
    output::table(wagers.iter().map(WagerRow::from).collect(), empty);
    Ok(())
}

/// Execute `balance`.
pub fn balance(session: &Session, args: &AccountArg) -> Result<()> {
    let account = AccountId::from(args.account.as_str());
    let balance = session.book().balance(&account)?;

    output::record("balance", &json!({ "account": account, "balance": balance }))?;
    output::field("Account", &account);
    output::field("Balance", balance);
    Ok(())
}

/// Execute `supply`.
pub fn supply(session: &Session) -> Result<()> {
    let book = session.book();
    let supply = book.total_supply()?;
    let reporter = book.reporter()?;

    output::record(
        "supply",
        &json!({ "total_supply": supply, "reporter": reporter }),
    )?;
    output::field("Supply", supply);
    match reporter {
        Some(reporter) => output::field("Reporter", reporter),
        None => output::field("Reporter", "(not minted)"),
    }
    Ok(())
}

/// Execute `wager`.
pub fn wager(session: &Session, args: &WagerIdArg) -> Result<()> {
    let wager = session.book().wager(WagerId::new(args.id))?;
    print_wagers("wagers", std::slice::from_ref(&wager), "")
}

/// Execute `wagers`.
pub fn wagers(session: &Session, args: &AccountArg) -> Result<()> {
    let account = AccountId::from(args.account.as_str());
    let ids = session.book().account_wagers(&account)?;
    print_wagers("wagers", &load_all(session, &ids)?, "(no live wagers)")
}

/// Execute `symbols`.
pub fn symbols(session: &Session) -> Result<()> {
    let symbols = session.book().symbols()?;

    output::record("symbols", &symbols)?;
    if symbols.is_empty() {
        output::note("(no symbols)");
    }
    for symbol in &symbols {
        let last = session.book().last_report(symbol)?;
        match last {
            Some(report) => output::field(
                symbol.as_str(),
                format!("{} at {}", report.value, report.reported_at),
            ),
            None => output::field(symbol.as_str(), "(never reported)"),
        }
    }
    Ok(())
}

/// Execute `open`.
pub fn open(session: &Session, args: &SymbolArg) -> Result<()> {
    let symbol = Symbol::from(args.symbol.as_str());
    let ids = session.book().open_wagers(&symbol)?;
    print_wagers("wagers", &load_all(session, &ids)?, "(no open wagers)")
}

/// Execute `matched`. Wagers are listed in the order they settle.
pub fn matched(session: &Session, args: &SymbolArg) -> Result<()> {
    let symbol = Symbol::from(args.symbol.as_str());
    let ids = session.book().matched_wagers(&symbol)?;
    print_wagers("wagers", &load_all(session, &ids)?, "(no matched wagers)")
}

/// Execute `audit`. Fails when the books do not balance.
pub fn audit(session: &Session) -> Result<()> {
    let report = session.book().audit()?;

    output::record("audit", &report)?;
    output::field("Supply", report.total_supply);
    output::field("Balances", report.circulating);
    output::field("Escrowed", report.escrowed);
    output::field("Open", report.open_wagers);
    output::field("Matched", report.matched_wagers);

    if report.is_clean() {
        output::success("Ledger balances");
        return Ok(());
    }
    if !report.dangling.is_empty() {
        output::warning(&format!("index entries without a wager: {:?}", report.dangling));
    }
    if !report.unindexed.is_empty() {
        output::warning(&format!("wagers missing from an index: {:?}", report.unindexed));
    }
    Err(Error::Storage(format!(
        "audit failed: {} + {} escrowed against supply {}",
        report.circulating, report.escrowed, report.total_supply
    )))
}
