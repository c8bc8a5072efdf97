//! Handlers for the ledger entry points.
//!
//! Each handler makes exactly one call and saves the state only when the
//! call succeeded.

use serde_json::json;
use tabled::Tabled;

use super::command::{CallerArg, CreateArgs, ReportArgs, TransferArgs, WagerCallArgs};
use super::output;
use super::session::Session;
use crate::application::SettlementSummary;
use crate::domain::{AccountId, Credit, NewWager, Outcome, Side, Symbol, WagerId};
use crate::error::Result;

#[derive(Tabled)]
struct CreditRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: u64,
}

impl From<&Credit> for CreditRow {
    fn from(credit: &Credit) -> Self {
        Self {
            account: credit.account.to_string(),
            amount: credit.amount,
        }
    }
}

#[derive(Tabled)]
struct SettlementRow {
    #[tabled(rename = "Wager")]
    wager: WagerId,
    #[tabled(rename = "Strike")]
    strike: u64,
    #[tabled(rename = "Outcome")]
    outcome: Outcome,
    #[tabled(rename = "Paid")]
    paid: String,
}

/// Execute `mint`.
pub fn mint(session: &Session, args: &CallerArg) -> Result<()> {
    let ctx = session.call(&args.caller)?;
    let supply = session.book().mint(&ctx)?;
    session.save()?;

    output::record(
        "mint",
        &json!({ "reporter": ctx.caller(), "supply": supply }),
    )?;
    output::success(&format!("Minted {supply} to {}", ctx.caller()));
    output::field("Reporter", ctx.caller());
    Ok(())
}

/// Execute `transfer`.
pub fn transfer(session: &Session, args: &TransferArgs) -> Result<()> {
    let ctx = session.call(&args.caller.caller)?;
    let to = AccountId::from(args.to.as_str());
    session.book().transfer(&ctx, &to, args.amount)?;
    session.save()?;

    output::record(
        "transfer",
        &json!({ "from": ctx.caller(), "to": to, "amount": args.amount }),
    )?;
    output::success(&format!(
        "Transferred {} from {} to {to}",
        args.amount,
        ctx.caller()
    ));
    output::field("Balance", session.book().balance(ctx.caller())?);
    Ok(())
}

/// Execute `create`.
pub fn create(session: &Session, args: &CreateArgs) -> Result<()> {
    let ctx = session.call(&args.caller.caller)?;
    let side = Side::from(args.side);
    let mut terms = NewWager::new(
        args.symbol.as_str(),
        side,
        args.strike,
        args.bet,
        args.expires_at,
    );
    if let Some(at) = args.cancel_after {
        terms = terms.cancel_after(at);
    }
    let id = session.book().create_wager(&ctx, terms)?;
    session.save()?;

    let wager = session.book().wager(id)?;
    output::record("wager", &wager)?;
    output::success(&format!("Created wager {}", output::highlight(id)));
    output::field("Symbol", wager.symbol());
    output::field("Side", side);
    output::field("Strike", wager.strike());
    output::field("Bet", wager.bet());
    output::field("Expires", wager.expires_at());
    output::hint(&format!(
        "another account takes the other side with `overunder accept {id}`"
    ));
    Ok(())
}

/// Execute `accept`.
pub fn accept(session: &Session, args: &WagerCallArgs) -> Result<()> {
    let ctx = session.call(&args.caller.caller)?;
    let wager = session.book().accept_wager(&ctx, WagerId::new(args.id))?;
    session.save()?;

    output::record("wager", &wager)?;
    output::success(&format!("Matched wager {}", output::highlight(wager.id())));
    if let (Some(over), Some(under)) = (wager.over(), wager.under()) {
        output::field("Over", over);
        output::field("Under", under);
    }
    output::field("Settles after", wager.expires_at());
    Ok(())
}

/// Execute `cancel`.
pub fn cancel(session: &Session, args: &WagerCallArgs) -> Result<()> {
    let ctx = session.call(&args.caller.caller)?;
    let cancellation = session.book().cancel_wager(&ctx, WagerId::new(args.id))?;
    session.save()?;

    output::record("cancellation", &cancellation)?;
    output::success(&format!(
        "Cancelled {} wager {}",
        cancellation.state,
        output::highlight(cancellation.wager_id)
    ));
    output::table(
        cancellation.refunds.iter().map(CreditRow::from).collect(),
        "(nothing refunded)",
    );
    Ok(())
}

/// Execute `report`.
pub fn report(session: &Session, args: &ReportArgs) -> Result<()> {
    let ctx = session.call(&args.caller.caller)?;
    let symbol = Symbol::from(args.symbol.as_str());
    let summary = session.book().report_symbol(&ctx, &symbol, args.value)?;
    session.save()?;

    output::record("report", &summary)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SettlementSummary) {
    output::success(&format!(
        "Reported {} = {} at {}",
        summary.symbol, summary.value, summary.reported_at
    ));
    output::section("Settled");
    let rows = summary
        .settlements
        .iter()
        .map(|settlement| SettlementRow {
            wager: settlement.wager_id,
            strike: settlement.strike,
            outcome: settlement.outcome,
            paid: settlement
                .credits
                .iter()
                .map(|credit| format!("{} {}", credit.account, credit.amount))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    output::table(rows, "(no matured wagers)");
}
