//! Oracle reports and settlement ordering.

mod support;

use overunder::adapter::outbound::MemoryStore;
use overunder::application::{BookSettings, WagerBook};
use overunder::domain::{AccountIssue, Credit, LedgerError, Outcome, WagerId};
use overunder::port::SymbolReport;
use overunder::testkit::book::{funded, matched, minted, REPORTER, SUPPLY};
use overunder::testkit::domain::{account, ctx, over, symbol, under};
use support::assertions::{assert_books_balance, rejection, rejection_code, snapshot};

#[test]
fn end_to_end_over_wins() {
    let t = 1_000;
    let book = WagerBook::new(MemoryStore::new(), BookSettings::default());
    book.mint(&ctx("A", t)).unwrap();
    let supply = book.balance(&account("A")).unwrap();
    assert_eq!(supply, BookSettings::default().total_supply);

    let id = book
        .create_wager(&ctx("A", t), over("X", 100, 10, t + 100))
        .unwrap();
    assert_eq!(id, WagerId::FIRST);
    assert_eq!(book.balance(&account("A")).unwrap(), supply - 10);

    book.transfer(&ctx("A", t), &account("B"), 10).unwrap();
    book.accept_wager(&ctx("B", t + 1), id).unwrap();
    assert_eq!(book.balance(&account("B")).unwrap(), 0);
    assert_eq!(book.matched_wagers(&symbol("X")).unwrap(), vec![id]);

    let summary = book
        .report_symbol(&ctx("A", t + 101), &symbol("X"), 150)
        .unwrap();

    assert_eq!(summary.settlements.len(), 1);
    assert_eq!(summary.settlements[0].outcome, Outcome::Over);
    assert_eq!(book.balance(&account("A")).unwrap(), supply - 10 - 10 + 20);
    assert_eq!(book.balance(&account("B")).unwrap(), 0);
    assert_eq!(rejection_code(book.wager(id)), "InvalidWager");
    assert_books_balance(&book);
}

#[test]
fn payout_table() {
    let cases = [
        (150, Outcome::Over, 120, 80),
        (50, Outcome::Under, 80, 120),
        (100, Outcome::Push, 100, 100),
    ];
    for (value, outcome, over_balance, under_balance) in cases {
        let book = funded(&["alice", "bob"], 100);
        matched(&book, "alice", "bob", over("X", 100, 20, 10), 1);

        let summary = book
            .report_symbol(&ctx(REPORTER, 11), &symbol("X"), value)
            .unwrap();

        assert_eq!(summary.settlements[0].outcome, outcome, "value {value}");
        assert_eq!(book.balance(&account("alice")).unwrap(), over_balance);
        assert_eq!(book.balance(&account("bob")).unwrap(), under_balance);
        assert_books_balance(&book);
    }
}

#[test]
fn push_refunds_each_side_its_bet() {
    let book = funded(&["alice", "bob"], 100);
    let id = matched(&book, "bob", "alice", under("X", 100, 30, 10), 1);

    let summary = book
        .report_symbol(&ctx(REPORTER, 11), &symbol("X"), 100)
        .unwrap();

    assert_eq!(summary.settlements[0].wager_id, id);
    assert_eq!(
        summary.settlements[0].credits,
        vec![
            Credit::new(account("alice"), 30),
            Credit::new(account("bob"), 30)
        ]
    );
}

#[test]
fn settles_strictly_matured_wagers_earliest_first() {
    let book = funded(&["alice", "bob"], 100);
    let expiries = [20, 10, 15, 10];
    let ids: Vec<WagerId> = expiries
        .iter()
        .map(|expiry| matched(&book, "alice", "bob", over("X", 100, 1, *expiry), 1))
        .collect();

    let first = book
        .report_symbol(&ctx(REPORTER, 16), &symbol("X"), 150)
        .unwrap();
    let settled: Vec<WagerId> = first.settlements.iter().map(|s| s.wager_id).collect();
    assert_eq!(settled, vec![ids[1], ids[3], ids[2]]);
    assert_eq!(book.matched_wagers(&symbol("X")).unwrap(), vec![ids[0]]);

    let second = book
        .report_symbol(&ctx(REPORTER, 25), &symbol("X"), 150)
        .unwrap();
    let settled: Vec<WagerId> = second.settlements.iter().map(|s| s.wager_id).collect();
    assert_eq!(settled, vec![ids[0]]);
    assert!(book.matched_wagers(&symbol("X")).unwrap().is_empty());
    assert_books_balance(&book);
}

#[test]
fn wager_expiring_at_report_time_waits() {
    let book = funded(&["alice", "bob"], 100);
    let id = matched(&book, "alice", "bob", over("X", 100, 10, 20), 1);

    let summary = book
        .report_symbol(&ctx(REPORTER, 20), &symbol("X"), 150)
        .unwrap();

    assert!(summary.settlements.is_empty());
    assert_eq!(book.matched_wagers(&symbol("X")).unwrap(), vec![id]);
}

#[test]
fn open_wagers_are_never_settled() {
    let book = funded(&["alice"], 100);
    let id = book
        .create_wager(&ctx("alice", 1), over("X", 100, 10, 5))
        .unwrap();

    let summary = book
        .report_symbol(&ctx(REPORTER, 50), &symbol("X"), 150)
        .unwrap();

    assert!(summary.settlements.is_empty());
    assert_eq!(book.open_wagers(&symbol("X")).unwrap(), vec![id]);
    book.cancel_wager(&ctx("alice", 60), id).unwrap();
    assert_eq!(book.balance(&account("alice")).unwrap(), 100);
}

#[test]
fn settlement_unlinks_participants_not_reporter() {
    let book = funded(&["alice", "bob"], 100);
    let keep = book
        .create_wager(&ctx(REPORTER, 1), over("Y", 100, 10, 50))
        .unwrap();
    matched(&book, "alice", "bob", over("X", 100, 10, 5), 1);

    book.report_symbol(&ctx(REPORTER, 6), &symbol("X"), 150).unwrap();

    assert!(book.account_wagers(&account("alice")).unwrap().is_empty());
    assert!(book.account_wagers(&account("bob")).unwrap().is_empty());
    assert_eq!(book.account_wagers(&account(REPORTER)).unwrap(), vec![keep]);
    assert_books_balance(&book);
}

#[test]
fn reports_only_touch_their_symbol() {
    let book = funded(&["alice", "bob"], 100);
    let x = matched(&book, "alice", "bob", over("X", 100, 10, 5), 1);
    let y = matched(&book, "alice", "bob", over("Y", 100, 10, 5), 1);

    book.report_symbol(&ctx(REPORTER, 6), &symbol("X"), 150).unwrap();

    assert_eq!(rejection_code(book.wager(x)), "InvalidWager");
    assert_eq!(book.matched_wagers(&symbol("Y")).unwrap(), vec![y]);
}

#[test]
fn report_records_last_value() {
    let book = minted();
    assert_eq!(book.last_report(&symbol("X")).unwrap(), None);

    book.report_symbol(&ctx(REPORTER, 5), &symbol("X"), 7).unwrap();
    book.report_symbol(&ctx(REPORTER, 9), &symbol("X"), 3).unwrap();

    assert_eq!(
        book.last_report(&symbol("X")).unwrap(),
        Some(SymbolReport {
            value: 3,
            reported_at: 9
        })
    );
}

#[test]
fn only_the_minter_reports() {
    let book = funded(&["alice", "bob"], 100);
    matched(&book, "alice", "bob", over("X", 100, 10, 5), 1);
    let before = snapshot(&book);

    assert_eq!(
        rejection(book.report_symbol(&ctx("alice", 6), &symbol("X"), 150)),
        LedgerError::InvalidAccount {
            account: account("alice"),
            issue: AccountIssue::NotReporter,
        }
    );
    assert_eq!(
        rejection_code(book.report_symbol(&ctx(REPORTER, 6), &symbol(""), 150)),
        "InvalidSymbol"
    );
    assert_eq!(snapshot(&book), before);
}

#[test]
fn nobody_reports_before_mint() {
    let book = WagerBook::new(MemoryStore::new(), BookSettings::default());
    assert_eq!(
        rejection_code(book.report_symbol(&ctx(REPORTER, 1), &symbol("X"), 1)),
        "InvalidAccount"
    );
}

#[test]
fn mint_happens_once() {
    let book = minted();
    assert_eq!(book.balance(&account(REPORTER)).unwrap(), SUPPLY);
    assert_eq!(
        rejection(book.mint(&ctx("alice", 1))),
        LedgerError::AlreadyMinted
    );
    assert_eq!(book.reporter().unwrap(), Some(account(REPORTER)));
}
