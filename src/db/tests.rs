#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::*;
use crate::ledger::daterange::{DateRange, RangePreset};
use crate::ledger::stats::PeriodStats;

fn make_txn(account_id: i64, kind: TransactionKind, amount_cents: i64, date: &str) -> Transaction {
    Transaction {
        id: None,
        account_id,
        target_account_id: None,
        category_id: None,
        description: "Test".into(),
        amount_cents,
        kind,
        datetime: format!("{date} 12:00:00"),
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn balance_of(db: &Database, id: i64) -> i64 {
    db.get_account_by_id(id).unwrap().unwrap().balance_cents
}

// ── Default data ──────────────────────────────────────────────

#[test]
fn test_default_categories_seeded() {
    let db = Database::open_in_memory().unwrap();
    let cats = db.get_categories().unwrap();
    assert!(!cats.is_empty());
    assert!(cats.iter().any(|c| c.name == "Salary"));
    assert!(cats.iter().any(|c| c.name == "Groceries"));
}

#[test]
fn test_seeded_category_scopes() {
    let db = Database::open_in_memory().unwrap();
    let cats = db.get_categories().unwrap();
    let salary = Category::find_by_name(&cats, "salary").unwrap();
    assert_eq!(salary.scope, CategoryScope::Income);
    assert!(salary.scope.allows(TransactionKind::Income));
    assert!(!salary.scope.allows(TransactionKind::Expense));
}

// ── Account CRUD ──────────────────────────────────────────────

#[test]
fn test_account_crud() {
    let db = Database::open_in_memory().unwrap();
    let account = Account::new("Checking".into(), Icon::Bank, 10_000);
    let id = db.insert_account(&account).unwrap();

    let fetched = db.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Checking");
    assert_eq!(fetched.icon, Icon::Bank);
    assert_eq!(fetched.balance_cents, 10_000);

    db.update_account_profile(id, "Main Checking", Icon::Card)
        .unwrap();
    let updated = db.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(updated.name, "Main Checking");
    assert_eq!(updated.icon, Icon::Card);
    // Profile updates never touch the balance
    assert_eq!(updated.balance_cents, 10_000);

    db.delete_account(id).unwrap();
    assert!(db.get_account_by_id(id).unwrap().is_none());
}

#[test]
fn test_account_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_account_by_id(99999).unwrap().is_none());
}

#[test]
fn test_accounts_sorted_by_name() {
    let db = Database::open_in_memory().unwrap();
    db.insert_account(&Account::new("Wallet".into(), Icon::Wallet, 0))
        .unwrap();
    db.insert_account(&Account::new("Bank".into(), Icon::Bank, 0))
        .unwrap();
    db.insert_account(&Account::new("Piggy".into(), Icon::PiggyBank, 0))
        .unwrap();

    let names: Vec<String> = db
        .get_accounts()
        .unwrap()
        .iter()
        .map(|a| a.name.clone())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

// ── Reconciled transaction operations ─────────────────────────

#[test]
fn test_income_updates_balance() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 1_000))
        .unwrap();

    let id = db
        .create_transaction(&make_txn(account, TransactionKind::Income, 2_500, "2024-03-10"))
        .unwrap();
    assert!(id > 0);
    assert_eq!(balance_of(&db, account), 3_500);

    db.delete_transaction(id).unwrap();
    assert_eq!(balance_of(&db, account), 1_000);
}

#[test]
fn test_expense_updates_balance() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 10_000))
        .unwrap();

    let id = db
        .create_transaction(&make_txn(account, TransactionKind::Expense, 2_500, "2024-03-10"))
        .unwrap();
    assert_eq!(balance_of(&db, account), 7_500);

    db.delete_transaction(id).unwrap();
    assert_eq!(balance_of(&db, account), 10_000);
}

#[test]
fn test_transfer_updates_both_balances() {
    let mut db = Database::open_in_memory().unwrap();
    let source = db
        .insert_account(&Account::new("Source".into(), Icon::Bank, 10_000))
        .unwrap();
    let target = db
        .insert_account(&Account::new("Target".into(), Icon::PiggyBank, 500))
        .unwrap();

    let mut txn = make_txn(source, TransactionKind::Transfer, 3_000, "2024-03-10");
    txn.target_account_id = Some(target);
    let id = db.create_transaction(&txn).unwrap();

    assert_eq!(balance_of(&db, source), 7_000);
    assert_eq!(balance_of(&db, target), 3_500);

    db.delete_transaction(id).unwrap();
    assert_eq!(balance_of(&db, source), 10_000);
    assert_eq!(balance_of(&db, target), 500);
}

#[test]
fn test_invalid_transaction_rejected_without_writes() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 1_000))
        .unwrap();

    let mut txn = make_txn(account, TransactionKind::Transfer, 500, "2024-03-10");
    txn.target_account_id = Some(account); // self-transfer
    assert!(db.create_transaction(&txn).is_err());

    assert_eq!(db.get_transaction_count().unwrap(), 0);
    assert_eq!(balance_of(&db, account), 1_000);
}

#[test]
fn test_edit_reconciles_difference() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 10_000))
        .unwrap();

    let id = db
        .create_transaction(&make_txn(account, TransactionKind::Expense, 1_000, "2024-03-10"))
        .unwrap();
    assert_eq!(balance_of(&db, account), 9_000);

    let mut edited = db.get_transaction_by_id(id).unwrap().unwrap();
    edited.amount_cents = 2_500;
    db.update_transaction(&edited).unwrap();
    assert_eq!(balance_of(&db, account), 7_500);

    // Rename-only edits leave the balance alone
    let mut renamed = db.get_transaction_by_id(id).unwrap().unwrap();
    renamed.description = "Coffee beans".into();
    db.update_transaction(&renamed).unwrap();
    assert_eq!(balance_of(&db, account), 7_500);
    assert_eq!(
        db.get_transaction_by_id(id).unwrap().unwrap().description,
        "Coffee beans"
    );
}

#[test]
fn test_edit_moves_between_accounts() {
    let mut db = Database::open_in_memory().unwrap();
    let a = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 5_000))
        .unwrap();
    let b = db
        .insert_account(&Account::new("B".into(), Icon::Bank, 5_000))
        .unwrap();

    let id = db
        .create_transaction(&make_txn(a, TransactionKind::Expense, 1_000, "2024-03-10"))
        .unwrap();
    let mut edited = db.get_transaction_by_id(id).unwrap().unwrap();
    edited.account_id = b;
    db.update_transaction(&edited).unwrap();

    assert_eq!(balance_of(&db, a), 5_000);
    assert_eq!(balance_of(&db, b), 4_000);
}

#[test]
fn test_delete_unknown_transaction_is_noop() {
    let mut db = Database::open_in_memory().unwrap();
    db.delete_transaction(12345).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_delete_transaction_of_deleted_account_is_silent() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("Doomed".into(), Icon::Wallet, 1_000))
        .unwrap();
    let id = db
        .create_transaction(&make_txn(account, TransactionKind::Expense, 300, "2024-03-10"))
        .unwrap();

    db.delete_account(account).unwrap();
    // Balance update matches zero rows; the row delete still happens
    db.delete_transaction(id).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_transaction_bumps_last_used_at() {
    let mut db = Database::open_in_memory().unwrap();
    let mut account = Account::new("A".into(), Icon::Wallet, 0);
    account.last_used_at = "2020-01-01T00:00:00Z".into();
    let id = db.insert_account(&account).unwrap();

    db.create_transaction(&make_txn(id, TransactionKind::Income, 100, "2024-03-10"))
        .unwrap();
    let after = db.get_account_by_id(id).unwrap().unwrap();
    assert_ne!(after.last_used_at, "2020-01-01T00:00:00Z");
}

// ── Queries ───────────────────────────────────────────────────

fn setup_query_data(db: &mut Database) -> (i64, i64) {
    let a = db
        .insert_account(&Account::new("Checking".into(), Icon::Bank, 0))
        .unwrap();
    let b = db
        .insert_account(&Account::new("Savings".into(), Icon::PiggyBank, 0))
        .unwrap();

    let mut salary = make_txn(a, TransactionKind::Income, 300_000, "2024-03-01");
    salary.description = "Salary deposit".into();
    db.create_transaction(&salary).unwrap();

    let mut coffee = make_txn(a, TransactionKind::Expense, 450, "2024-03-05");
    coffee.description = "Coffee".into();
    db.create_transaction(&coffee).unwrap();

    let mut rent = make_txn(a, TransactionKind::Expense, 120_000, "2024-02-28");
    rent.description = "February rent".into();
    db.create_transaction(&rent).unwrap();

    let mut stash = make_txn(a, TransactionKind::Transfer, 50_000, "2024-03-07");
    stash.target_account_id = Some(b);
    stash.description = "To savings".into();
    db.create_transaction(&stash).unwrap();

    (a, b)
}

#[test]
fn test_transactions_ordered_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    setup_query_data(&mut db);

    let txns = db
        .get_transactions(None, None, None, None, None, None)
        .unwrap();
    assert_eq!(txns.len(), 4);
    let dates: Vec<&str> = txns.iter().map(|t| t.date()).collect();
    assert_eq!(dates, ["2024-03-07", "2024-03-05", "2024-03-01", "2024-02-28"]);
}

#[test]
fn test_transaction_search() {
    let mut db = Database::open_in_memory().unwrap();
    setup_query_data(&mut db);

    let results = db
        .get_transactions(None, None, None, None, Some("coffee"), None)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].description, "Coffee");

    let none = db
        .get_transactions(None, None, None, None, Some("nonexistent"), None)
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_transaction_account_filter_includes_transfer_target() {
    let mut db = Database::open_in_memory().unwrap();
    let (a, b) = setup_query_data(&mut db);

    let for_a = db
        .get_transactions(None, None, Some(a), None, None, None)
        .unwrap();
    assert_eq!(for_a.len(), 4);

    // The savings account only shows the transfer it received
    let for_b = db
        .get_transactions(None, None, Some(b), None, None, None)
        .unwrap();
    assert_eq!(for_b.len(), 1);
    assert!(for_b[0].is_transfer());
}

#[test]
fn test_transaction_range_filter() {
    let mut db = Database::open_in_memory().unwrap();
    setup_query_data(&mut db);

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );
    let march = db
        .get_transactions(None, None, None, None, None, Some(&range))
        .unwrap();
    assert_eq!(march.len(), 3);

    let preset_range = RangePreset::LastMonth.resolve(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    let february = db
        .get_transactions(None, None, None, None, None, Some(&preset_range))
        .unwrap();
    assert_eq!(february.len(), 1);
    assert_eq!(february[0].description, "February rent");
}

#[test]
fn test_transaction_limit_offset() {
    let mut db = Database::open_in_memory().unwrap();
    setup_query_data(&mut db);

    let page = db
        .get_transactions(Some(2), Some(1), None, None, None, None)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].description, "Coffee");
}

#[test]
fn test_category_filter() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 0))
        .unwrap();
    let cats = db.get_categories().unwrap();
    let groceries = Category::find_by_name(&cats, "Groceries").unwrap().id;

    let mut txn = make_txn(account, TransactionKind::Expense, 800, "2024-03-02");
    txn.category_id = groceries;
    db.create_transaction(&txn).unwrap();
    db.create_transaction(&make_txn(account, TransactionKind::Expense, 500, "2024-03-03"))
        .unwrap();

    let filtered = db
        .get_transactions(None, None, None, groceries, None, None)
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].amount_cents, 800);
}

#[test]
fn test_period_stats_from_query() {
    let mut db = Database::open_in_memory().unwrap();
    let account = db
        .insert_account(&Account::new("A".into(), Icon::Wallet, 0))
        .unwrap();
    for amount in [100, 200, 300] {
        db.create_transaction(&make_txn(account, TransactionKind::Income, amount, "2024-03-10"))
            .unwrap();
    }
    for amount in [50, 75] {
        db.create_transaction(&make_txn(account, TransactionKind::Expense, amount, "2024-03-11"))
            .unwrap();
    }

    let range = RangePreset::ThisMonth.resolve(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    let txns = db
        .get_transactions(None, None, None, None, None, Some(&range))
        .unwrap();
    let stats = PeriodStats::compute(&txns);
    assert_eq!(stats.income_cents, 600);
    assert_eq!(stats.expense_cents, 125);
    assert_eq!(stats.net_cents(), 475);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_crud() {
    let db = Database::open_in_memory().unwrap();
    let cat = Category::new("Pets".into(), Icon::Other, CategoryScope::Expense);
    let id = db.insert_category(&cat).unwrap();

    let fetched = db.get_category_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Pets");
    assert_eq!(fetched.scope, CategoryScope::Expense);

    db.delete_category(id).unwrap();
    assert!(db.get_category_by_id(id).unwrap().is_none());
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_setting_upsert() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_setting("view_mode.accounts").unwrap().is_none());

    db.set_setting("view_mode.accounts", "grid").unwrap();
    assert_eq!(
        db.get_setting("view_mode.accounts").unwrap().as_deref(),
        Some("grid")
    );

    db.set_setting("view_mode.accounts", "list").unwrap();
    assert_eq!(
        db.get_setting("view_mode.accounts").unwrap().as_deref(),
        Some("list")
    );
}

#[test]
fn test_view_mode_persistence_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let key = view_mode_key("Accounts");
    db.set_setting(&key, ViewMode::Grid.as_str()).unwrap();
    let loaded = db
        .get_setting(&key)
        .unwrap()
        .map(|v| ViewMode::parse(&v))
        .unwrap_or_default();
    assert_eq!(loaded, ViewMode::Grid);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv() {
    let mut db = Database::open_in_memory().unwrap();
    setup_query_data(&mut db);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let count = db
        .export_to_csv(path.to_str().unwrap(), None)
        .unwrap();
    assert_eq!(count, 4);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("datetime,kind,description,amount"));
    assert!(contents.contains("Salary deposit"));
    assert!(contents.contains("3000.00"));
    assert!(contents.contains("To savings"));
}

#[test]
fn test_export_empty_returns_zero() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let count = db.export_to_csv(path.to_str().unwrap(), None).unwrap();
    assert_eq!(count, 0);
    assert!(!path.exists());
}
