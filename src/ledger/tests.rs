#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::daterange::{DateRange, RangePreset};
use super::stats::PeriodStats;
use super::*;
use crate::models::{Transaction, TransactionKind};

fn make_txn(kind: TransactionKind, amount_cents: i64) -> Transaction {
    Transaction {
        id: None,
        account_id: 1,
        target_account_id: if kind == TransactionKind::Transfer {
            Some(2)
        } else {
            None
        },
        category_id: None,
        description: "Test".into(),
        amount_cents,
        kind,
        datetime: "2024-03-15 12:00:00".into(),
        created_at: String::new(),
    }
}

fn apply(balance: i64, account_id: i64, changes: &[BalanceChange]) -> i64 {
    changes
        .iter()
        .filter(|c| c.account_id == account_id)
        .fold(balance, |b, c| b + c.delta_cents)
}

// ── Reconciler ────────────────────────────────────────────────

#[test]
fn test_income_apply_then_delete_restores_balance() {
    let txn = make_txn(TransactionKind::Income, 2500);
    let after = apply(10_000, 1, &changes_for_create(&txn).unwrap());
    assert_eq!(after, 12_500);
    let restored = apply(after, 1, &changes_for_delete(&txn));
    assert_eq!(restored, 10_000);
}

#[test]
fn test_expense_apply_then_delete_restores_balance() {
    let txn = make_txn(TransactionKind::Expense, 2500);
    let after = apply(10_000, 1, &changes_for_create(&txn).unwrap());
    assert_eq!(after, 7_500);
    let restored = apply(after, 1, &changes_for_delete(&txn));
    assert_eq!(restored, 10_000);
}

#[test]
fn test_transfer_moves_between_accounts() {
    let txn = make_txn(TransactionKind::Transfer, 3000);
    let changes = changes_for_create(&txn).unwrap();
    assert_eq!(changes.len(), 2);
    let source_after = apply(10_000, 1, &changes);
    let target_after = apply(500, 2, &changes);
    assert_eq!(source_after, 7_000);
    assert_eq!(target_after, 3_500);

    let inverse = changes_for_delete(&txn);
    assert_eq!(apply(source_after, 1, &inverse), 10_000);
    assert_eq!(apply(target_after, 2, &inverse), 500);
}

#[test]
fn test_expense_may_go_negative() {
    // Overdrafts are allowed silently
    let txn = make_txn(TransactionKind::Expense, 5000);
    let after = apply(1000, 1, &changes_for_create(&txn).unwrap());
    assert_eq!(after, -4000);
}

#[test]
fn test_zero_amount_is_valid() {
    let txn = make_txn(TransactionKind::Income, 0);
    let changes = changes_for_create(&txn).unwrap();
    assert_eq!(apply(100, 1, &changes), 100);
}

#[test]
fn test_negative_amount_rejected() {
    let txn = make_txn(TransactionKind::Income, -100);
    assert!(changes_for_create(&txn).is_err());
}

#[test]
fn test_transfer_without_target_rejected() {
    let mut txn = make_txn(TransactionKind::Transfer, 100);
    txn.target_account_id = None;
    assert!(changes_for_create(&txn).is_err());
}

#[test]
fn test_transfer_to_self_rejected() {
    let mut txn = make_txn(TransactionKind::Transfer, 100);
    txn.target_account_id = Some(txn.account_id);
    assert!(changes_for_create(&txn).is_err());
}

#[test]
fn test_income_with_target_rejected() {
    let mut txn = make_txn(TransactionKind::Income, 100);
    txn.target_account_id = Some(2);
    assert!(changes_for_create(&txn).is_err());
}

#[test]
fn test_edit_changes_amount_only() {
    let old = make_txn(TransactionKind::Expense, 1000);
    let mut new = old.clone();
    new.amount_cents = 1500;

    let changes = changes_for_edit(&old, &new).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(apply(10_000, 1, &changes), 9_500);
}

#[test]
fn test_edit_moves_to_other_account() {
    let old = make_txn(TransactionKind::Expense, 1000);
    let mut new = old.clone();
    new.account_id = 3;

    let changes = changes_for_edit(&old, &new).unwrap();
    assert_eq!(apply(10_000, 1, &changes), 11_000);
    assert_eq!(apply(10_000, 3, &changes), 9_000);
}

#[test]
fn test_edit_with_no_effective_change_is_empty() {
    let old = make_txn(TransactionKind::Income, 1000);
    let mut new = old.clone();
    new.description = "Renamed".into();

    let changes = changes_for_edit(&old, &new).unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_edit_kind_flip() {
    let old = make_txn(TransactionKind::Income, 1000);
    let mut new = old.clone();
    new.kind = TransactionKind::Expense;

    let changes = changes_for_edit(&old, &new).unwrap();
    assert_eq!(apply(5_000, 1, &changes), 3_000);
}

// ── Aggregate stats ───────────────────────────────────────────

#[test]
fn test_period_stats_fixture() {
    let txns = vec![
        make_txn(TransactionKind::Income, 100),
        make_txn(TransactionKind::Income, 200),
        make_txn(TransactionKind::Income, 300),
        make_txn(TransactionKind::Expense, 50),
        make_txn(TransactionKind::Expense, 75),
    ];
    let stats = PeriodStats::compute(&txns);
    assert_eq!(stats.income_cents, 600);
    assert_eq!(stats.expense_cents, 125);
    assert_eq!(stats.net_cents(), 475);
}

#[test]
fn test_period_stats_ignores_transfers() {
    let txns = vec![
        make_txn(TransactionKind::Income, 1000),
        make_txn(TransactionKind::Transfer, 9999),
        make_txn(TransactionKind::Expense, 400),
    ];
    let stats = PeriodStats::compute(&txns);
    assert_eq!(stats.income_cents, 1000);
    assert_eq!(stats.expense_cents, 400);
    assert_eq!(stats.net_cents(), 600);
}

#[test]
fn test_period_stats_empty() {
    let stats = PeriodStats::compute(&[]);
    assert_eq!(stats.income_cents, 0);
    assert_eq!(stats.expense_cents, 0);
    assert_eq!(stats.net_cents(), 0);
}

// ── Date range presets ────────────────────────────────────────

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_resolve_today() {
    let today = day(2024, 3, 15);
    let range = RangePreset::Today.resolve(today);
    assert_eq!(range, DateRange::new(today, today));
}

#[test]
fn test_resolve_yesterday() {
    let range = RangePreset::Yesterday.resolve(day(2024, 3, 1));
    assert_eq!(range, DateRange::new(day(2024, 2, 29), day(2024, 2, 29)));
}

#[test]
fn test_resolve_last_7_days() {
    let range = RangePreset::Last7Days.resolve(day(2024, 3, 15));
    assert_eq!(range, DateRange::new(day(2024, 3, 9), day(2024, 3, 15)));
}

#[test]
fn test_resolve_last_30_days() {
    let range = RangePreset::Last30Days.resolve(day(2024, 3, 15));
    assert_eq!(range, DateRange::new(day(2024, 2, 15), day(2024, 3, 15)));
}

#[test]
fn test_resolve_this_month_starts_day_one() {
    let range = RangePreset::ThisMonth.resolve(day(2024, 3, 15));
    assert_eq!(range, DateRange::new(day(2024, 3, 1), day(2024, 3, 15)));
}

#[test]
fn test_resolve_last_month_full_calendar_month() {
    let range = RangePreset::LastMonth.resolve(day(2024, 3, 15));
    assert_eq!(range, DateRange::new(day(2024, 2, 1), day(2024, 2, 29)));
}

#[test]
fn test_round_trip_all_presets_mid_month() {
    let today = day(2024, 3, 15);
    for preset in RangePreset::all() {
        let range = preset.resolve(today);
        assert_eq!(
            range.matching_preset(today),
            Some(*preset),
            "round-trip failed for {preset}"
        );
    }
}

#[test]
fn test_round_trip_dec_31() {
    let today = day(2024, 12, 31);
    let this_month = RangePreset::ThisMonth.resolve(today);
    assert_eq!(this_month, DateRange::new(day(2024, 12, 1), day(2024, 12, 31)));
    assert_eq!(this_month.matching_preset(today), Some(RangePreset::ThisMonth));

    let last_month = RangePreset::LastMonth.resolve(today);
    assert_eq!(last_month, DateRange::new(day(2024, 11, 1), day(2024, 11, 30)));
    assert_eq!(last_month.matching_preset(today), Some(RangePreset::LastMonth));
}

#[test]
fn test_jan_1_rollover() {
    let today = day(2025, 1, 1);

    // Last month crosses the year boundary cleanly.
    let last_month = RangePreset::LastMonth.resolve(today);
    assert_eq!(last_month, DateRange::new(day(2024, 12, 1), day(2024, 12, 31)));
    assert_eq!(last_month.matching_preset(today), Some(RangePreset::LastMonth));

    // On the 1st, "this month" collapses onto the single-day "today" range;
    // the earlier preset wins the tie.
    let this_month = RangePreset::ThisMonth.resolve(today);
    assert_eq!(this_month, DateRange::new(day(2025, 1, 1), day(2025, 1, 1)));
    assert_eq!(this_month.matching_preset(today), Some(RangePreset::Today));
}

#[test]
fn test_preset_or_default_falls_back_to_today() {
    let today = day(2024, 3, 15);
    let custom = DateRange::new(day(2023, 1, 3), day(2023, 2, 17));
    assert_eq!(custom.matching_preset(today), None);
    assert_eq!(custom.preset_or_default(today), RangePreset::Today);
}

#[test]
fn test_range_contains() {
    let range = DateRange::new(day(2024, 3, 1), day(2024, 3, 31));
    assert!(range.contains(day(2024, 3, 1)));
    assert!(range.contains(day(2024, 3, 31)));
    assert!(!range.contains(day(2024, 2, 29)));
    assert!(!range.contains(day(2024, 4, 1)));
}

#[test]
fn test_preset_parse_roundtrip() {
    for preset in RangePreset::all() {
        assert_eq!(RangePreset::parse(preset.as_str()), Some(*preset));
    }
    assert_eq!(RangePreset::parse("bogus"), None);
}
