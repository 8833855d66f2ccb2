#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use super::util::*;

// ── format_cents ──────────────────────────────────────────────

#[test]
fn test_format_zero() {
    assert_eq!(format_cents(0), "$0.00");
}

#[test]
fn test_format_basic() {
    assert_eq!(format_cents(12345), "$123.45");
}

#[test]
fn test_format_negative() {
    assert_eq!(format_cents(-5000), "-$50.00");
}

#[test]
fn test_format_thousands_grouping() {
    assert_eq!(format_cents(123_456_789), "$1,234,567.89");
    assert_eq!(format_cents(-123_456_789), "-$1,234,567.89");
}

#[test]
fn test_format_sub_dollar() {
    assert_eq!(format_cents(5), "$0.05");
    assert_eq!(format_cents(-5), "-$0.05");
    assert_eq!(format_cents(99), "$0.99");
}

#[test]
fn test_format_exact_thousand() {
    assert_eq!(format_cents(100_000), "$1,000.00");
}

// ── parse_cents ───────────────────────────────────────────────

#[test]
fn test_parse_plain() {
    assert_eq!(parse_cents("300"), Some(30_000));
    assert_eq!(parse_cents("4.50"), Some(450));
    assert_eq!(parse_cents("0.05"), Some(5));
}

#[test]
fn test_parse_single_decimal_means_tens() {
    assert_eq!(parse_cents("4.5"), Some(450));
}

#[test]
fn test_parse_with_dollar_and_commas() {
    assert_eq!(parse_cents("$1,200"), Some(120_000));
    assert_eq!(parse_cents("$1,200.75"), Some(120_075));
}

#[test]
fn test_parse_negative() {
    assert_eq!(parse_cents("-50"), Some(-5_000));
    assert_eq!(parse_cents("-50.25"), Some(-5_025));
}

#[test]
fn test_parse_whitespace() {
    assert_eq!(parse_cents("  12.00 "), Some(1_200));
}

#[test]
fn test_parse_rejects_garbage() {
    assert_eq!(parse_cents(""), None);
    assert_eq!(parse_cents("abc"), None);
    assert_eq!(parse_cents("1.234"), None);
    assert_eq!(parse_cents("1.x"), None);
    assert_eq!(parse_cents("."), None);
}

#[test]
fn test_parse_format_roundtrip() {
    for cents in [0, 5, 99, 450, 12_345, 100_000, 123_456_789] {
        assert_eq!(parse_cents(&format_cents(cents)), Some(cents));
    }
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_and_scrolls() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_clamps_at_zero() {
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 0);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!(index, 9);
    assert_eq!(scroll, 6);
}

#[test]
fn test_scroll_to_top() {
    let (mut index, mut scroll) = (7, 5);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!(index, 0);
    assert_eq!(scroll, 0);
}

// ── Debouncer ─────────────────────────────────────────────────

#[test]
fn test_debouncer_fires_after_window() {
    let mut debouncer = Debouncer::new(Duration::from_millis(250));
    let start = Instant::now();

    debouncer.mark(start);
    assert!(debouncer.is_pending());
    assert!(!debouncer.ready(start + Duration::from_millis(100)));
    assert!(debouncer.ready(start + Duration::from_millis(300)));
    // One-shot: consumed after firing
    assert!(!debouncer.ready(start + Duration::from_millis(600)));
}

#[test]
fn test_debouncer_restarts_on_new_mark() {
    let mut debouncer = Debouncer::new(Duration::from_millis(250));
    let start = Instant::now();

    debouncer.mark(start);
    debouncer.mark(start + Duration::from_millis(200));
    // Window counts from the latest keystroke
    assert!(!debouncer.ready(start + Duration::from_millis(300)));
    assert!(debouncer.ready(start + Duration::from_millis(500)));
}

#[test]
fn test_debouncer_idle_never_fires() {
    let mut debouncer = Debouncer::new(Duration::from_millis(250));
    assert!(!debouncer.is_pending());
    assert!(!debouncer.ready(Instant::now() + Duration::from_secs(10)));
}

#[test]
fn test_debouncer_cancel() {
    let mut debouncer = Debouncer::new(Duration::from_millis(250));
    let start = Instant::now();
    debouncer.mark(start);
    debouncer.cancel();
    assert!(!debouncer.ready(start + Duration::from_secs(1)));
}
