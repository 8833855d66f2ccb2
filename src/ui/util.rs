use std::time::{Duration, Instant};

/// Format an amount in cents as a USD string with thousand separators.
/// e.g. `123456789` → `"$1,234,567.89"`, `-5000` → `"-$50.00"`
pub(crate) fn format_cents(cents: i64) -> String {
    let abs = cents.unsigned_abs();
    let int_part = (abs / 100).to_string();
    let dec_part = abs % 100;

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if cents < 0 {
        format!("-${with_commas}.{dec_part:02}")
    } else {
        format!("${with_commas}.{dec_part:02}")
    }
}

/// Parse a user-typed amount like "4.50", "$1,200" or "300" into cents.
/// Returns `None` for malformed input or more than two decimal places.
pub(crate) fn parse_cents(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole_value: i64 = whole.parse().ok()?;
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        // "5" means 50 cents, "05" means 5
        format!("{frac:0<2}").parse().ok()?
    };

    if whole.starts_with('-') {
        Some(whole_value * 100 - frac_value)
    } else {
        Some(whole_value * 100 + frac_value)
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Collapses bursts of changes into one refresh. Each keystroke calls
/// [`Debouncer::mark`]; the event loop polls [`Debouncer::ready`] on its
/// tick and refreshes only once the window has passed with no new marks.
#[derive(Debug)]
pub(crate) struct Debouncer {
    window: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            pending_since: None,
        }
    }

    pub(crate) fn mark(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True exactly once, when the debounce window has elapsed since the
    /// last mark. Clears the pending state.
    pub(crate) fn ready(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= self.window => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending_since = None;
    }
}
