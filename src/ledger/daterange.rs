use chrono::{Datelike, Days, Months, NaiveDate};

/// Named date ranges offered by the range picker, resolved against a
/// reference "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

impl RangePreset {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::ThisMonth => "month",
            Self::LastMonth => "last-month",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "7d" | "week" | "last-7-days" => Some(Self::Last7Days),
            "30d" | "last-30-days" => Some(Self::Last30Days),
            "month" | "this-month" => Some(Self::ThisMonth),
            "last-month" => Some(Self::LastMonth),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [RangePreset] {
        &[
            Self::Today,
            Self::Yesterday,
            Self::Last7Days,
            Self::Last30Days,
            Self::ThisMonth,
            Self::LastMonth,
        ]
    }

    /// Concrete inclusive day range for this preset, anchored at `today`.
    /// "This month" runs from day 1 through `today`; "last month" spans the
    /// full previous calendar month regardless of the current day-of-month.
    pub(crate) fn resolve(self, today: NaiveDate) -> DateRange {
        let first_of_month = today.with_day(1).unwrap_or(today);
        match self {
            Self::Today => DateRange::new(today, today),
            Self::Yesterday => {
                let d = today.checked_sub_days(Days::new(1)).unwrap_or(today);
                DateRange::new(d, d)
            }
            Self::Last7Days => {
                let from = today.checked_sub_days(Days::new(6)).unwrap_or(today);
                DateRange::new(from, today)
            }
            Self::Last30Days => {
                let from = today.checked_sub_days(Days::new(29)).unwrap_or(today);
                DateRange::new(from, today)
            }
            Self::ThisMonth => DateRange::new(first_of_month, today),
            Self::LastMonth => {
                let from = first_of_month
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(first_of_month);
                let to = first_of_month
                    .checked_sub_days(Days::new(1))
                    .unwrap_or(first_of_month);
                DateRange::new(from, to)
            }
        }
    }
}

impl std::fmt::Display for RangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::Yesterday => write!(f, "Yesterday"),
            Self::Last7Days => write!(f, "Last 7 Days"),
            Self::Last30Days => write!(f, "Last 30 Days"),
            Self::ThisMonth => write!(f, "This Month"),
            Self::LastMonth => write!(f, "Last Month"),
        }
    }
}

/// Inclusive [from, to] pair of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) from: NaiveDate,
    pub(crate) to: NaiveDate,
}

impl DateRange {
    pub(crate) fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub(crate) fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// The preset this range corresponds to at `today`, if any. Presets are
    /// checked in declaration order, so when ranges coincide (on the 1st of
    /// a month "this month" collapses onto "today") the earlier preset wins.
    pub(crate) fn matching_preset(&self, today: NaiveDate) -> Option<RangePreset> {
        RangePreset::all()
            .iter()
            .copied()
            .find(|p| p.resolve(today) == *self)
    }

    pub(crate) fn preset_or_default(&self, today: NaiveDate) -> RangePreset {
        self.matching_preset(today).unwrap_or(RangePreset::Today)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from.format("%Y-%m-%d"))
        } else {
            write!(
                f,
                "{} to {}",
                self.from.format("%Y-%m-%d"),
                self.to.format("%Y-%m-%d")
            )
        }
    }
}
