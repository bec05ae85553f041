//! Derived views over a validated log.
//!
//! Everything here is a pure function of the entry list and
//! [`AggregateOptions`]. "Today" is an input, not a clock read, so a given
//! log and date always produce the same result.

use crate::entry::Entry;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Parameters for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Last day of the activity window, in the configured time zone.
    pub today: NaiveDate,
    /// Window length in days, `today` included. At least 1.
    pub window_days: u32,
    /// How many entries the recent list keeps.
    pub recent_limit: usize,
}

/// One histogram row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Entries per category, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryHistogram {
    /// Descending count, ties by ascending category name.
    pub rows: Vec<CategoryCount>,
    pub total: usize,
}

/// Entries read on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Per-day counts over the trailing window, one slot per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Consecutive days from `start` to `end`, zero days included.
    pub days: Vec<DayCount>,
}

impl ActivityWindow {
    /// Entries read inside the window.
    pub fn total(&self) -> usize {
        self.days.iter().map(|d| d.count).sum()
    }

    pub fn len_days(&self) -> usize {
        self.days.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub histogram: CategoryHistogram,
    /// Counts for every date that appears in the log.
    pub daily: BTreeMap<NaiveDate, usize>,
    pub activity: ActivityWindow,
    /// Most recent first, at most `recent_limit` long.
    pub recent: Vec<Entry>,
}

pub fn aggregate(entries: &[Entry], options: &AggregateOptions) -> AggregateResult {
    let daily = daily_counts(entries);
    AggregateResult {
        histogram: category_histogram(entries),
        activity: activity_window(&daily, options.today, options.window_days),
        daily,
        recent: recent_entries(entries, options.recent_limit),
    }
}

/// Count entries per distinct category.
///
/// Categories are case-sensitive: `LLM` and `llm` are separate rows.
pub fn category_histogram(entries: &[Entry]) -> CategoryHistogram {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.category.as_str()).or_default() += 1;
    }

    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
    });

    let total = rows.iter().map(|r| r.count).sum();
    CategoryHistogram { rows, total }
}

/// Entries per calendar date, over the dates that occur.
pub fn daily_counts(entries: &[Entry]) -> BTreeMap<NaiveDate, usize> {
    let mut daily = BTreeMap::new();
    for entry in entries {
        *daily.entry(entry.date).or_default() += 1;
    }
    daily
}

/// Dense counts for `[today - (window_days - 1), today]`.
///
/// Days outside the window, future dates included, are not counted.
pub fn activity_window(
    daily: &BTreeMap<NaiveDate, usize>,
    today: NaiveDate,
    window_days: u32,
) -> ActivityWindow {
    let span = u64::from(window_days.max(1) - 1);
    let start = today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);

    let days = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| DayCount {
            date,
            count: daily.get(&date).copied().unwrap_or(0),
        })
        .collect();

    ActivityWindow {
        start,
        end: today,
        days,
    }
}

/// The `limit` most recent entries.
///
/// Stable sort on date descending, so entries sharing a date keep their
/// storage order.
pub fn recent_entries(entries: &[Entry], limit: usize) -> Vec<Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.into_iter().take(limit).cloned().collect()
}
