//! Chart input series.
//!
//! These structs describe *what* to draw, not *how* to draw it. They are the
//! interface between the aggregate (which decides what the numbers are) and a
//! [`ChartRenderer`](super::backend::ChartRenderer) (which does the drawing).
//! Everything a renderer needs is precomputed here, ordering and labels
//! included, so two renderers given the same series draw the same chart.
//!
//! ## Types
//!
//! - [`CategorySeries`]: labeled bars, in histogram display order.
//! - [`HeatmapSeries`]: Sunday-first week columns with seven day slots each,
//!   month labels, and an intensity level per day.

use crate::aggregate::{ActivityWindow, CategoryHistogram};
use chrono::{Datelike, Days, NaiveDate};

/// Title of the category chart.
pub const CATEGORY_TITLE: &str = "Papers by Category";

/// Highest intensity level; counts above it share its color.
pub const MAX_LEVEL: usize = 5;

/// Fill color per intensity level, zero first.
pub const LEVEL_COLORS: [&str; MAX_LEVEL + 1] = [
    "#888888", "#1c526b", "#177b90", "#12a5b5", "#0dceda", "#08f7fe",
];

/// One bar of the category chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySeries {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl CategorySeries {
    pub fn max_value(&self) -> usize {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

/// One heatmap column: a Sunday-to-Saturday week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapWeek {
    /// The Sunday opening this week.
    pub start: NaiveDate,
    /// Counts for Sunday..Saturday; `None` for days outside the window.
    pub days: [Option<usize>; 7],
    /// Abbreviated month name when this week holds the 1st of a month.
    pub month_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapSeries {
    pub title: String,
    pub weeks: Vec<HeatmapWeek>,
    /// Entries counted inside the window.
    pub total: usize,
}

/// Intensity level for a day count, clamped to [`MAX_LEVEL`].
pub fn level(count: usize) -> usize {
    count.min(MAX_LEVEL)
}

pub fn category_series(histogram: &CategoryHistogram) -> CategorySeries {
    CategorySeries {
        title: CATEGORY_TITLE.to_string(),
        bars: histogram
            .rows
            .iter()
            .map(|row| Bar {
                label: row.category.clone(),
                value: row.count,
            })
            .collect(),
    }
}

/// Lay the activity window out as a calendar grid.
///
/// The first column starts on the Sunday on or before the window start, and
/// columns continue until the week holding the window end.
pub fn heatmap_series(window: &ActivityWindow) -> HeatmapSeries {
    let lead = u64::from(window.start.weekday().num_days_from_sunday());
    let grid_start = window
        .start
        .checked_sub_days(Days::new(lead))
        .unwrap_or(window.start);

    let count_on = |date: NaiveDate| -> Option<usize> {
        if date < window.start || date > window.end {
            return None;
        }
        let offset = (date - window.start).num_days() as usize;
        window.days.get(offset).map(|d| d.count)
    };

    let weeks = grid_start
        .iter_weeks()
        .take_while(|week_start| *week_start <= window.end)
        .map(|week_start| {
            let dates: Vec<NaiveDate> = week_start.iter_days().take(7).collect();
            let mut days = [None; 7];
            for (slot, date) in days.iter_mut().zip(&dates) {
                *slot = count_on(*date);
            }
            let month_label = dates
                .iter()
                .find(|d| d.day() == 1 && count_on(**d).is_some())
                .map(|d| d.format("%b").to_string());
            HeatmapWeek {
                start: week_start,
                days,
                month_label,
            }
        })
        .collect();

    let total = window.total();
    HeatmapSeries {
        title: format!(
            "{} {} read in the last {}",
            total,
            if total == 1 { "paper" } else { "papers" },
            window_phrase(window.days.len())
        ),
        weeks,
        total,
    }
}

/// Human phrase for a window length: "12 months", "8 weeks", "10 days".
pub fn window_phrase(days: usize) -> String {
    match days {
        365 | 366 => "12 months".to_string(),
        1 => "day".to_string(),
        7 => "week".to_string(),
        n if n % 7 == 0 => format!("{} weeks", n / 7),
        n => format!("{n} days"),
    }
}
