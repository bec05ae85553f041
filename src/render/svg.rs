//! SVG chart renderer.
//!
//! Charts are built with [maud](https://maud.lambda.xyz/) rather than string
//! concatenation, so labels (category names come straight from the YAML) are
//! always escaped. Every element gets an explicit closing tag, which keeps the
//! output well-formed XML.
//!
//! Output is byte-stable: no timestamps, no generated ids, fixed number
//! formatting. Text is left as `<text>` elements and relies on the viewer's
//! sans-serif font.

use super::backend::{ChartError, ChartRenderer};
use super::series::{CategorySeries, HeatmapSeries, LEVEL_COLORS, level};
use maud::{Markup, html};

const BACKGROUND: &str = "#212946";
const TEXT: &str = "#eeeeee";
const GRID: &str = "#2a3459";
const BAR: &str = "#08f7fe";
const FONT: &str = "DejaVu Sans, Verdana, sans-serif";

// Category chart geometry
const CHART_WIDTH: f64 = 800.0;
const LABEL_WIDTH: f64 = 170.0;
const VALUE_PAD: f64 = 60.0;
const TITLE_HEIGHT: f64 = 56.0;
const AXIS_HEIGHT: f64 = 44.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 12.0;

// Heatmap geometry
const CELL: f64 = 11.0;
const PITCH: f64 = 14.0;
const DAY_LABEL_WIDTH: f64 = 34.0;
const HEATMAP_TOP: f64 = 54.0;
const LEGEND_HEIGHT: f64 = 30.0;

/// Renders both charts as standalone SVG documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn category_chart(&self, series: &CategorySeries) -> Result<Vec<u8>, ChartError> {
        Ok(document(category_markup(series)))
    }

    fn heatmap(&self, series: &HeatmapSeries) -> Result<Vec<u8>, ChartError> {
        Ok(document(heatmap_markup(series)))
    }
}

fn document(markup: Markup) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
        markup.into_string()
    )
    .into_bytes()
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn category_markup(series: &CategorySeries) -> Markup {
    let rows = series.bars.len().max(1) as f64;
    let height = TITLE_HEIGHT + rows * (BAR_HEIGHT + BAR_GAP) + AXIS_HEIGHT;
    let plot_width = CHART_WIDTH - LABEL_WIDTH - VALUE_PAD;
    let max = series.max_value().max(1) as f64;
    let plot_bottom = height - AXIS_HEIGHT + BAR_GAP / 2.0;

    html! {
        svg xmlns="http://www.w3.org/2000/svg" width=(num(CHART_WIDTH)) height=(num(height))
            viewBox={ "0 0 " (num(CHART_WIDTH)) " " (num(height)) }
            font-family=(FONT) role="img" aria-label=(series.title) {
            defs {
                linearGradient id="bar-fill" x1="0" y1="0" x2="1" y2="0" {
                    stop offset="0" stop-color=(BAR) stop-opacity="0.25" {}
                    stop offset="1" stop-color=(BAR) stop-opacity="1" {}
                }
            }
            rect width="100%" height="100%" fill=(BACKGROUND) {}
            text x=(num(CHART_WIDTH / 2.0)) y="34" text-anchor="middle" font-size="18"
                font-weight="bold" fill=(TEXT) { (series.title) }
            @for quarter in 0..=4 {
                @let x = LABEL_WIDTH + plot_width * f64::from(quarter) / 4.0;
                line x1=(num(x)) y1=(num(TITLE_HEIGHT)) x2=(num(x)) y2=(num(plot_bottom))
                    stroke=(GRID) stroke-width="1" {}
            }
            @if series.bars.is_empty() {
                text x=(num(LABEL_WIDTH + plot_width / 2.0)) y=(num(TITLE_HEIGHT + BAR_HEIGHT))
                    text-anchor="middle" font-size="13" fill=(TEXT) { "No papers yet" }
            }
            @for (i, bar) in series.bars.iter().enumerate() {
                @let y = TITLE_HEIGHT + i as f64 * (BAR_HEIGHT + BAR_GAP);
                @let width = plot_width * bar.value as f64 / max;
                @let mid = y + BAR_HEIGHT / 2.0 + 4.5;
                text x=(num(LABEL_WIDTH - 10.0)) y=(num(mid)) text-anchor="end"
                    font-size="13" fill=(TEXT) { (bar.label) }
                rect x=(num(LABEL_WIDTH)) y=(num(y)) width=(num(width)) height=(num(BAR_HEIGHT))
                    rx="3" fill="url(#bar-fill)" {}
                text x=(num(LABEL_WIDTH + width + 8.0)) y=(num(mid)) font-size="12"
                    fill=(TEXT) { (bar.value) }
            }
            text x=(num(LABEL_WIDTH + plot_width / 2.0)) y=(num(height - 14.0))
                text-anchor="middle" font-size="12" fill=(TEXT) { "Count" }
        }
    }
}

fn heatmap_markup(series: &HeatmapSeries) -> Markup {
    let columns = series.weeks.len() as f64;
    let width = DAY_LABEL_WIDTH + columns * PITCH + 12.0;
    let grid_bottom = HEATMAP_TOP + 7.0 * PITCH;
    let height = grid_bottom + LEGEND_HEIGHT;
    let legend_y = grid_bottom + 10.0;
    let legend_x = width - 12.0 - 40.0 - LEVEL_COLORS.len() as f64 * PITCH;

    html! {
        svg xmlns="http://www.w3.org/2000/svg" width=(num(width)) height=(num(height))
            viewBox={ "0 0 " (num(width)) " " (num(height)) }
            font-family=(FONT) role="img" aria-label=(series.title) {
            rect width="100%" height="100%" fill=(BACKGROUND) {}
            text x=(num(width / 2.0)) y="24" text-anchor="middle" font-size="14"
                font-weight="bold" fill=(TEXT) { (series.title) }
            @for (row, name) in [(1, "Mon"), (3, "Wed"), (5, "Fri")] {
                text x=(num(DAY_LABEL_WIDTH - 6.0))
                    y=(num(HEATMAP_TOP + f64::from(row) * PITCH + CELL - 2.0))
                    text-anchor="end" font-size="9" fill=(TEXT) { (name) }
            }
            @for (col, week) in series.weeks.iter().enumerate() {
                @let x = DAY_LABEL_WIDTH + col as f64 * PITCH;
                @if let Some(month) = &week.month_label {
                    text x=(num(x)) y=(num(HEATMAP_TOP - 6.0)) font-size="9" fill=(TEXT) {
                        (month)
                    }
                }
                @for (row, day) in week.days.iter().enumerate() {
                    @if let Some(count) = day {
                        rect x=(num(x)) y=(num(HEATMAP_TOP + row as f64 * PITCH))
                            width=(num(CELL)) height=(num(CELL)) rx="2"
                            fill=(LEVEL_COLORS[level(*count)]) {
                            title { (week.start + chrono::Days::new(row as u64)) ": " (count) }
                        }
                    }
                }
            }
            text x=(num(legend_x - 6.0)) y=(num(legend_y + CELL - 2.0)) text-anchor="end"
                font-size="9" fill=(TEXT) { "Less" }
            @for (i, color) in LEVEL_COLORS.iter().enumerate() {
                rect x=(num(legend_x + i as f64 * PITCH)) y=(num(legend_y))
                    width=(num(CELL)) height=(num(CELL)) rx="2" fill=(color) {}
            }
            text x=(num(legend_x + LEVEL_COLORS.len() as f64 * PITCH + 3.0))
                y=(num(legend_y + CELL - 2.0)) font-size="9" fill=(TEXT) { "More" }
        }
    }
}
