//! # Paper Log
//!
//! A paper-reading log kept as a YAML file in a git repository, with a README
//! that summarizes it. The YAML is the only thing a human edits; everything
//! else (charts, the README section, a JSON export) is derived from it on
//! every push.
//!
//! # Architecture: Validate, Aggregate, Render
//!
//! ```text
//! 1. Validate   data/papers.yml  →  Vec<Entry>          (or every violation)
//! 2. Aggregate  Vec<Entry>       →  AggregateResult     (histogram, daily, recent)
//! 3. Render     AggregateResult  →  charts + markdown   → spliced into README.md
//!    Export     Vec<Entry>       →  data/papers.json
//! ```
//!
//! Stages are pure functions over in-memory values. Only the
//! [`pipeline`] layer reads and writes files, and it computes every artifact
//! before writing any of them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`entry`] | The `Entry` record and its field-level checks |
//! | [`validate`] | YAML document validation, reporting every violation in one pass |
//! | [`aggregate`] | Category histogram, daily counts, activity window, recent list |
//! | [`render`] | Chart series, the `ChartRenderer` trait and SVG renderer, markdown, README splice |
//! | [`export`] | JSON export, re-parse, and the export's JSON Schema |
//! | [`artifact`] | Content-hashed atomic file writes |
//! | [`pipeline`] | `check` / `export` / `build` over a repository |
//! | [`config`] | `paper-log.toml` loading, layering, validation, time zone resolution |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## "Today" Is an Input
//!
//! The activity window ends on today's date in a configured time zone. That
//! date is resolved once, at the edge (`main`), and passed down. Aggregation
//! and rendering never read a clock, so tests pin the date and a given log
//! always renders to the same bytes.
//!
//! ## SVG Charts via Maud
//!
//! Charts are SVG documents generated with [Maud](https://maud.lambda.xyz/).
//! Auto-escaping covers category names taken verbatim from the log, there is
//! no font or rasterizer dependency, and the output diffs cleanly in git. The
//! [`render::ChartRenderer`] trait keeps the drawing swappable.
//!
//! ## Markers, Not Templates
//!
//! The README is hand-written except for the region between two marker lines.
//! The splice replaces that region and keeps every other byte, so editing the
//! README by hand and regenerating never conflict.

pub mod aggregate;
pub mod artifact;
pub mod config;
pub mod entry;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
