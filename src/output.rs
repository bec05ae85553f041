//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! WARN: item #3: unknown key 'tags' (will be ignored)
//! Validated 12 entries successfully.
//! ```
//!
//! Violations go to stderr, one per line, after a count:
//!
//! ```text
//! ERROR: item #2 ("Attention"): 'date' must be a real date in YYYY-MM-DD form, got "2025-02-30"
//! ERROR: item #5: missing required field 'title'
//! ERROR: validation failed with 2 error(s)
//! ```
//!
//! ## Build
//!
//! ```text
//! Breakdown
//! 001 LLM (3)
//! 002 TTS (2)
//!     Total: 5
//!
//! Activity
//!     2 papers read in the last 12 months
//!
//! Recently read
//! 001 LLaMA
//!     2025-02-14 LLM
//!
//! Artifacts
//!     assets/category_stylish.svg: written
//!     README.md: unchanged
//! ```
//!
//! ## Export
//!
//! ```text
//! Wrote data/papers.json (12 entries)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure: no I/O, no side effects.

use crate::aggregate::AggregateResult;
use crate::artifact::WriteStatus;
use crate::pipeline::{ArtifactWrite, BuildReport, ExportReport, PipelineError};
use crate::render::series::window_phrase;
use crate::validate::{Validated, Warning};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Warnings and errors
// ============================================================================

pub fn format_warnings(warnings: &[Warning]) -> Vec<String> {
    warnings.iter().map(|w| format!("WARN: {w}")).collect()
}

/// Error lines for a failed command. Schema errors list every violation.
pub fn format_error(err: &PipelineError) -> Vec<String> {
    let mut lines = Vec::new();
    if let PipelineError::Schema(schema) = err {
        for violation in &schema.violations {
            lines.push(format!("ERROR: {violation}"));
        }
    }
    lines.push(format!("ERROR: {err}"));
    lines
}

pub fn print_error(err: &PipelineError) {
    for line in format_error(err) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_output(validated: &Validated) -> Vec<String> {
    let mut lines = format_warnings(&validated.warnings);
    lines.push(format!(
        "Validated {} successfully.",
        plural(validated.entries.len(), "entry", "entries")
    ));
    lines
}

pub fn print_check_output(validated: &Validated) {
    for line in format_check_output(validated) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

fn format_aggregate(result: &AggregateResult) -> Vec<String> {
    let mut lines = vec!["Breakdown".to_string()];
    for (i, row) in result.histogram.rows.iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), row.category, row.count));
    }
    lines.push(format!("{}Total: {}", indent(1), result.histogram.total));

    lines.push(String::new());
    lines.push("Activity".to_string());
    lines.push(format!(
        "{}{} read in the last {}",
        indent(1),
        plural(result.activity.total(), "paper", "papers"),
        window_phrase(result.activity.len_days())
    ));

    lines.push(String::new());
    lines.push("Recently read".to_string());
    if result.recent.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, entry) in result.recent.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), entry.title));
        lines.push(format!("{}{} {}", indent(1), entry.date, entry.category));
    }
    lines
}

fn format_artifacts(artifacts: &[ArtifactWrite]) -> Vec<String> {
    let mut lines = vec!["Artifacts".to_string()];
    for artifact in artifacts {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            artifact.path.display(),
            artifact.status
        ));
    }
    lines
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = format_warnings(&report.warnings);
    lines.extend(format_aggregate(&report.aggregate));
    lines.push(String::new());
    lines.extend(format_artifacts(&report.artifacts));

    let written = report
        .artifacts
        .iter()
        .filter(|a| a.status == WriteStatus::Written)
        .count();
    lines.push(String::new());
    lines.push(format!(
        "Built from {}, {} updated",
        plural(report.entries, "entry", "entries"),
        plural(written, "file", "files")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// export
// ============================================================================

pub fn format_export_output(report: &ExportReport) -> Vec<String> {
    let mut lines = format_warnings(&report.warnings);
    let verb = match report.artifact.status {
        WriteStatus::Written => "Wrote",
        WriteStatus::Unchanged => "Unchanged",
    };
    lines.push(format!(
        "{} {} ({})",
        verb,
        report.artifact.path.display(),
        plural(report.entries, "entry", "entries")
    ));
    lines
}

pub fn print_export_output(report: &ExportReport) {
    for line in format_export_output(report) {
        println!("{}", line);
    }
}
