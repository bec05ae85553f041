//! Marker-delimited README splicing.
//!
//! The destination document holds a start marker line and an end marker
//! line. Everything strictly between them belongs to us and is replaced on
//! every build; every other byte is preserved. A marker line is one whose
//! trimmed text equals the trimmed marker, outside any code block, so a
//! README that documents its own markers in a fenced example is left alone.

use crate::config::MarkersConfig;
use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("marker {marker} not found")]
    MissingMarker { marker: String },
    #[error("marker {marker} appears more than once (lines {lines:?})")]
    DuplicateMarker { marker: String, lines: Vec<usize> },
    #[error("end marker on line {end} comes before start marker on line {start}")]
    OutOfOrder { start: usize, end: usize },
}

/// Replace the content between the marker lines with `block`.
///
/// The start line, the end line and everything outside them are kept
/// byte-for-byte. Splicing the same block twice yields the same text.
pub fn splice(doc: &str, markers: &MarkersConfig, block: &str) -> Result<String, FormatError> {
    let (start, end) = find_markers(doc, markers)?;

    let mut out = String::with_capacity(doc.len() + block.len());
    out.push_str(&doc[..start.end]);
    out.push_str(block);
    out.push('\n');
    out.push_str(&doc[end.start..]);
    Ok(out)
}

/// Byte ranges of the start and end marker lines, newline included.
fn find_markers(
    doc: &str,
    markers: &MarkersConfig,
) -> Result<(Range<usize>, Range<usize>), FormatError> {
    let start_marker = markers.start.trim();
    let end_marker = markers.end.trim();
    let code = code_block_ranges(doc);
    let in_code = |offset: usize| code.iter().any(|r| r.contains(&offset));

    let mut starts: Vec<(usize, Range<usize>)> = Vec::new();
    let mut ends: Vec<(usize, Range<usize>)> = Vec::new();

    let mut offset = 0;
    for (index, line) in doc.split_inclusive('\n').enumerate() {
        let range = offset..offset + line.len();
        offset = range.end;
        let trimmed = line.trim();
        let indent = line.len() - line.trim_start().len();
        if in_code(range.start + indent) {
            continue;
        }
        if trimmed == start_marker {
            starts.push((index + 1, range));
        } else if trimmed == end_marker {
            ends.push((index + 1, range));
        }
    }

    let start = single(starts, start_marker)?;
    let end = single(ends, end_marker)?;
    if end.0 < start.0 {
        return Err(FormatError::OutOfOrder {
            start: start.0,
            end: end.0,
        });
    }
    Ok((start.1, end.1))
}

fn single(
    mut found: Vec<(usize, Range<usize>)>,
    marker: &str,
) -> Result<(usize, Range<usize>), FormatError> {
    match found.len() {
        0 => Err(FormatError::MissingMarker {
            marker: marker.to_string(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(FormatError::DuplicateMarker {
            marker: marker.to_string(),
            lines: found.into_iter().map(|(line, _)| line).collect(),
        }),
    }
}

/// Byte ranges covered by fenced or indented code blocks.
fn code_block_ranges(doc: &str) -> Vec<Range<usize>> {
    Parser::new(doc)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}
