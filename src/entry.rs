//! The reading-log record.
//!
//! [`Entry`] is the single definition of what one paper in the log looks
//! like. The validator converts raw YAML records into entries, and the
//! exporter serializes entries back out; both go through this type, so field
//! names, field order and date formatting are fixed in one place.
//!
//! ```yaml
//! - title: "Attention Is All You Need"
//!   category: LLM
//!   date: 2025-01-01
//!   link: https://arxiv.org/abs/1706.03762
//!   note: optional free text
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// Field names, in serialization order.
pub const FIELDS: [&str; 5] = ["title", "category", "date", "link", "note"];

/// Fields every record must carry as non-empty strings.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "category", "date", "link"];

/// One paper read.
///
/// Field declaration order is the export's field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub title: String,
    /// Free-form, case-sensitive label.
    pub category: String,
    pub date: NaiveDate,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Rejects other shapes chrono would otherwise accept (single-digit months,
/// signed years) and impossible dates such as `2025-02-30`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Why a link was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkProblem {
    /// Not an absolute URL at all.
    Unparseable,
    /// Parsed, but the scheme is not in the allowed set.
    Scheme(String),
    /// Parsed, but has no host (`mailto:`, `file:///`).
    NoHost,
    /// Parsed, but written differently from its parsed form (padding,
    /// spaces, upper-case host). Carries the form to write instead.
    NotCanonical(String),
}

/// Check that `text` is an absolute URL with an allowed scheme and a host,
/// written the way it parses.
///
/// The one tolerated difference is the `/` the parser adds to an empty path,
/// so `https://x` and `https://x/` both pass. The returned URL's `as_str()`
/// is the form to compare links by.
pub fn check_link(text: &str, allowed_schemes: &[String]) -> Result<Url, LinkProblem> {
    let url = Url::parse(text).map_err(|_| LinkProblem::Unparseable)?;
    if !allowed_schemes
        .iter()
        .any(|s| s.eq_ignore_ascii_case(url.scheme()))
    {
        return Err(LinkProblem::Scheme(url.scheme().to_string()));
    }
    if !matches!(url.host_str(), Some(host) if !host.is_empty()) {
        return Err(LinkProblem::NoHost);
    }
    let canonical = url.as_str();
    if canonical != text && canonical.strip_suffix('/') != Some(text) {
        return Err(LinkProblem::NotCanonical(canonical.to_string()));
    }
    Ok(url)
}
