//! Shared test utilities for the paper-log test suite.
//!
//! Builders for entries and dates, a couple of canned logs, and a fixture
//! repository copied into a temp directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let entries = vec![entry("A", "LLM", "2025-01-01", "https://x")];
//! let hist = category_histogram(&entries);
//! assert_eq!(histogram_pairs(&hist), vec![("LLM", 1)]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::aggregate::CategoryHistogram;
use crate::entry::Entry;
use chrono::NaiveDate;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// The two-record log used throughout the docs.
pub const TWO_ENTRY_YAML: &str = "\
- title: A
  category: LLM
  date: 2025-01-01
  link: https://x
- title: B
  category: TTS
  date: 2025-01-02
  link: https://y
";

/// Parse a `YYYY-MM-DD` date. Panics on bad input.
pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date '{text}': {e}"))
}

/// An entry without a note.
pub fn entry(title: &str, category: &str, day: &str, link: &str) -> Entry {
    Entry {
        title: title.to_string(),
        category: category.to_string(),
        date: date(day),
        link: link.to_string(),
        note: None,
    }
}

/// The entries of [`TWO_ENTRY_YAML`].
pub fn two_entries() -> Vec<Entry> {
    vec![
        entry("A", "LLM", "2025-01-01", "https://x"),
        entry("B", "TTS", "2025-01-02", "https://y"),
    ]
}

/// Seven entries over four categories, two sharing a date, in storage order.
pub fn sample_entries() -> Vec<Entry> {
    vec![
        entry("Attention", "LLM", "2025-01-03", "https://arxiv.org/abs/1706.03762"),
        entry("Tacotron", "TTS", "2025-01-05", "https://arxiv.org/abs/1703.10135"),
        entry("ViT", "Vision", "2025-01-20", "https://arxiv.org/abs/2010.11929"),
        entry("GPT-3", "LLM", "2025-02-01", "https://arxiv.org/abs/2005.14165"),
        entry("VITS", "TTS", "2025-02-01", "https://arxiv.org/abs/2106.06103"),
        entry("Whisper", "Audio", "2025-02-10", "https://arxiv.org/abs/2212.04356"),
        entry("LLaMA", "LLM", "2025-02-14", "https://arxiv.org/abs/2302.13971"),
    ]
}

// =========================================================================
// Extractors
// =========================================================================

/// Histogram rows as `(category, count)` pairs, in display order.
pub fn histogram_pairs(histogram: &CategoryHistogram) -> Vec<(&str, usize)> {
    histogram
        .rows
        .iter()
        .map(|row| (row.category.as_str(), row.count))
        .collect()
}
