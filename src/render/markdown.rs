//! Markdown fragments for the README block.
//!
//! Both fragments are plain strings with `\n` line endings and no trailing
//! newline; the caller joins them.

use crate::aggregate::CategoryHistogram;
use crate::entry::Entry;

pub const BREAKDOWN_HEADING: &str = "**Breakdown**";
pub const RECENT_HEADING: &str = "**Recently read**";
pub const EMPTY_RECENT: &str = "_No papers yet._";

/// Category table, one row per histogram row plus a bold total.
pub fn breakdown_table(histogram: &CategoryHistogram) -> String {
    let mut lines = vec![
        BREAKDOWN_HEADING.to_string(),
        String::new(),
        "| Category | Count |".to_string(),
        "|---|---|".to_string(),
    ];
    for row in &histogram.rows {
        lines.push(format!(
            "| {} | {} |",
            escape_markdown(&row.category),
            row.count
        ));
    }
    lines.push(format!("| **Total** | **{}** |", histogram.total));
    lines.join("\n")
}

/// Bulleted list of recent entries, most recent first.
pub fn recent_list(recent: &[Entry]) -> String {
    let mut lines = vec![RECENT_HEADING.to_string(), String::new()];
    if recent.is_empty() {
        lines.push(EMPTY_RECENT.to_string());
    }
    for entry in recent {
        lines.push(format!(
            "- [{}]({}) — *{}* ({})",
            escape_markdown(&entry.title),
            entry.link,
            escape_markdown(&entry.category),
            entry.date.format("%Y-%m-%d")
        ));
    }
    lines.join("\n")
}

/// Backslash-escape the characters that would otherwise open emphasis,
/// code, a link or a table cell, so log text renders as written.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '[' | ']' | '|' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::category_histogram;
    use crate::test_helpers::*;
    use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

    /// Concatenated text of a markdown fragment, and of its emphasis spans.
    fn parsed_text(markdown: &str) -> (String, Vec<String>) {
        let mut all = String::new();
        let mut emphasis = Vec::new();
        let mut in_emphasis = false;
        for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
            match event {
                Event::Start(Tag::Emphasis) => {
                    in_emphasis = true;
                    emphasis.push(String::new());
                }
                Event::End(TagEnd::Emphasis) => in_emphasis = false,
                Event::Text(text) => {
                    all.push_str(&text);
                    if in_emphasis {
                        if let Some(span) = emphasis.last_mut() {
                            span.push_str(&text);
                        }
                    }
                }
                Event::Code(_) => all.push_str("<code>"),
                _ => {}
            }
        }
        (all, emphasis)
    }

    #[test]
    fn breakdown_for_two_entries() {
        let table = breakdown_table(&category_histogram(&two_entries()));
        assert_eq!(
            table,
            "**Breakdown**\n\n| Category | Count |\n|---|---|\n| LLM | 1 |\n| TTS | 1 |\n| **Total** | **2** |"
        );
    }

    #[test]
    fn breakdown_parses_as_table() {
        let table = breakdown_table(&category_histogram(&sample_entries()));
        let parser = Parser::new_ext(&table, Options::ENABLE_TABLES);
        let rows = parser
            .filter(|event| matches!(event, Event::Start(Tag::TableRow)))
            .count();
        // body rows only; the header row is a TableHead
        assert_eq!(rows, category_histogram(&sample_entries()).rows.len() + 1);
    }

    #[test]
    fn breakdown_escapes_pipes() {
        let entries = vec![entry("A", "A|B", "2025-01-01", "https://x")];
        let table = breakdown_table(&category_histogram(&entries));
        assert!(table.contains("| A\\|B | 1 |"));

        let cells = Parser::new_ext(&table, Options::ENABLE_TABLES)
            .filter(|event| matches!(event, Event::Start(Tag::TableCell)))
            .count();
        assert_eq!(cells, 6);
    }

    #[test]
    fn empty_breakdown_keeps_total_row() {
        let table = breakdown_table(&CategoryHistogram::default());
        assert!(table.ends_with("|---|---|\n| **Total** | **0** |"));
    }

    #[test]
    fn recent_list_bullets() {
        let mut recent = two_entries();
        recent.reverse();
        assert_eq!(
            recent_list(&recent),
            "**Recently read**\n\n- [B](https://y) — *TTS* (2025-01-02)\n- [A](https://x) — *LLM* (2025-01-01)"
        );
    }

    #[test]
    fn recent_list_escapes_brackets() {
        let recent = vec![entry("[RFC] Attention", "LLM", "2025-01-01", "https://x")];
        let text = recent_list(&recent);
        assert!(text.contains("- [\\[RFC\\] Attention](https://x)"));

        let links = Parser::new(&text)
            .filter(|event| matches!(event, Event::Start(Tag::Link { .. })))
            .count();
        assert_eq!(links, 1);
    }

    #[test]
    fn recent_list_category_with_asterisk_stays_one_emphasis() {
        let recent = vec![entry("A", "C*", "2025-01-01", "https://x")];
        let text = recent_list(&recent);
        assert!(text.contains("— *C\\**"), "{text}");

        let (all, emphasis) = parsed_text(&text);
        assert_eq!(emphasis, vec!["C*"]);
        assert!(all.ends_with("A — C* (2025-01-01)"), "{all}");
    }

    #[test]
    fn recent_list_title_round_trips_through_markdown() {
        let title = "a_b_ *c* `d` \\e [f]";
        let recent = vec![entry(title, "LLM", "2025-01-01", "https://x")];
        let (all, emphasis) = parsed_text(&recent_list(&recent));
        assert_eq!(emphasis, vec!["LLM"]);
        assert!(all.contains(title), "{all}");
        assert!(!all.contains("<code>"));
    }

    #[test]
    fn breakdown_cells_keep_markdown_characters() {
        let entries = vec![entry("A", "C*_x`", "2025-01-01", "https://x")];
        let table = breakdown_table(&category_histogram(&entries));
        let (all, emphasis) = parsed_text(&table);
        assert!(emphasis.is_empty());
        assert!(all.contains("C*_x`1"), "{all}");
    }

    #[test]
    fn empty_recent_list() {
        assert_eq!(recent_list(&[]), "**Recently read**\n\n_No papers yet._");
    }
}
