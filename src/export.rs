//! JSON interchange export.
//!
//! The export is the validated log as a pretty-printed JSON array, one object
//! per entry with fields in [`FIELDS`](crate::entry::FIELDS) order and `note`
//! omitted when absent. It is regenerated wholesale on every run, so it never
//! drifts from the YAML source.

use crate::entry::Entry;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize entries as 2-space-indented JSON with a trailing newline.
pub fn export(entries: &[Entry]) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(entries)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Read an export back into entries.
pub fn parse_export(bytes: &[u8]) -> Result<Vec<Entry>, ExportError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// JSON Schema (draft 2020-12) every export validates against.
pub fn interchange_schema() -> Value {
    let text = json!({ "type": "string", "minLength": 1 });
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Paper log export",
        "description": "Papers read, in log order.",
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": false,
            "required": ["title", "category", "date", "link"],
            "properties": {
                "title": text.clone(),
                "category": text,
                "date": { "type": "string", "format": "date", "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$" },
                "link": { "type": "string", "format": "uri" },
                "note": { "type": "string" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FIELDS;
    use crate::test_helpers::*;

    #[test]
    fn export_shape() {
        let text = String::from_utf8(export(&two_entries()).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"[
  {
    "title": "A",
    "category": "LLM",
    "date": "2025-01-01",
    "link": "https://x"
  },
  {
    "title": "B",
    "category": "TTS",
    "date": "2025-01-02",
    "link": "https://y"
  }
]
"#
        );
    }

    #[test]
    fn note_is_kept_when_present() {
        let mut entries = two_entries();
        entries[0].note = Some("skim again".into());
        let text = String::from_utf8(export(&entries).unwrap()).unwrap();
        assert!(text.contains("\"link\": \"https://x\",\n    \"note\": \"skim again\"\n"));
        assert_eq!(text.matches("\"note\"").count(), 1);
    }

    #[test]
    fn non_ascii_is_literal() {
        let entries = vec![entry("Überblick 音声", "TTS", "2025-01-01", "https://x")];
        let text = String::from_utf8(export(&entries).unwrap()).unwrap();
        assert!(text.contains("\"title\": \"Überblick 音声\""));
    }

    #[test]
    fn export_then_parse_yields_input() {
        let mut entries = sample_entries();
        entries[1].note = Some("with a note".into());
        let parsed = parse_export(&export(&entries).unwrap()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn empty_log_exports_empty_array() {
        assert_eq!(export(&[]).unwrap(), b"[]\n");
        assert!(parse_export(b"[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let bytes = br#"[{"title":"A","category":"B","date":"2025-01-01","link":"https://x","extra":1}]"#;
        assert!(parse_export(bytes).is_err());
    }

    #[test]
    fn schema_matches_entry_fields() {
        let schema = interchange_schema();
        let properties = schema["items"]["properties"].as_object().unwrap();
        let mut names: Vec<&str> = properties.keys().map(|k| k.as_str()).collect();
        let mut expected = FIELDS.to_vec();
        names.sort_unstable();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 4);
    }
}
