//! Reading-log validation.
//!
//! Turns the raw YAML document into a list of [`Entry`] values, or reports
//! every problem found in one pass. Nothing short-circuits: a record with a
//! missing title still gets its date and link checked, and later records are
//! still inspected, so one run lists everything a human needs to fix.
//!
//! ## Rules
//!
//! Document level:
//! - The file parses as YAML; an empty file is an empty log.
//! - The top level is a list.
//!
//! Per record:
//! - The record is a mapping.
//! - `title`, `category`, `date`, `link` are present, strings, and not blank.
//! - `note`, when present, is a string.
//! - `date` is a real calendar date written `YYYY-MM-DD`.
//! - `link` is an absolute URL with an allowed scheme and a host, written
//!   the way it parses (no padding, no raw spaces).
//!
//! Across records:
//! - No two records share the configured duplicate key
//!   ([`DuplicateKey`]): `(title, link)` by default, links compared in
//!   parsed form.
//!
//! Keys outside the schema are not errors. They are reported as warnings
//! and dropped.

use crate::config::{DuplicateKey, ValidationConfig};
use crate::entry::{self, Entry, LinkProblem, FIELDS};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// The specific rule a record (or the document) broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The document is not valid YAML.
    Unparseable(String),
    /// The top-level value is not a list.
    NotAList,
    NotAMapping,
    MissingField(&'static str),
    EmptyField(&'static str),
    NotAString(&'static str),
    /// Not `YYYY-MM-DD`, or not a real date.
    InvalidDate(String),
    InvalidLink { link: String, problem: LinkProblem },
    /// Shares its duplicate key with the record at position `first`.
    Duplicate { first: usize, key: DuplicateKey },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Unparseable(msg) => write!(f, "failed to parse YAML: {msg}"),
            Rule::NotAList => write!(f, "top-level YAML must be a list"),
            Rule::NotAMapping => write!(f, "must be a mapping"),
            Rule::MissingField(field) => write!(f, "missing required field '{field}'"),
            Rule::EmptyField(field) => write!(f, "'{field}' must not be empty"),
            Rule::NotAString(field) => write!(f, "'{field}' must be a string"),
            Rule::InvalidDate(date) => {
                write!(f, "'date' must be a real date in YYYY-MM-DD form, got {date:?}")
            }
            Rule::InvalidLink { link, problem } => match problem {
                LinkProblem::Unparseable => {
                    write!(f, "'link' must be an absolute URL, got {link:?}")
                }
                LinkProblem::Scheme(scheme) => {
                    write!(f, "'link' scheme '{scheme}' is not allowed ({link})")
                }
                LinkProblem::NoHost => write!(f, "'link' has no host ({link})"),
                LinkProblem::NotCanonical(canonical) => {
                    write!(f, "'link' must be written as {canonical:?}, got {link:?}")
                }
            },
            Rule::Duplicate { first, key } => {
                let fields = match key {
                    DuplicateKey::TitleLink => "title and link",
                    DuplicateKey::TitleDate => "title and date",
                };
                write!(f, "duplicate of item #{first} (same {fields})")
            }
        }
    }
}

/// One broken rule, located well enough for a human to find the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based record position; `None` for document-level problems.
    pub position: Option<usize>,
    /// The record's title, when it has a usable one.
    pub title: Option<String>,
    pub rule: Rule,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.position, &self.title) {
            (Some(pos), Some(title)) => write!(f, "item #{pos} ({title:?}): {}", self.rule),
            (Some(pos), None) => write!(f, "item #{pos}: {}", self.rule),
            (None, _) => write!(f, "{}", self.rule),
        }
    }
}

/// A non-fatal observation, reported alongside a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub position: usize,
    pub key: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "item #{}: unknown key '{}' (will be ignored)",
            self.position, self.key
        )
    }
}

/// Every violation found in the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed with {} error(s)", .violations.len())]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl SchemaError {
    fn document(rule: Rule) -> Self {
        Self {
            violations: vec![Violation {
                position: None,
                title: None,
                rule,
            }],
        }
    }
}

/// A log that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// Entries in storage order.
    pub entries: Vec<Entry>,
    pub warnings: Vec<Warning>,
}

/// Parse the backing store into raw records.
///
/// An empty (or `null`) document is an empty list.
pub fn parse_document(text: &str) -> Result<Vec<Value>, SchemaError> {
    let doc: Value = serde_yaml::from_str(text)
        .map_err(|e| SchemaError::document(Rule::Unparseable(e.to_string())))?;
    match doc {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => Ok(items),
        _ => Err(SchemaError::document(Rule::NotAList)),
    }
}

/// Parse and validate a whole document.
pub fn validate_str(text: &str, policy: &ValidationConfig) -> Result<Validated, SchemaError> {
    let records = parse_document(text)?;
    validate(&records, policy)
}

/// Check every record, then the collection as a whole.
///
/// Returns the entries only if there are no violations at all.
pub fn validate(records: &[Value], policy: &ValidationConfig) -> Result<Validated, SchemaError> {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    let mut entries = Vec::with_capacity(records.len());
    let mut seen: HashMap<(String, String), usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let position = idx + 1;
        let Value::Mapping(map) = record else {
            violations.push(Violation {
                position: Some(position),
                title: None,
                rule: Rule::NotAMapping,
            });
            continue;
        };

        warnings.extend(unknown_keys(map).map(|key| Warning { position, key }));

        let checked = check_record(map, policy);
        let title = checked.title.map(str::to_string);

        if let Some(key) = checked.duplicate_key(policy.duplicate_key) {
            if let Some(&first) = seen.get(&key) {
                violations.push(Violation {
                    position: Some(position),
                    title: title.clone(),
                    rule: Rule::Duplicate {
                        first,
                        key: policy.duplicate_key,
                    },
                });
            } else {
                seen.insert(key, position);
            }
        }

        if checked.problems.is_empty() {
            if let Some(entry) = checked.into_entry() {
                entries.push(entry);
            }
        } else {
            violations.extend(checked.problems.into_iter().map(|rule| Violation {
                position: Some(position),
                title: title.clone(),
                rule,
            }));
        }
    }

    if violations.is_empty() {
        Ok(Validated { entries, warnings })
    } else {
        violations.sort_by_key(|v| v.position);
        Err(SchemaError { violations })
    }
}

/// Keys outside the schema, rendered for display.
fn unknown_keys(map: &Mapping) -> impl Iterator<Item = String> + '_ {
    map.keys().filter_map(|key| match key {
        Value::String(s) if FIELDS.contains(&s.as_str()) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(
            serde_yaml::to_string(other)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| format!("{other:?}")),
        ),
    })
}

/// Field values pulled from one record, plus whatever was wrong with them.
struct CheckedRecord<'a> {
    title: Option<&'a str>,
    category: Option<&'a str>,
    date: Option<chrono::NaiveDate>,
    /// The link as written, and its parsed form.
    link: Option<(&'a str, Url)>,
    note: Option<&'a str>,
    problems: Vec<Rule>,
}

impl CheckedRecord<'_> {
    fn duplicate_key(&self, key: DuplicateKey) -> Option<(String, String)> {
        let title = self.title?.to_string();
        match key {
            DuplicateKey::TitleLink => {
                let (_, url) = self.link.as_ref()?;
                Some((title, url.as_str().to_string()))
            }
            DuplicateKey::TitleDate => Some((title, self.date?.to_string())),
        }
    }

    fn into_entry(self) -> Option<Entry> {
        Some(Entry {
            title: self.title?.to_string(),
            category: self.category?.to_string(),
            date: self.date?,
            link: self.link?.0.to_string(),
            note: self.note.map(str::to_string),
        })
    }
}

fn check_record<'a>(map: &'a Mapping, policy: &ValidationConfig) -> CheckedRecord<'a> {
    let mut problems = Vec::new();

    let title = required_string(map, "title", &mut problems);
    let category = required_string(map, "category", &mut problems);

    let date = required_string(map, "date", &mut problems).and_then(|text| {
        let parsed = entry::parse_date(text);
        if parsed.is_none() {
            problems.push(Rule::InvalidDate(text.to_string()));
        }
        parsed
    });

    let link = required_string(map, "link", &mut problems).and_then(|text| {
        match entry::check_link(text, &policy.allowed_schemes) {
            Ok(url) => Some((text, url)),
            Err(problem) => {
                problems.push(Rule::InvalidLink {
                    link: text.to_string(),
                    problem,
                });
                None
            }
        }
    });

    let note = match map.get("note") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            problems.push(Rule::NotAString("note"));
            None
        }
    };

    CheckedRecord {
        title,
        category,
        date,
        link,
        note,
        problems,
    }
}

/// Fetch a required string field, recording why it is unusable if it is.
fn required_string<'a>(
    map: &'a Mapping,
    field: &'static str,
    problems: &mut Vec<Rule>,
) -> Option<&'a str> {
    match map.get(field) {
        None | Some(Value::Null) => {
            problems.push(Rule::MissingField(field));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            problems.push(Rule::EmptyField(field));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            problems.push(Rule::NotAString(field));
            None
        }
    }
}
