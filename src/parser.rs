/*
Schedule normalization.
Turns the two loosely-typed JSON documents into uniform items.
Bad data is skipped per entry (or per section) and reported as diagnostics,
never as an error.
*/

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::models::{
    ParseDiagnostic, ParseIssue, ParsedSchedules, PracticeItem, RevisionItem, Section,
};

// Accepted display-name keys, highest precedence first
pub const NAME_KEYS: [&str; 3] = ["name", "chapter", "topic"];
pub const UNKNOWN_NAME: &str = "Unknown";

// Value used when an accuracy-like field is absent
pub const DEFAULT_FRACTION: f64 = 1.0;

const GK_DATE_KEYS: [&str; 2] = ["due_date", "revision_date"];
const GK_FRACTION_KEYS: [&str; 2] = ["success_rate", "accuracy"];
const PRACTICE_DATE_KEYS: [&str; 1] = ["next_practice_date"];
const PRACTICE_FRACTION_KEYS: [&str; 1] = ["accuracy"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The shapes a schedule section has been seen in.
///
/// `Keyed` maps a display name to its data; `Records` is a list of objects
/// that carry their own name under one of [`NAME_KEYS`].
#[derive(Debug)]
pub enum SourceShape<'a> {
    Absent,
    Keyed(&'a Map<String, Value>),
    Records(&'a [Value]),
    Malformed(&'static str),
}

impl<'a> SourceShape<'a> {
    pub fn of(root: &'a Value, key: &str) -> Self {
        match root.get(key) {
            None | Some(Value::Null) => SourceShape::Absent,
            Some(Value::Object(map)) => SourceShape::Keyed(map),
            Some(Value::Array(list)) => SourceShape::Records(list),
            Some(other) => SourceShape::Malformed(json_type(other)),
        }
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Parse a calendar date, keeping only the date part of date-time spellings.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 and ISO date-times with `T` or space.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Resolve an entry's display name via [`NAME_KEYS`], falling back to "Unknown".
pub fn resolve_name(entry: &Map<String, Value>) -> String {
    NAME_KEYS
        .iter()
        .filter_map(|k| entry.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

// Collects diagnostics for one section
struct SectionLog<'d> {
    section: Section,
    out: &'d mut Vec<ParseDiagnostic>,
}

impl SectionLog<'_> {
    fn push(&mut self, entry: Option<String>, issue: ParseIssue) {
        tracing::debug!(
            section = self.section.key(),
            entry = entry.as_deref().unwrap_or("-"),
            issue = %issue,
            "schedule entry issue"
        );
        self.out.push(ParseDiagnostic {
            section: self.section,
            entry,
            issue,
        });
    }
}

fn read_date(
    entry: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<NaiveDate, ParseIssue> {
    let Some((field, value)) = keys
        .iter()
        .find_map(|k| entry.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
    else {
        return Err(ParseIssue::MalformedEntry {
            reason: format!("missing `{}`", keys[0]),
        });
    };
    match value.as_str() {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| ParseIssue::InvalidDate {
            field,
            value: raw.to_string(),
        }),
        None => Err(ParseIssue::InvalidDate {
            field,
            value: value.to_string(),
        }),
    }
}

// Ok((value, defaulted))
fn read_fraction(
    entry: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<(f64, bool), ParseIssue> {
    let found = keys
        .iter()
        .find_map(|k| entry.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)));
    let Some((field, value)) = found else {
        return Ok((DEFAULT_FRACTION, true));
    };
    match value.as_f64() {
        Some(x) if (0.0..=1.0).contains(&x) => Ok((x, false)),
        Some(x) => Err(ParseIssue::MalformedEntry {
            reason: format!("`{field}` = {x} is outside 0..=1"),
        }),
        None => Err(ParseIssue::MalformedEntry {
            reason: format!("`{field}` is a {}, expected a number", json_type(value)),
        }),
    }
}

fn as_entry<'v>(value: &'v Value) -> Result<&'v Map<String, Value>, ParseIssue> {
    value.as_object().ok_or_else(|| ParseIssue::MalformedEntry {
        reason: format!("entry is a {}, expected a map", json_type(value)),
    })
}

fn parse_revision(
    topic: String,
    value: &Value,
    log: &mut SectionLog<'_>,
    label: String,
) -> Option<RevisionItem> {
    let parsed = as_entry(value).and_then(|entry| {
        let due_date = read_date(entry, &GK_DATE_KEYS)?;
        let (success_rate, defaulted) = read_fraction(entry, &GK_FRACTION_KEYS)?;
        Ok((due_date, success_rate, defaulted))
    });
    match parsed {
        Ok((due_date, success_rate, defaulted)) => {
            if defaulted {
                log.push(
                    Some(label),
                    ParseIssue::MissingField {
                        field: GK_FRACTION_KEYS[0],
                        default: DEFAULT_FRACTION,
                    },
                );
            }
            Some(RevisionItem {
                topic,
                due_date,
                success_rate,
            })
        }
        Err(issue) => {
            log.push(Some(label), issue);
            None
        }
    }
}

fn parse_practice(
    name: String,
    entry: &Map<String, Value>,
    log: &mut SectionLog<'_>,
    label: String,
) -> Option<PracticeItem> {
    let parsed = read_date(entry, &PRACTICE_DATE_KEYS).and_then(|date| {
        let (accuracy, defaulted) = read_fraction(entry, &PRACTICE_FRACTION_KEYS)?;
        Ok((date, accuracy, defaulted))
    });
    match parsed {
        Ok((date, accuracy, defaulted)) => {
            if defaulted {
                log.push(
                    Some(label),
                    ParseIssue::MissingField {
                        field: PRACTICE_FRACTION_KEYS[0],
                        default: DEFAULT_FRACTION,
                    },
                );
            }
            Some(PracticeItem::new(name, date, accuracy))
        }
        Err(issue) => {
            log.push(Some(label), issue);
            None
        }
    }
}

/// Parse the GK document's `revisions` section.
///
/// Keyed shape: `{"revisions": {"Topic": [{"due_date": ..}, ..]}}`.
/// Records shape: `{"revisions": [{"topic": "Topic", "due_date": ..}, ..]}`.
pub fn parse_revisions(gk: &Value, diagnostics: &mut Vec<ParseDiagnostic>) -> Vec<RevisionItem> {
    let mut log = SectionLog {
        section: Section::Revisions,
        out: diagnostics,
    };
    let mut items = Vec::new();

    match SourceShape::of(gk, Section::Revisions.key()) {
        SourceShape::Absent => {}
        SourceShape::Malformed(found) => log.push(None, ParseIssue::MalformedSource { found }),
        SourceShape::Keyed(topics) => {
            for (topic, revs) in topics {
                let Some(revs) = revs.as_array() else {
                    log.push(
                        Some(topic.clone()),
                        ParseIssue::MalformedEntry {
                            reason: format!("revisions are a {}, expected a list", json_type(revs)),
                        },
                    );
                    continue;
                };
                for (i, rev) in revs.iter().enumerate() {
                    let label = format!("{topic}#{i}");
                    if let Some(item) = parse_revision(topic.clone(), rev, &mut log, label) {
                        items.push(item);
                    }
                }
            }
        }
        SourceShape::Records(records) => {
            for (i, rec) in records.iter().enumerate() {
                let topic = rec
                    .as_object()
                    .map(resolve_name)
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string());
                if let Some(item) = parse_revision(topic, rec, &mut log, i.to_string()) {
                    items.push(item);
                }
            }
        }
    }

    items
}

/// Parse a practice section (`chapters` or `reasoning`) of the maths document.
///
/// Keyed shape: `{"chapters": {"Algebra": {"next_practice_date": .., "accuracy": ..}}}`.
/// Records shape: `{"chapters": [{"chapter": "Algebra", "next_practice_date": ..}]}`.
pub fn parse_practice_section(
    maths: &Value,
    section: Section,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Vec<PracticeItem> {
    let mut log = SectionLog {
        section,
        out: diagnostics,
    };
    let mut items = Vec::new();

    match SourceShape::of(maths, section.key()) {
        SourceShape::Absent => {}
        SourceShape::Malformed(found) => log.push(None, ParseIssue::MalformedSource { found }),
        SourceShape::Keyed(subjects) => {
            for (name, info) in subjects {
                match as_entry(info) {
                    Ok(entry) => {
                        let label = name.clone();
                        if let Some(item) = parse_practice(name.clone(), entry, &mut log, label) {
                            items.push(item);
                        }
                    }
                    Err(issue) => log.push(Some(name.clone()), issue),
                }
            }
        }
        SourceShape::Records(records) => {
            for (i, rec) in records.iter().enumerate() {
                match as_entry(rec) {
                    Ok(entry) => {
                        let name = resolve_name(entry);
                        if let Some(item) = parse_practice(name, entry, &mut log, i.to_string()) {
                            items.push(item);
                        }
                    }
                    Err(issue) => log.push(Some(i.to_string()), issue),
                }
            }
        }
    }

    items
}

/// Read the optional top-level `exam_date` of the maths document.
pub fn parse_exam_date(maths: &Value, diagnostics: &mut Vec<ParseDiagnostic>) -> Option<NaiveDate> {
    let raw = match maths.get(Section::ExamDate.key()) {
        None | Some(Value::Null) => return None,
        Some(v) => v,
    };
    let parsed = raw.as_str().and_then(parse_calendar_date);
    if parsed.is_none() {
        let value = raw.as_str().map(str::to_string).unwrap_or_else(|| raw.to_string());
        SectionLog {
            section: Section::ExamDate,
            out: diagnostics,
        }
        .push(
            None,
            ParseIssue::InvalidDate {
                field: "exam_date",
                value,
            },
        );
    }
    parsed
}

// A document root must be a map of sections; `null` counts as an empty document.
// Anything else skips the whole document, reported against its first section.
fn check_document(root: &Value, section: Section, diagnostics: &mut Vec<ParseDiagnostic>) {
    if root.is_object() || root.is_null() {
        return;
    }
    SectionLog {
        section,
        out: diagnostics,
    }
    .push(
        None,
        ParseIssue::MalformedSource {
            found: json_type(root),
        },
    );
}

/// Normalize both documents. Never fails; anything unusable shows up in
/// `diagnostics` instead.
pub fn parse_schedules(gk: &Value, maths: &Value) -> ParsedSchedules {
    let mut diagnostics = Vec::new();
    check_document(gk, Section::Revisions, &mut diagnostics);
    check_document(maths, Section::Chapters, &mut diagnostics);

    let revisions = parse_revisions(gk, &mut diagnostics);
    let maths_items = parse_practice_section(maths, Section::Chapters, &mut diagnostics);
    let reasoning = parse_practice_section(maths, Section::Reasoning, &mut diagnostics);
    let exam_date = parse_exam_date(maths, &mut diagnostics);

    let skipped = diagnostics.iter().filter(|d| d.issue.is_skip()).count();
    if skipped > 0 {
        tracing::warn!(skipped, "skipped malformed schedule data");
    }

    ParsedSchedules {
        revisions,
        maths: maths_items,
        reasoning,
        exam_date,
        diagnostics,
    }
}
