use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

// Accuracy / success-rate below this is a weak area
pub const WEAK_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    // HIGH iff accuracy < 0.70 (strict)
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy < WEAK_THRESHOLD {
            Priority::High
        } else {
            Priority::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Load {
    Light,
    Medium,
    Heavy,
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Load::Light => "Light",
            Load::Medium => "Medium",
            Load::Heavy => "Heavy",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Math,
    Reasoning,
    Gk,
}

// One scheduled revision of a GK topic
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevisionItem {
    pub topic: String,
    pub due_date: NaiveDate,
    pub success_rate: f64, // 0..=1, 1.0 when absent
}

impl RevisionItem {
    pub fn is_weak(&self) -> bool {
        Priority::from_accuracy(self.success_rate) == Priority::High
    }
}

// One math chapter or reasoning topic's next practice
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PracticeItem {
    pub subject_name: String,
    pub next_practice_date: NaiveDate,
    pub accuracy: f64, // 0..=1, 1.0 when absent
    pub priority: Priority,
}

impl PracticeItem {
    /// Builds an item with its priority derived from `accuracy`.
    pub fn new(
        subject_name: impl Into<String>,
        next_practice_date: NaiveDate,
        accuracy: f64,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            next_practice_date,
            accuracy,
            priority: Priority::from_accuracy(accuracy),
        }
    }

    pub fn is_weak(&self) -> bool {
        self.priority == Priority::High
    }
}

// Each revision lands in exactly one bucket; input order kept per bucket
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PriorityBuckets {
    pub overdue: Vec<RevisionItem>,
    pub due_today: Vec<RevisionItem>,
    pub weak_areas: Vec<RevisionItem>,
    pub upcoming: Vec<RevisionItem>,
}

impl PriorityBuckets {
    /// Overdue plus due-today: the GK revisions actionable on the reference day.
    pub fn due_count(&self) -> usize {
        self.overdue.len() + self.due_today.len()
    }

    // Every revision classified, whatever the bucket
    pub fn total(&self) -> usize {
        self.due_count() + self.weak_areas.len() + self.upcoming.len()
    }
}

// Everything the classifier derives for one reference date
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Classification {
    pub gk: PriorityBuckets,
    pub maths: Vec<PracticeItem>,     // due only
    pub reasoning: Vec<PracticeItem>, // due only
}

impl Classification {
    pub fn actionable_count(&self) -> usize {
        self.gk.due_count() + self.maths.len() + self.reasoning.len()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyTask {
    pub kind: TaskKind,
    pub label: String,
    pub load: Load,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DailyPlan {
    pub tasks: Vec<DailyTask>,
    pub heavy_count: usize,
    pub medium_count: usize,
    pub light_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub gk_count: usize,
    pub maths_count: usize,     // HIGH only
    pub reasoning_count: usize, // HIGH only
    pub load: Load,
}

// Fallback shown when a day has nothing actionable
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    PracticeWeakArea { subject: String, accuracy: f64 },
    MixedReview,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::PracticeWeakArea { subject, .. } => {
                write!(f, "Practice weak area: {subject}")
            }
            Recommendation::MixedReview => f.write_str("Take a mixed GK quiz to maintain momentum"),
        }
    }
}

/// Which part of the input documents a diagnostic refers to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Revisions,
    Chapters,
    Reasoning,
    ExamDate,
}

impl Section {
    pub fn key(self) -> &'static str {
        match self {
            Section::Revisions => "revisions",
            Section::Chapters => "chapters",
            Section::Reasoning => "reasoning",
            Section::ExamDate => "exam_date",
        }
    }
}

/// Problems found while normalizing user-maintained schedule data.
///
/// None of these abort parsing. `MissingField` means a default was applied
/// and the entry was kept; every other variant means something was skipped.
#[derive(Debug, Clone, Error, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    #[error("section is a {found}, expected a list or a map")]
    MalformedSource { found: &'static str },

    #[error("malformed entry: {reason}")]
    MalformedEntry { reason: String },

    #[error("`{field}` absent, defaulted to {default}")]
    MissingField { field: &'static str, default: f64 },

    #[error("`{field}` has unparseable date {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

impl ParseIssue {
    pub fn is_skip(&self) -> bool {
        !matches!(self, ParseIssue::MissingField { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseDiagnostic {
    pub section: Section,
    pub entry: Option<String>, // name or index of the entry, None for whole section
    pub issue: ParseIssue,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(f, "{}[{}]: {}", self.section.key(), entry, self.issue),
            None => write!(f, "{}: {}", self.section.key(), self.issue),
        }
    }
}

// Normalized view of both schedule documents
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ParsedSchedules {
    pub revisions: Vec<RevisionItem>,
    pub maths: Vec<PracticeItem>,
    pub reasoning: Vec<PracticeItem>,
    pub exam_date: Option<NaiveDate>,
    pub diagnostics: Vec<ParseDiagnostic>,
}
