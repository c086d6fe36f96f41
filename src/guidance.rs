use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::logic::{classify_revisions, is_exam_near, weakest_practice};
use crate::models::ParsedSchedules;

// Due GK revisions above this count warrant splitting the day
pub const HEAVY_GK_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guidance {
    MathsFocus { subject: String, accuracy: f64 },
    GkFocus { topic: String },
    ExamMode,
    LightLoadDay,
    HeavyGkLoad { count: usize },
    OnTrack,
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guidance::MathsFocus { subject, accuracy } => write!(
                f,
                "Maths focus: {subject} accuracy is {:.0}% - prioritize practice",
                accuracy * 100.0
            ),
            Guidance::GkFocus { topic } => write!(f, "GK focus: {topic} needs improvement"),
            Guidance::ExamMode => {
                f.write_str("Exam mode: prioritize weak areas and mixed practice sets")
            }
            Guidance::LightLoadDay => {
                f.write_str("Light load day: great time to clear backlog or take a mock test")
            }
            Guidance::HeavyGkLoad { count } => write!(
                f,
                "Heavy GK load ({count} due): break into 2-3 sessions to avoid burnout"
            ),
            Guidance::OnTrack => f.write_str("You're on track! Keep up the consistent practice."),
        }
    }
}

/// Study guidance for `today`, most specific first.
///
/// Weak-area hints look at the whole schedule, not only what is due.
pub fn build_guidance(schedules: &ParsedSchedules, today: NaiveDate) -> Vec<Guidance> {
    let mut out = Vec::new();

    if let Some(item) = weakest_practice(&schedules.maths) {
        out.push(Guidance::MathsFocus {
            subject: item.subject_name.clone(),
            accuracy: item.accuracy,
        });
    }

    if let Some(rev) = schedules.revisions.iter().find(|r| r.is_weak()) {
        out.push(Guidance::GkFocus {
            topic: rev.topic.clone(),
        });
    }

    if is_exam_near(schedules.exam_date, today) {
        out.push(Guidance::ExamMode);
    }

    let gk_due = classify_revisions(&schedules.revisions, today).due_count();
    if gk_due == 0 {
        out.push(Guidance::LightLoadDay);
    } else if gk_due > HEAVY_GK_THRESHOLD {
        out.push(Guidance::HeavyGkLoad { count: gk_due });
    }

    if out.is_empty() {
        out.push(Guidance::OnTrack);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PracticeItem, RevisionItem};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rev(topic: &str, due: &str, rate: f64) -> RevisionItem {
        RevisionItem {
            topic: topic.to_string(),
            due_date: d(due),
            success_rate: rate,
        }
    }

    #[test]
    fn test_on_track_when_nothing_to_say() {
        let today = d("2024-05-10");
        let schedules = ParsedSchedules {
            revisions: vec![rev("Polity", "2024-05-10", 0.9)],
            ..Default::default()
        };
        assert_eq!(build_guidance(&schedules, today), vec![Guidance::OnTrack]);
    }

    #[test]
    fn test_full_guidance_order() {
        let today = d("2024-05-10");
        let schedules = ParsedSchedules {
            revisions: vec![rev("Art", "2024-06-01", 0.9), rev("Science", "2024-06-01", 0.4)],
            maths: vec![
                PracticeItem::new("Algebra", d("2024-06-01"), 0.6),
                PracticeItem::new("Trigonometry", d("2024-06-01"), 0.42),
            ],
            exam_date: Some(d("2024-06-15")),
            ..Default::default()
        };
        let guidance = build_guidance(&schedules, today);
        assert_eq!(
            guidance,
            vec![
                Guidance::MathsFocus {
                    subject: "Trigonometry".to_string(),
                    accuracy: 0.42
                },
                Guidance::GkFocus { topic: "Science".to_string() },
                Guidance::ExamMode,
                Guidance::LightLoadDay,
            ]
        );
        assert_eq!(
            guidance[0].to_string(),
            "Maths focus: Trigonometry accuracy is 42% - prioritize practice"
        );
    }

    #[test]
    fn test_heavy_gk_load() {
        let today = d("2024-05-10");
        let revisions = (0..11).map(|i| rev(&format!("t{i}"), "2024-05-01", 1.0)).collect();
        let schedules = ParsedSchedules {
            revisions,
            ..Default::default()
        };
        assert_eq!(
            build_guidance(&schedules, today),
            vec![Guidance::HeavyGkLoad { count: 11 }]
        );
    }
}
