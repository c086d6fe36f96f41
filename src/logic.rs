/*
Priority classification and daily load balancing.
Module is independent from HTTP / Axum for testing.
Every function is a pure transform of (schedule data, reference date).
*/

use chrono::NaiveDate;

use crate::models::{
    Classification, DailyPlan, DailyTask, Load, ParsedSchedules, PracticeItem, PriorityBuckets,
    Recommendation, RevisionItem, TaskKind,
};

// Per-day caps of the plan builder
pub const MAX_HEAVY_TASKS: usize = 1;
pub const MAX_MEDIUM_TASKS: usize = 2;

pub const EXAM_WINDOW_DAYS: i64 = 60;

pub const GK_AGGREGATE_LABEL: &str = "GK Revisions";

// Bucket GK revisions for `today`.
//
// First matching rule wins:
// - due_date < today        -> overdue
// - due_date == today       -> due_today
// - success_rate < 0.70     -> weak_areas
// - otherwise               -> upcoming
pub fn classify_revisions(items: &[RevisionItem], today: NaiveDate) -> PriorityBuckets {
    let mut buckets = PriorityBuckets::default();

    for item in items {
        let bucket = if item.due_date < today {
            &mut buckets.overdue
        } else if item.due_date == today {
            &mut buckets.due_today
        } else if item.is_weak() {
            &mut buckets.weak_areas
        } else {
            &mut buckets.upcoming
        };
        bucket.push(item.clone());
    }

    buckets
}

// Select practice items due on or before `today`.
// Items not yet due are dropped entirely.
pub fn due_practice(items: &[PracticeItem], today: NaiveDate) -> Vec<PracticeItem> {
    items
        .iter()
        .filter(|p| p.next_practice_date <= today)
        .cloned()
        .collect()
}

/// Run every classification rule against `today`.
pub fn classify(schedules: &ParsedSchedules, today: NaiveDate) -> Classification {
    Classification {
        gk: classify_revisions(&schedules.revisions, today),
        maths: due_practice(&schedules.maths, today),
        reasoning: due_practice(&schedules.reasoning, today),
    }
}

pub fn high_priority(items: &[PracticeItem]) -> impl Iterator<Item = &PracticeItem> {
    items.iter().filter(|p| p.is_weak())
}

/// Build a single day's plan with load control.
///
/// Process:
/// - Admit HIGH maths items in order while a heavy slot is free
/// - Admit HIGH reasoning items in order while a medium slot is free
/// - Fold all overdue + due-today GK into one light line with a count
///
/// HIGH items beyond the caps are left out of the plan but stay in `classified`.
pub fn build_daily_plan(classified: &Classification) -> DailyPlan {
    let mut plan = DailyPlan::default();

    for item in high_priority(&classified.maths) {
        if plan.heavy_count >= MAX_HEAVY_TASKS {
            break;
        }
        plan.tasks.push(DailyTask {
            kind: TaskKind::Math,
            label: item.subject_name.clone(),
            load: Load::Heavy,
            count: None,
        });
        plan.heavy_count += 1;
    }

    for item in high_priority(&classified.reasoning) {
        if plan.medium_count >= MAX_MEDIUM_TASKS {
            break;
        }
        plan.tasks.push(DailyTask {
            kind: TaskKind::Reasoning,
            label: item.subject_name.clone(),
            load: Load::Medium,
            count: None,
        });
        plan.medium_count += 1;
    }

    let gk_due = classified.gk.due_count();
    if gk_due > 0 {
        plan.tasks.push(DailyTask {
            kind: TaskKind::Gk,
            label: GK_AGGREGATE_LABEL.to_string(),
            load: Load::Light,
            count: Some(gk_due),
        });
        plan.light_count += 1;
    }

    plan
}

// Weakest maths chapter across the whole pool (due or not).
// Ties go to the first in input order.
pub fn weakest_practice(items: &[PracticeItem]) -> Option<&PracticeItem> {
    high_priority(items).min_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Never a zero day: when nothing is actionable on the classified day,
/// suggest the weakest maths chapter, or a mixed review when none is weak.
///
/// `maths_pool` is every parsed maths chapter, not only the due ones.
pub fn zero_day_recommendation(
    classified: &Classification,
    maths_pool: &[PracticeItem],
) -> Option<Recommendation> {
    if classified.actionable_count() > 0 {
        return None;
    }

    let rec = match weakest_practice(maths_pool) {
        Some(item) => Recommendation::PracticeWeakArea {
            subject: item.subject_name.clone(),
            accuracy: item.accuracy,
        },
        None => Recommendation::MixedReview,
    };
    tracing::debug!(recommendation = %rec, "zero day fallback");
    Some(rec)
}

// Exam is within the next 60 days (inclusive); past or absent -> false
pub fn is_exam_near(exam_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match exam_date {
        Some(exam) => (0..=EXAM_WINDOW_DAYS).contains(&(exam - today).num_days()),
        None => false,
    }
}
