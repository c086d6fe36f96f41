// 7-day load forecast.
// Each day is classified from scratch; nothing carries over between days.

use chrono::{Days, NaiveDate};

use crate::logic::{classify, high_priority};
use crate::models::{DayForecast, Load, ParsedSchedules};

pub const FORECAST_DAYS: u64 = 7;

// More due GK revisions than this makes a day at least Medium
pub const GK_MEDIUM_THRESHOLD: usize = 3;

// Load label decision table, first match wins:
// - any HIGH maths, or a reasoning-only day (no GK due, HIGH reasoning):
//     Medium if any HIGH reasoning, else Heavy
// - more than 3 GK due -> Medium
// - otherwise          -> Light
//
// HIGH reasoning downgrades a HIGH-maths day to Medium. Kept as observed.
pub fn day_load(gk_count: usize, maths_high: usize, reasoning_high: usize) -> Load {
    if maths_high > 0 || (gk_count == 0 && reasoning_high > 0) {
        if reasoning_high > 0 {
            Load::Medium
        } else {
            Load::Heavy
        }
    } else if gk_count > GK_MEDIUM_THRESHOLD {
        Load::Medium
    } else {
        Load::Light
    }
}

pub fn forecast_day(schedules: &ParsedSchedules, date: NaiveDate) -> DayForecast {
    let classified = classify(schedules, date);
    let gk_count = classified.gk.due_count();
    let maths_count = high_priority(&classified.maths).count();
    let reasoning_count = high_priority(&classified.reasoning).count();

    DayForecast {
        date,
        gk_count,
        maths_count,
        reasoning_count,
        load: day_load(gk_count, maths_count, reasoning_count),
    }
}

/// Forecast `today` and the six following days, in date order.
pub fn forecast_week(schedules: &ParsedSchedules, today: NaiveDate) -> Vec<DayForecast> {
    (0..FORECAST_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| forecast_day(schedules, date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PracticeItem, RevisionItem};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_day_load_table() {
        assert_eq!(day_load(0, 0, 0), Load::Light);
        assert_eq!(day_load(3, 0, 0), Load::Light);
        assert_eq!(day_load(4, 0, 0), Load::Medium);
        assert_eq!(day_load(0, 1, 0), Load::Heavy);
        assert_eq!(day_load(9, 2, 0), Load::Heavy);
        // reasoning downgrades heavy
        assert_eq!(day_load(0, 1, 1), Load::Medium);
        // reasoning-only day escalates
        assert_eq!(day_load(0, 0, 2), Load::Medium);
        // GK present: reasoning alone doesn't reach the first rule
        assert_eq!(day_load(1, 0, 2), Load::Light);
        assert_eq!(day_load(5, 0, 2), Load::Medium);
    }

    #[test]
    fn test_forecast_week_rolls_forward() {
        let today = d("2024-05-10");
        let schedules = ParsedSchedules {
            revisions: vec![RevisionItem {
                topic: "Polity".to_string(),
                due_date: d("2024-05-12"),
                success_rate: 1.0,
            }],
            maths: vec![PracticeItem::new("Algebra", d("2024-05-14"), 0.5)],
            ..Default::default()
        };
        let week = forecast_week(&schedules, today);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, today);
        assert_eq!(week[6].date, d("2024-05-16"));

        let gk: Vec<usize> = week.iter().map(|f| f.gk_count).collect();
        assert_eq!(gk, vec![0, 0, 1, 1, 1, 1, 1]);

        let loads: Vec<Load> = week.iter().map(|f| f.load).collect();
        assert_eq!(
            loads,
            vec![
                Load::Light,
                Load::Light,
                Load::Light,
                Load::Light,
                Load::Heavy,
                Load::Heavy,
                Load::Heavy
            ]
        );
    }
}
