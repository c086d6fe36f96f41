// --------------------------------------------------
// Handles API endpoints for the study plan views.
//
// Responsibilities:
// - Today's buckets, plan, zero-day fallback and exam flag
// - 7-day load forecast
// - Study guidance messages
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::forecast;
use crate::guidance;
use crate::logic;
use crate::models::{
    DailyPlan, DayForecast, ParseDiagnostic, ParsedSchedules, PracticeItem, PriorityBuckets,
};
use crate::parser;
use crate::store;

pub struct AppState {
    pub config: PlannerConfig,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>, // "YYYY-MM-DD", defaults to local today
}

impl DateQuery {
    pub fn resolve(&self) -> Result<NaiveDate> {
        match &self.date {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| PlannerError::InvalidDate(raw.clone())),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

// Load both documents from disk and normalize them
pub(crate) fn load_parsed(state: &AppState) -> Result<ParsedSchedules> {
    let raw = store::load_schedules(&state.config.data)?;
    Ok(parser::parse_schedules(&raw.gk, &raw.maths))
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub gk: PriorityBuckets,
    pub maths: Vec<PracticeItem>,
    pub reasoning: Vec<PracticeItem>,
    pub plan: DailyPlan,
    pub recommendation: Option<String>,
    pub exam_near: bool,
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub start: NaiveDate,
    pub days: Vec<DayForecast>,
}

#[derive(Debug, Serialize)]
pub struct GuidanceResponse {
    pub date: NaiveDate,
    pub messages: Vec<String>,
}

/// Assemble today's view from already-parsed schedules.
pub fn today_view(schedules: ParsedSchedules, date: NaiveDate) -> TodayResponse {
    let classified = logic::classify(&schedules, date);
    let plan = logic::build_daily_plan(&classified);
    let recommendation = logic::zero_day_recommendation(&classified, &schedules.maths)
        .map(|r| r.to_string());
    let exam_near = logic::is_exam_near(schedules.exam_date, date);

    TodayResponse {
        date,
        gk: classified.gk,
        maths: classified.maths,
        reasoning: classified.reasoning,
        plan,
        recommendation,
        exam_near,
        diagnostics: schedules.diagnostics,
    }
}

// -----------------------------
// GET /api/plan/today
// -----------------------------
pub async fn get_today_plan(
    State(state): State<SharedState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<TodayResponse>> {
    let date = q.resolve()?;
    let schedules = load_parsed(&state)?;
    let view = today_view(schedules, date);
    tracing::info!(
        %date,
        tasks = view.plan.tasks.len(),
        zero_day = view.recommendation.is_some(),
        "built today plan"
    );
    Ok(Json(view))
}

// -----------------------------
// GET /api/plan/week
// -----------------------------
pub async fn get_week_plan(
    State(state): State<SharedState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<WeekResponse>> {
    let start = q.resolve()?;
    let schedules = load_parsed(&state)?;
    Ok(Json(WeekResponse {
        start,
        days: forecast::forecast_week(&schedules, start),
    }))
}

// -----------------------------
// GET /api/guidance
// -----------------------------
pub async fn get_guidance(
    State(state): State<SharedState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<GuidanceResponse>> {
    let date = q.resolve()?;
    let schedules = load_parsed(&state)?;
    let messages = guidance::build_guidance(&schedules, date)
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(Json(GuidanceResponse { date, messages }))
}
