// --------------------------------------------------
// Read-only view of what the parser understood from the
// schedule files, and what it had to skip.
// --------------------------------------------------

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::models::{ParseDiagnostic, ParsedSchedules, PracticeItem, RevisionItem};
use crate::routes_plan::{load_parsed, SharedState};

#[derive(Debug, Serialize)]
pub struct SchedulesResponse {
    pub revisions: Vec<RevisionItem>,
    pub maths: Vec<PracticeItem>,
    pub reasoning: Vec<PracticeItem>,
    pub exam_date: Option<NaiveDate>,
    pub skipped: usize,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub messages: Vec<String>,
}

impl From<ParsedSchedules> for SchedulesResponse {
    fn from(p: ParsedSchedules) -> Self {
        let skipped = p.diagnostics.iter().filter(|d| d.issue.is_skip()).count();
        let messages = p.diagnostics.iter().map(ToString::to_string).collect();
        Self {
            revisions: p.revisions,
            maths: p.maths,
            reasoning: p.reasoning,
            exam_date: p.exam_date,
            skipped,
            diagnostics: p.diagnostics,
            messages,
        }
    }
}

// -----------------------------
// GET /api/schedules
// -----------------------------
pub async fn get_schedules(State(state): State<SharedState>) -> Result<Json<SchedulesResponse>> {
    let parsed = load_parsed(&state)?;
    let resp = SchedulesResponse::from(parsed);
    tracing::info!(
        revisions = resp.revisions.len(),
        maths = resp.maths.len(),
        reasoning = resp.reasoning.len(),
        skipped = resp.skipped,
        "schedules inspected"
    );
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schedules;
    use serde_json::json;

    #[test]
    fn test_response_counts_skips_only() {
        let gk = json!({
            "revisions": {"Polity": [{"due_date": "bad"}, {"due_date": "2024-01-01"}]}
        });
        let maths = json!({"chapters": "oops"});
        let resp = SchedulesResponse::from(parse_schedules(&gk, &maths));

        assert_eq!(resp.revisions.len(), 1);
        // bad date + malformed section; the defaulted rate is not a skip
        assert_eq!(resp.skipped, 2);
        assert_eq!(resp.diagnostics.len(), 3);
        assert!(resp.messages.iter().any(|m| m.starts_with("chapters: section is a string")));
    }
}
