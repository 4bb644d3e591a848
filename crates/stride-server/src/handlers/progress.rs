//! Progress analysis handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{json_body, AppError, AppState};
use stride_core::{Goal, ProgressUpdate};

const MISSING_FIELDS: &str = "Goal and journal entry are required";
pub(crate) const NOT_IN_PROGRESS: &str = "Goal is not in progress";

/// Request body for progress analysis
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub goal: Option<Goal>,
    pub journal_entry: Option<String>,
    #[serde(default)]
    pub previous_updates: Vec<ProgressUpdate>,
}

/// POST /api/progress - Analyze a journal entry against its goal
///
/// Only in-progress goals are analyzed. Financial goals are computed
/// without the model. When no estimate is
/// possible the response is a 500 carrying a fallback analysis the client
/// can still record.
pub async fn analyze_progress(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload, MISSING_FIELDS)?;

    let goal = body
        .goal
        .ok_or_else(|| AppError::bad_request(MISSING_FIELDS))?;
    let journal_entry = body
        .journal_entry
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::bad_request(MISSING_FIELDS))?;
    if goal.ensure_in_progress().is_err() {
        return Err(AppError::bad_request(NOT_IN_PROGRESS));
    }

    let outcome = state
        .analyzer
        .analyze(&goal, &journal_entry, &body.previous_updates)
        .await;

    if outcome.is_available() {
        Ok(Json(json!({
            "success": true,
            "data": outcome.analysis,
            "source": outcome.source,
        }))
        .into_response())
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "Failed to analyze progress",
                "fallback": outcome.analysis,
                "details": outcome.error.unwrap_or_else(|| "Unknown error".to_string()),
            })),
        )
            .into_response())
    }
}
