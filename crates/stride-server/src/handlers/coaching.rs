//! Coaching handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::progress::NOT_IN_PROGRESS;
use crate::{json_body, AppError, AppState};
use stride_core::{coach, Goal, ProgressUpdate};

/// Request body for coaching advice
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingRequest {
    pub goal: Option<Goal>,
    #[serde(default)]
    pub previous_updates: Vec<ProgressUpdate>,
    /// Optional question from the user
    pub user_input: Option<String>,
}

/// POST /api/coaching - Milestones, habits and advice for a goal
pub async fn get_coaching(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoachingRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload, "Goal is required")?;
    let goal = body
        .goal
        .ok_or_else(|| AppError::bad_request("Goal is required"))?;
    if goal.ensure_in_progress().is_err() {
        return Err(AppError::bad_request(NOT_IN_PROGRESS));
    }

    match coach(
        state.ai(),
        &goal,
        &body.previous_updates,
        body.user_input.as_deref(),
    )
    .await
    {
        Ok(advice) => Ok(Json(json!({ "success": true, "data": advice })).into_response()),
        Err(e) => {
            tracing::warn!(goal = %goal.id, error = %e, "Coaching request failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to get coaching advice",
                    "details": e.to_string(),
                })),
            )
                .into_response())
        }
    }
}
