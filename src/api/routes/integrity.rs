use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::integrity::{check_games, IntegrityIssue};

#[derive(Debug, Serialize)]
pub struct IntegrityResponse {
    pub games_checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

pub async fn list_issues(
    State(state): State<AppState>,
) -> Result<Json<IntegrityResponse>, ApiError> {
    let games = state.load_games()?;
    Ok(Json(IntegrityResponse {
        games_checked: games.len(),
        issues: check_games(&games),
    }))
}
