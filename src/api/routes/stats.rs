use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{CommanderColorIdentityStat, CommanderStat, ComputedStats};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<ComputedStats>, ApiError> {
    let stats = state.current_stats().await?;
    Ok(Json(stats.as_ref().clone()))
}

// ── Commanders ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommanderParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CommandersResponse {
    pub total: usize,
    pub commanders: Vec<CommanderStat>,
}

pub async fn list_commanders(
    State(state): State<AppState>,
    Query(params): Query<CommanderParams>,
) -> Result<Json<CommandersResponse>, ApiError> {
    if params.limit == Some(0) {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }

    let stats = state.current_stats().await?;
    let total = stats.by_commander.len();
    let commanders = stats
        .by_commander
        .iter()
        .take(params.limit.unwrap_or(total))
        .cloned()
        .collect();

    Ok(Json(CommandersResponse { total, commanders }))
}

pub async fn get_commander(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CommanderStat>, ApiError> {
    let stats = state.current_stats().await?;
    stats
        .get_commander(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Commander '{}'", name)))
}

// ── Color identities ────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorIdentitiesResponse {
    pub color_identities: Vec<CommanderColorIdentityStat>,
    pub most_played: Option<CommanderColorIdentityStat>,
    pub most_successful: Option<CommanderColorIdentityStat>,
    pub archnemesis: Option<CommanderColorIdentityStat>,
}

pub async fn list_color_identities(
    State(state): State<AppState>,
) -> Result<Json<ColorIdentitiesResponse>, ApiError> {
    let stats = state.current_stats().await?;
    Ok(Json(ColorIdentitiesResponse {
        color_identities: stats.by_commander_color_identity.clone(),
        most_played: stats.most_played_commander_color_identity.clone(),
        most_successful: stats.most_successful_commander_color_identity.clone(),
        archnemesis: stats.archnemesis_commander_color_identity.clone(),
    }))
}

pub async fn get_color_identity(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CommanderColorIdentityStat>, ApiError> {
    let stats = state.current_stats().await?;
    stats
        .get_color_identity(&key.to_ascii_uppercase())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Color identity '{}'", key)))
}
