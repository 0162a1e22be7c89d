use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, JsonBody};
use super::ApiState;
use crate::economy::{profile_multipliers, skills_snapshot, SkillsSnapshot};
use crate::player::SkillLevels;
use crate::profile::{LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default, rename = "telegramId")]
    pub telegram_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub name: String,
    pub points: i64,
    pub energy: i64,
    pub multiplier_x10: f64,
    pub multiplier_x100: f64,
    pub multiplier_x1000: f64,
}

// Absent body fields decode as 0 and are written like any other value.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEnergyRequest {
    pub energy: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePointsRequest {
    pub points: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSkillsRequest {
    pub level_energy: i32,
    pub level_x10: i32,
    pub level_x100: i32,
    pub level_x1000: i32,
}

impl From<UpdateSkillsRequest> for SkillLevels {
    fn from(req: UpdateSkillsRequest) -> Self {
        SkillLevels::new(
            req.level_energy,
            req.level_x10,
            req.level_x100,
            req.level_x1000,
        )
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Not Found")
}

pub async fn get_player(
    State(state): State<ApiState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<PlayerResponse>, ApiError> {
    debug!("fetching player data for telegramId {}", query.telegram_id);
    let player = state.profiles.get_profile(&query.telegram_id).await?;
    let multipliers = profile_multipliers(&player.skills);
    Ok(Json(PlayerResponse {
        name: player.name,
        points: player.points,
        energy: player.energy,
        multiplier_x10: multipliers.x10,
        multiplier_x100: multipliers.x100,
        multiplier_x1000: multipliers.x1000,
    }))
}

pub async fn update_energy(
    State(state): State<ApiState>,
    Path(telegram_id): Path<String>,
    JsonBody(req): JsonBody<UpdateEnergyRequest>,
) -> Result<StatusCode, ApiError> {
    state.profiles.set_energy(&telegram_id, req.energy).await?;
    Ok(StatusCode::OK)
}

pub async fn update_points(
    State(state): State<ApiState>,
    Path(telegram_id): Path<String>,
    JsonBody(req): JsonBody<UpdatePointsRequest>,
) -> Result<StatusCode, ApiError> {
    state.profiles.set_points(&telegram_id, req.points).await?;
    Ok(StatusCode::OK)
}

pub async fn get_skills(
    State(state): State<ApiState>,
    Path(telegram_id): Path<String>,
) -> Result<Json<SkillsSnapshot>, ApiError> {
    let player = state.profiles.get_profile(&telegram_id).await?;
    Ok(Json(skills_snapshot(&player)))
}

pub async fn update_skills(
    State(state): State<ApiState>,
    Path(telegram_id): Path<String>,
    JsonBody(req): JsonBody<UpdateSkillsRequest>,
) -> Result<Json<SkillsSnapshot>, ApiError> {
    let player = state
        .profiles
        .set_skills(&telegram_id, req.into())
        .await?;
    Ok(Json(skills_snapshot(&player)))
}

pub async fn get_leaderboard(
    State(state): State<ApiState>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = state
        .profiles
        .top_players(DEFAULT_LEADERBOARD_LIMIT)
        .await?;
    Ok(Json(entries))
}
