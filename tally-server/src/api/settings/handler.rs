//! Settings API Handlers

use axum::{Json, extract::State};

use crate::api::repo_err;
use crate::core::ServerState;
use crate::db::models::{Settings, SettingsUpdate};
use crate::db::repository::SettingsRepository;
use shared::AppResult;

/// GET /api/settings - 门店设置
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.get().await.map_err(repo_err)?;
    Ok(Json(settings))
}

/// PUT /api/settings - 更新门店设置
pub async fn update(
    State(state): State<ServerState>,
    Json(data): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.update(data).await.map_err(repo_err)?;
    Ok(Json(settings))
}
