// src/web/superadmin_handlers.rs
use crate::{
    error::AppResult,
    models::settings::SettingsPatch,
    services::{cascade_service, user_service},
    state::AppState,
    web::extract::{AppJson, AppPath},
};
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// GET /api/superadmin/admins
pub async fn list_admins(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let admins = user_service::list_admins(&state.db_pool).await?;
    Ok(Json(admins))
}

// DELETE /api/superadmin/admins/{id}
pub async fn delete_admin(State(state): State<AppState>, AppPath(id): AppPath<String>) -> AppResult<impl IntoResponse> {
    let report = cascade_service::delete_admin(&state.db_pool, &id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Admin and all related data deleted",
        "report": report,
    })))
}

// GET /api/superadmin/settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(state.settings.get().await?))
}

// PUT /api/superadmin/settings
pub async fn update_settings(
    State(state): State<AppState>,
    AppJson(patch): AppJson<SettingsPatch>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.settings.update(&patch).await?))
}
