// src/web/auth_handlers.rs
use crate::{
    config::AppConfig,
    error::AppResult,
    models::user::{ChangePasswordRequest, LoginRequest, Principal, RegisterAdminRequest},
    services::{
        auth_service::{self, TOKEN_COOKIE},
        user_service,
    },
    state::AppState,
    web::extract::AppJson,
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

/// Cookie HTTP-only com o JWT. Em produção: Secure + SameSite=None (frontend noutro domínio).
pub fn token_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(config.jwt_expiry_days));
    cookie.set_secure(config.production);
    cookie.set_same_site(if config.production { SameSite::None } else { SameSite::Strict });
    cookie
}

// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    cookies: Cookies,
    AppJson(form): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (principal, token) = auth_service::login(&state.db_pool, &state.config, &state.settings, &form).await?;
    let profile = user_service::find_profile(&state.db_pool, &principal).await?;

    cookies.add(token_cookie(&state.config, token));

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": profile,
    })))
}

// POST /api/auth/logout
pub async fn handle_logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    cookies.remove(token_cookie(&state.config, String::new()));
    tracing::info!("🚪 Sessão terminada.");
    Json(json!({ "success": true, "message": "Logged out successfully" }))
}

// POST /api/auth/register-admin
pub async fn handle_register_admin(
    State(state): State<AppState>,
    AppJson(form): AppJson<RegisterAdminRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = user_service::register_admin(&state.db_pool, &state.settings, &form, state.config.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let profile = user_service::find_profile(&state.db_pool, &principal).await?;
    Ok(Json(profile))
}

// PUT /api/auth/change-password
pub async fn handle_change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    auth_service::change_password(
        &state.db_pool,
        &state.config,
        &principal,
        &form.current_password,
        &form.new_password,
    )
    .await?;
    Ok(Json(json!({ "success": true, "message": "Password updated successfully" })))
}
