// src/web/mw_auth.rs
use crate::{
    error::AppError,
    services::auth_service::{self, TOKEN_COOKIE},
    state::AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

/// Lê o JWT do cookie `token` (ou do header `Authorization: Bearer`).
fn extract_token(cookies: &Cookies, request: &Request) -> Option<String> {
    if let Some(cookie) = cookies.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

// Middleware que valida o token e põe o Principal nas extensões da requisição
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(&cookies, &request) else {
        tracing::debug!("Autenticação MW: pedido sem token.");
        return Err(AppError::Unauthorized("Not authorized, no token".into()));
    };

    let claims = auth_service::decode_token(&state.config, &token)?;
    let principal = auth_service::resolve_principal(&state.db_pool, &claims).await?;
    tracing::debug!("Autenticação MW: {} ({}) autenticado.", principal.id(), principal.role());

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
