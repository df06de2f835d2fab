// src/web/mw_role.rs
//! Gates por role. Correm *depois* de `require_auth`, que já deixou o
//! `Principal` nas extensões.

use crate::{
    error::{AppError, AppResult},
    models::user::{Principal, Role},
};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

fn ensure_role(principal: &Principal, required: Role) -> AppResult<()> {
    if principal.role() == required {
        return Ok(());
    }
    tracing::warn!(
        "Role MW: acesso negado para {} ({}), requer {}.",
        principal.id(),
        principal.role(),
        required
    );
    Err(AppError::Forbidden(format!("Access denied: {} only", required)))
}

/// Id do admin dono do tenant do principal.
pub fn tenant_of(principal: &Principal) -> AppResult<&str> {
    principal
        .tenant_id()
        .ok_or_else(|| AppError::Forbidden("Access denied: no tenant".into()))
}

pub async fn require_super_admin(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_role(&principal, Role::SuperAdmin)?;
    Ok(next.run(request).await)
}

pub async fn require_admin(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_role(&principal, Role::Admin)?;
    Ok(next.run(request).await)
}

pub async fn require_teacher(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_role(&principal, Role::Teacher)?;
    Ok(next.run(request).await)
}

pub async fn require_student(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_role(&principal, Role::Student)?;
    Ok(next.run(request).await)
}
