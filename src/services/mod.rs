// src/services/mod.rs
pub mod auth_service;
pub mod cascade_service;
pub mod course_service;
pub mod lecture_filter;
pub mod lecture_service;
pub mod settings_service;
pub mod user_service;

use crate::error::{AppError, AppResult};

/// Texto obrigatório, sem espaços à volta.
pub(crate) fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Aplica um campo `nullable` de um PATCH sobre o valor atual.
pub(crate) fn patch_field<T: Clone>(patch: &Option<Option<T>>, current: Option<T>) -> Option<T> {
    match patch {
        Some(value) => value.clone(),
        None => current,
    }
}

/// Converte a violação de um índice UNIQUE no mesmo 400 que a verificação prévia devolve.
/// Dois pedidos concorrentes podem passar ambos a verificação; o perdedor cai aqui.
pub(crate) fn on_unique_violation(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
            tracing::warn!("Violação de unicidade: {}", db_error);
            AppError::Validation(message.into())
        }
        other => AppError::from(other),
    }
}
