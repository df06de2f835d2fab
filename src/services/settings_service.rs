// src/services/settings_service.rs
use crate::{
    error::AppResult,
    models::settings::{SettingsPatch, SystemSettings},
};
use sqlx::SqlitePool;

/// Acesso às definições globais (linha única `system_settings`).
///
/// Vive no `AppState`; os handlers nunca leem a tabela diretamente.
#[derive(Debug, Clone)]
pub struct SettingsService {
    db_pool: SqlitePool,
}

impl SettingsService {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn get(&self) -> AppResult<SystemSettings> {
        let settings = sqlx::query_as::<_, SystemSettings>(
            "SELECT allow_admin_registration, allow_admin_login FROM system_settings WHERE id = 1",
        )
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    pub async fn update(&self, patch: &SettingsPatch) -> AppResult<SystemSettings> {
        let updated = self.get().await?.apply(patch);
        tracing::info!("Atualizando definições do sistema: {:?}", updated);

        sqlx::query(
            r#"
            INSERT INTO system_settings (id, allow_admin_registration, allow_admin_login, updated_at)
            VALUES (1, ?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                allow_admin_registration = excluded.allow_admin_registration,
                allow_admin_login = excluded.allow_admin_login,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(updated.allow_admin_registration)
        .bind(updated.allow_admin_login)
        .execute(&self.db_pool)
        .await?;

        Ok(updated)
    }
}
