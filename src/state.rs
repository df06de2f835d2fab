// src/state.rs
use crate::{config::AppConfig, services::settings_service::SettingsService};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    // Definições globais (registo/login de admins)
    pub settings: SettingsService,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            settings: SettingsService::new(db_pool.clone()),
            db_pool,
            config: Arc::new(config),
        }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for SettingsService {
    fn from_ref(state: &AppState) -> SettingsService {
        state.settings.clone()
    }
}
