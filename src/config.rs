// src/config.rs
use crate::error::{AppError, AppResult};
use std::env;

/// Dados opcionais para criar o super-admin no arranque.
#[derive(Debug, Clone)]
pub struct SuperAdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Configuração lida do ambiente uma única vez, no arranque.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub frontend_url: String,
    // Em produção o cookie vai com Secure + SameSite=None
    pub production: bool,
    pub bcrypt_cost: u32,
    pub super_admin_seed: Option<SuperAdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::ConfigError("JWT_SECRET não definida".into()))?;
        if jwt_secret.len() < 32 {
            tracing::warn!("⚠️ JWT_SECRET é curta, considere usar uma chave mais longa e aleatória!");
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("PORT inválida '{}': {}", raw, e)))?,
            Err(_) => 3000,
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|e| AppError::ConfigError(format!("BCRYPT_COST inválido '{}': {}", raw, e)))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let super_admin_seed = match (env::var("SUPERADMIN_EMAIL"), env::var("SUPERADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(SuperAdminSeed {
                name: env::var("SUPERADMIN_NAME").unwrap_or_else(|_| "Super Admin".into()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://schoolhub.db".into()),
            port,
            jwt_secret,
            jwt_expiry_days: 30,
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".into()),
            production: env::var("APP_ENV").map(|v| v == "production").unwrap_or(false),
            bcrypt_cost,
            super_admin_seed,
        })
    }

    /// Configuração mínima usada pelos testes.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            port: 0,
            jwt_secret: jwt_secret.into(),
            jwt_expiry_days: 30,
            frontend_url: "http://localhost:5173".into(),
            production: false,
            bcrypt_cost: 4,
            super_admin_seed: None,
        }
    }
}
