// src/services/auth_service.rs
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, Principal, Role},
    services::{settings_service::SettingsService, user_service},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Nome do cookie HTTP-only que transporta o JWT.
pub const TOKEN_COOKIE: &str = "token";

pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Conteúdo do JWT: `{id, role, admin}` mais a expiração.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub admin: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt...");
        bcrypt::hash(&password, cost)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

pub fn validate_new_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn create_token(config: &AppConfig, principal: &Principal) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        id: principal.id().to_string(),
        role: principal.role(),
        admin: match principal {
            Principal::Teacher { admin_id, .. } | Principal::Student { admin_id, .. } => Some(admin_id.clone()),
            _ => None,
        },
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(config.jwt_expiry_days)).timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

pub fn decode_token(config: &AppConfig, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Token rejeitado: {}", e);
        AppError::Unauthorized("Not authorized, token failed".into())
    })
}

/// Resolve as claims de um token no principal correspondente,
/// relendo o registo da tabela da role (o registo pode ter sido apagado).
pub async fn resolve_principal(db_pool: &SqlitePool, claims: &Claims) -> AppResult<Principal> {
    let credentials = user_service::find_credentials_by_id(db_pool, claims.role, &claims.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".into()))?;

    credentials.into_principal(claims.role)
}

/// Autentica email + senha na tabela da role pedida e devolve o principal e o token.
pub async fn login(
    db_pool: &SqlitePool,
    config: &AppConfig,
    settings: &SettingsService,
    form: &LoginRequest,
) -> AppResult<(Principal, String)> {
    tracing::info!("Tentativa de login ({}) para: {}", form.role, form.email);

    if form.role == Role::Admin && !settings.get().await?.allow_admin_login {
        tracing::warn!("Login de admin recusado: desativado nas definições do sistema.");
        return Err(AppError::Forbidden("Admin login is currently disabled".into()));
    }

    let Some(credentials) = user_service::find_credentials_by_email(db_pool, form.role, &form.email).await? else {
        tracing::warn!("Utilizador não encontrado: {}", form.email);
        return Err(AppError::Validation(INVALID_LOGIN.into()));
    };

    if !verify_password(&form.password, &credentials.password_hash).await? {
        tracing::warn!("Senha incorreta para: {}", form.email);
        return Err(AppError::Validation(INVALID_LOGIN.into()));
    }

    let principal = credentials.into_principal(form.role)?;
    let token = create_token(config, &principal)?;
    tracing::info!("✅ Login bem-sucedido para: {} ({})", principal.id(), principal.role());
    Ok((principal, token))
}

/// Troca a senha de qualquer role depois de confirmar a senha atual.
pub async fn change_password(
    db_pool: &SqlitePool,
    config: &AppConfig,
    principal: &Principal,
    current_password: &str,
    new_password: &str,
) -> AppResult<()> {
    validate_new_password(new_password)?;

    let credentials = user_service::find_credentials_by_id(db_pool, principal.role(), principal.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(current_password, &credentials.password_hash).await? {
        tracing::warn!("Troca de senha recusada para {}: senha atual errada.", principal.id());
        return Err(AppError::Validation("Current password is incorrect".into()));
    }

    let new_hash = hash_password(new_password, config.bcrypt_cost).await?;
    user_service::update_password_hash(db_pool, principal.role(), principal.id(), &new_hash).await?;
    tracing::info!("✅ Senha alterada com sucesso para: {}", principal.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_role_and_tenant() {
        let config = AppConfig::for_tests("test-secret-with-enough-length-123456");
        let principal = Principal::Teacher { id: "t1".into(), admin_id: "a1".into() };

        let token = create_token(&config, &principal).unwrap();
        let claims = decode_token(&config, &token).unwrap();

        assert_eq!(claims.id, "t1");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.admin.as_deref(), Some("a1"));
        assert!(claims.exp > claims.iat);
        assert_eq!((claims.exp - claims.iat) as i64, 30 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let config = AppConfig::for_tests("first-secret-first-secret-first-secret");
        let other = AppConfig::for_tests("other-secret-other-secret-other-secret");
        let token = create_token(&config, &Principal::Admin { id: "a1".into() }).unwrap();

        let err = decode_token(&other, &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(matches!(decode_token(&config, "not-a-jwt"), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_new_password("12345").is_err());
        assert!(validate_new_password("123456").is_ok());
    }

    #[tokio::test]
    async fn bcrypt_hash_verifies() {
        let hash = hash_password("segredo123", 4).await.unwrap();
        assert!(verify_password("segredo123", &hash).await.unwrap());
        assert!(!verify_password("outra", &hash).await.unwrap());
    }
}
