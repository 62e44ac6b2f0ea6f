use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::rngs::OsRng;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{UserRole, UserRow};
use crate::types::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::{AppConfig, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

#[post("/signup")]
pub async fn signup(
    app_state: web::Data<Arc<AppState>>,
    app_config: web::Data<Arc<AppConfig>>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }
    if payload.role == UserRole::Admin {
        return Err(ApiError::Validation("Invalid role specified".to_string()));
    }

    let pool = &app_state.pool;
    if UserRow::find_by_email(pool, &payload.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let avatar_url = placeholder_avatar(&payload.name);

    let row = UserRow::create(
        pool,
        payload.role,
        &payload.name,
        &payload.email,
        &password_hash,
        Some(avatar_url),
    )
    .await?;

    info!("New {:?} account: {}", row.role, row.id);

    let token = sign_jwt(row.id, &app_config)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        user: row.into_user(),
        token,
    }))
}

#[post("/login")]
pub async fn login(
    app_state: web::Data<Arc<AppState>>,
    app_config: web::Data<Arc<AppConfig>>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email, password, and role are required".to_string(),
        ));
    }

    let row = UserRow::find_by_email_and_role(&app_state.pool, &payload.email, payload.role)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials or role".to_string()))?;

    if !verify_password(&payload.password, &row.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = sign_jwt(row.id, &app_config)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        user: row.into_user(),
        token,
    }))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow!("failed to hash password: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

fn sign_jwt(user_id: Uuid, app_config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600 * 24 * 7, // Token expires after 1 week
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app_config.jwt_secret.as_ref()),
    )
    .map_err(|e| ApiError::Internal(anyhow!("failed to sign token: {e}")))
}

fn placeholder_avatar(name: &str) -> String {
    let initial = name.trim().chars().next().unwrap_or('?');
    format!("https://placehold.co/100x100.png?text={initial}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            openai_api_key: String::new(),
            openai_api_base: None,
            port: 0,
        }
    }

    #[test]
    fn password_round_trips_through_argon2() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn signed_token_decodes_back_to_the_user_id() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = sign_jwt(user_id, &config).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, user_id.to_string());
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn avatar_uses_the_first_letter_of_the_name() {
        assert_eq!(
            placeholder_avatar("Alice"),
            "https://placehold.co/100x100.png?text=A"
        );
        assert_eq!(
            placeholder_avatar("  Émile"),
            "https://placehold.co/100x100.png?text=É"
        );
    }
}
