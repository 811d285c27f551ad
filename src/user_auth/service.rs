use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::DbError;
use crate::db::users::UserRepository;

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login already registered")]
    DuplicateLogin,
    #[error("invalid login or password")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] DbError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// JWT claims. `sub` carries the user's login (§3 User is keyed by login).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    /// Create a user and its account atomically (§3). Rejects a login that's
    /// already taken without surfacing a raw constraint-violation error.
    pub async fn register(&self, login: &str, password: &str) -> Result<(), AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let created = UserRepository::create(&self.db, login, &password_hash).await?;
        if !created {
            return Err(AuthError::DuplicateLogin);
        }
        Ok(())
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, login: &str, password: &str) -> Result<String, AuthError> {
        let hash = UserRepository::password_hash(&self.db, login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.issue_token(login)
    }

    fn issue_token(&self, login: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: login.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_round_trips_login() {
        let svc = AuthService::new(dummy_pool(), "test-secret".to_string());
        let token = svc.issue_token("alice").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn token_rejected_with_wrong_secret() {
        let svc = AuthService::new(dummy_pool(), "right-secret".to_string());
        let token = svc.issue_token("alice").unwrap();

        let other = AuthService::new(dummy_pool(), "wrong-secret".to_string());
        assert!(other.verify_token(&token).is_err());
    }

    fn dummy_pool() -> PgPool {
        // lazy pool: never connects until a query runs, fine for token tests
        sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }
}
