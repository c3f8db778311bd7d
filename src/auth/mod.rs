pub mod blacklist;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::database::models::User;
use crate::types::Role;

pub use blacklist::TokenBlacklist;
pub use password::{PasswordError, PasswordHasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(id: i64, user_name: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            user_name,
            role,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.user_name.clone(), user.role)
    }
}

/// Caller identity attached to authenticated requests
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub user_name: String,
    pub role: Role,
    /// Raw bearer token, kept so logout can revoke it
    pub token: String,
    pub exp: i64,
}

impl AuthUser {
    pub fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            id: claims.id,
            user_name: claims.user_name,
            role: claims.role,
            token,
            exp: claims.exp,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::Admin && is_super_admin(&self.user_name)
    }
}

/// The bootstrap admin named by `SUPERADMIN_USERNAME`
pub fn is_super_admin(user_name: &str) -> bool {
    config::config().security.superadmin.username.as_deref() == Some(user_name)
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

fn secret() -> Result<&'static str, JwtError> {
    let secret = config::config().security.jwt_secret.as_str();
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());

    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::InvalidToken(e.to_string()),
        })
}
