use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // owner id
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from the validated JWT, available via Axum extractors
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner {
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Owner {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub owner: OwnerProfile,
}

#[derive(Debug, Serialize)]
pub struct OwnerProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<Owner> for OwnerProfile {
    fn from(o: Owner) -> Self {
        Self {
            id: o.id,
            email: o.email,
            name: o.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPushTokenRequest {
    pub platform: String,
    pub token: String,
}
