use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::auth::{Claims, LoginRequest, LoginResponse, Owner};

pub struct AuthService;

impl AuthService {
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: &LoginRequest,
    ) -> ApiResult<LoginResponse> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE email = $1")
            .bind(req.email.trim().to_lowercase())
            .fetch_optional(pool)
            .await?;

        // Same message for unknown email and wrong password.
        let owner = owner
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;
        let valid = bcrypt::verify(&req.password, &owner.password_hash)
            .map_err(|e| ApiError::Internal(e.into()))?;
        if !valid {
            return Err(ApiError::Unauthorized("Invalid email or password".into()));
        }

        let access_token = Self::issue_access_token(config, owner.id)?;
        Ok(LoginResponse {
            access_token,
            owner: owner.into(),
        })
    }

    pub async fn me(pool: &PgPool, owner_id: i64) -> ApiResult<Owner> {
        sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(owner_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Owner not found".into()))
    }

    pub fn issue_access_token(config: &Config, owner_id: i64) -> ApiResult<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: owner_id.to_string(),
            role: "owner".into(),
            iat: now,
            exp: now + config.jwt_expiry_seconds as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(e.into()))
    }
}
