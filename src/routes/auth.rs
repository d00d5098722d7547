use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::ApiResult,
    models::auth::{
        AuthenticatedOwner, LoginRequest, OwnerProfile, RegisterPushTokenRequest,
    },
    services::{auth::AuthService, push::PushService},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let response = AuthService::login(&state.db, &state.config, &body).await?;
    Ok(Json(json!({
        "success": true,
        "access_token": response.access_token,
        "owner": response.owner,
    })))
}

pub async fn me(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<OwnerProfile>> {
    let row = AuthService::me(&state.db, owner.owner_id).await?;
    Ok(Json(row.into()))
}

pub async fn register_push_token(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(body): Json<RegisterPushTokenRequest>,
) -> ApiResult<Json<Value>> {
    PushService::register_token(&state.db, owner.owner_id, &body.platform, &body.token)
        .await?;
    Ok(Json(json!({ "success": true })))
}
