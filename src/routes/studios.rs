use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiResult,
    models::auth::AuthenticatedOwner,
    models::studio::{CreateStudioRequest, Studio, UpdateStudioRequest},
    services::studios::StudioService,
    AppState,
};

pub async fn list_studios(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Vec<Studio>>> {
    let studios = StudioService::list(&state.db, owner.owner_id).await?;
    Ok(Json(studios))
}

pub async fn get_studio(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Studio>> {
    let studio = StudioService::get(&state.db, owner.owner_id, id).await?;
    Ok(Json(studio))
}

pub async fn create_studio(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(body): Json<CreateStudioRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let studio = StudioService::create(&state.db, owner.owner_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "studio": studio })),
    ))
}

pub async fn update_studio(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStudioRequest>,
) -> ApiResult<Json<Value>> {
    let studio = StudioService::update(&state.db, owner.owner_id, id, &body).await?;
    Ok(Json(json!({ "success": true, "studio": studio })))
}
