use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    models::auth::AuthenticatedOwner,
    models::notification::Notification,
    services::notifications::NotificationService,
    AppState,
};

pub async fn list_notifications(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Vec<Notification>>> {
    let items = NotificationService::list(&state.db, owner.owner_id).await?;
    Ok(Json(items))
}

pub async fn mark_read(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let updated = NotificationService::mark_read(&state.db, owner.owner_id, id).await?;
    if !updated {
        return Err(ApiError::NotFound("Notification not found".into()));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Value>> {
    let count = NotificationService::mark_all_read(&state.db, owner.owner_id).await?;
    Ok(Json(json!({ "success": true, "updated": count })))
}
