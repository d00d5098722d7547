use axum::{extract::State, Json};

use crate::{
    error::ApiResult,
    models::auth::AuthenticatedOwner,
    models::feedback::FeedbackOverview,
    services::feedback::FeedbackService,
    AppState,
};

pub async fn list_feedback(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Vec<FeedbackOverview>>> {
    let rows = FeedbackService::list(&state.db, owner.owner_id).await?;
    Ok(Json(rows))
}
