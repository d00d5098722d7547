use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiResult,
    models::auth::AuthenticatedOwner,
    models::faq::{ChatbotFaq, CreateFaqRequest, UpdateFaqRequest},
    services::faqs::FaqService,
    AppState,
};

pub async fn list_faqs(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Vec<ChatbotFaq>>> {
    let faqs = FaqService::list(&state.db, owner.owner_id).await?;
    Ok(Json(faqs))
}

pub async fn create_faq(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(body): Json<CreateFaqRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let faq = FaqService::create(&state.db, owner.owner_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "faq": faq })),
    ))
}

pub async fn update_faq(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
    Json(body): Json<UpdateFaqRequest>,
) -> ApiResult<Json<Value>> {
    let faq = FaqService::update(&state.db, owner.owner_id, id, &body).await?;
    Ok(Json(json!({ "success": true, "faq": faq })))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    FaqService::delete(&state.db, owner.owner_id, id).await?;
    Ok(Json(json!({ "success": true })))
}
