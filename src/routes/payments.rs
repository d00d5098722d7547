use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiResult,
    models::auth::AuthenticatedOwner,
    services::payments::PaymentService,
    AppState,
};

pub async fn get_payment(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let payment = PaymentService::get_for_booking(&state.db, owner.owner_id, booking_id).await?;
    Ok(Json(json!({ "success": true, "payment": payment })))
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let payment = PaymentService::confirm(&state.db, owner.owner_id, booking_id).await?;

    // Push dispatch happens after the commit and is best-effort.
    let push = state.push.clone();
    let db = state.db.clone();
    let owner_id = owner.owner_id;
    tokio::spawn(async move {
        push.notify_owner(
            &db,
            owner_id,
            "Payment received",
            &format!("Payment for booking #{booking_id} was marked completed"),
            Some(json!({ "booking_id": booking_id })),
        )
        .await;
    });

    Ok(Json(json!({ "success": true, "payment": payment })))
}
