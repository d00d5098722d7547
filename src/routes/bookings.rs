use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    models::auth::AuthenticatedOwner,
    models::booking::{BookingOverview, BookingStatus, UpdateBookingStatusRequest},
    services::bookings::BookingService,
    AppState,
};

pub async fn list_bookings(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
) -> ApiResult<Json<Vec<BookingOverview>>> {
    let bookings = BookingService::list(&state.db, owner.owner_id).await?;
    Ok(Json(bookings))
}

pub async fn confirm_booking(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let detail =
        BookingService::transition(&state.db, owner.owner_id, id, BookingStatus::Confirmed)
            .await?;

    // Confirmation email is fire-and-forget post-commit; a send failure
    // must not fail the transition.
    if let Some(email) = state.email.clone() {
        tokio::spawn(async move {
            if let Err(e) = email
                .send_booking_confirmation(
                    &detail.client_email,
                    &detail.client_name,
                    &detail.studio_name,
                    detail.slot_date,
                    detail.start_time,
                    detail.end_time,
                )
                .await
            {
                tracing::warn!("Failed to send booking confirmation email: {e}");
            }
        });
    }

    Ok(Json(json!({ "success": true, "status": "confirmed" })))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    BookingService::transition(&state.db, owner.owner_id, id, BookingStatus::Cancelled).await?;
    Ok(Json(json!({ "success": true, "status": "cancelled" })))
}

pub async fn archive_booking(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    BookingService::transition(&state.db, owner.owner_id, id, BookingStatus::Archived).await?;
    Ok(Json(json!({ "success": true, "status": "archived" })))
}

/// Dashboard "mark as X": the status string is validated against the closed
/// enum before any transition is attempted.
pub async fn update_booking_status(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBookingStatusRequest>,
) -> ApiResult<Json<Value>> {
    let next: BookingStatus = body
        .status
        .parse()
        .map_err(|_| ApiError::Validation(format!("Unknown booking status: {}", body.status)))?;

    BookingService::transition(&state.db, owner.owner_id, id, next).await?;
    Ok(Json(json!({ "success": true, "status": next })))
}
