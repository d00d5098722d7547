use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::ApiResult,
    models::auth::AuthenticatedOwner,
    models::schedule::{
        BlockDayRequest, CreateScheduleRequest, ListSchedulesQuery, Schedule,
        UpdateScheduleRequest,
    },
    services::schedules::ScheduleService,
    AppState,
};

pub async fn list_schedules(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(studio_id): Path<i64>,
    Query(query): Query<ListSchedulesQuery>,
) -> ApiResult<Json<Vec<Schedule>>> {
    let slots = ScheduleService::list(&state.db, owner.owner_id, studio_id, &query).await?;
    Ok(Json(slots))
}

pub async fn add_schedule(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(body): Json<CreateScheduleRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let slot = ScheduleService::add_slot(&state.db, owner.owner_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "schedule": slot })),
    ))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
    Json(body): Json<UpdateScheduleRequest>,
) -> ApiResult<Json<Value>> {
    let update = ScheduleService::update_slot(&state.db, owner.owner_id, id, &body).await?;

    // Change emails are fire-and-forget after the commit; a slow or failing
    // SMTP server cannot fail the update.
    if let Some(email) = state.email.clone() {
        let slot = update.slot.clone();
        let studio_name = update.studio_name.clone();
        let affected = update.affected.clone();
        tokio::spawn(async move {
            for client in affected {
                if let Err(e) = email
                    .send_schedule_change(
                        &client.email,
                        &client.name,
                        &studio_name,
                        slot.slot_date,
                        slot.start_time,
                        slot.end_time,
                    )
                    .await
                {
                    tracing::warn!("Failed to send schedule-change email: {e}");
                }
            }
        });
    }

    Ok(Json(json!({ "success": true, "schedule": update.slot })))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    ScheduleService::delete_slot(&state.db, owner.owner_id, id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn block_day(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(body): Json<BlockDayRequest>,
) -> ApiResult<Json<Value>> {
    let outcome = ScheduleService::block_day(&state.db, owner.owner_id, &body).await?;
    Ok(Json(json!({
        "success": true,
        "blocked": outcome.blocked,
        "skipped": outcome.skipped,
    })))
}
