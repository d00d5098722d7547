use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Client feedback joined with studio and client names for the dashboard.
/// Owners only read feedback in this service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FeedbackOverview {
    pub id: i64,
    pub studio_id: i64,
    pub studio_name: String,
    pub client_name: String,
    pub booking_id: Option<i64>,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
