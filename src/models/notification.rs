use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only feed entry; only `is_read` ever mutates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub owner_id: i64,
    pub client_id: Option<i64>,
    pub notif_type: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
