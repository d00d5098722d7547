use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Studio {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub location: String,
    /// Operating window. Both NULL means the studio accepts any time of day.
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudioRequest {
    pub name: String,
    pub location: Option<String>,
    /// "HH:MM" time-of-day strings, parsed server-side.
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudioRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub description: Option<String>,
}
