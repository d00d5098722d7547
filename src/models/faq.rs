use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatbotFaq {
    pub id: i64,
    pub owner_id: i64,
    pub studio_id: i64,
    pub question: String,
    pub answer: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFaqRequest {
    pub studio_id: i64,
    pub question: String,
    pub answer: String,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
