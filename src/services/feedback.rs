use sqlx::PgPool;

use crate::error::ApiResult;
use crate::models::feedback::FeedbackOverview;

pub struct FeedbackService;

impl FeedbackService {
    /// Feedback left on any of the owner's studios, newest first.
    pub async fn list(pool: &PgPool, owner_id: i64) -> ApiResult<Vec<FeedbackOverview>> {
        let rows = sqlx::query_as::<_, FeedbackOverview>(
            "SELECT f.id, f.studio_id, s.name AS studio_name, c.name AS client_name,
                    f.booking_id, f.rating, f.comment, f.created_at
             FROM feedback f
             JOIN studios s ON s.id = f.studio_id
             JOIN clients c ON c.id = f.client_id
             WHERE s.owner_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
