use sqlx::{PgExecutor, PgPool};

use crate::error::ApiResult;
use crate::models::notification::Notification;

pub struct NotificationService;

impl NotificationService {
    /// Append a feed entry. Takes any executor so callers can write it
    /// inside their own transaction.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: i64,
        client_id: Option<i64>,
        notif_type: &str,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (owner_id, client_id, notif_type, message)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(owner_id)
        .bind(client_id)
        .bind(notif_type)
        .bind(message)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list(pool: &PgPool, owner_id: i64) -> ApiResult<Vec<Notification>> {
        let items = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE owner_id = $1
             ORDER BY is_read, created_at DESC
             LIMIT 200",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn mark_read(pool: &PgPool, owner_id: i64, id: i64) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(pool: &PgPool, owner_id: i64) -> ApiResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE owner_id = $1 AND is_read = FALSE",
        )
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
