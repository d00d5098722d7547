use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{ApiError, ApiResult};
use crate::models::payment::{Payment, PaymentStatus};
use crate::services::notifications::NotificationService;

const COLUMNS: &str = "id, booking_id, amount::FLOAT8 AS amount, status, paid_at, created_at";

pub struct PaymentService;

impl PaymentService {
    pub async fn get_for_booking(
        pool: &PgPool,
        owner_id: i64,
        booking_id: i64,
    ) -> ApiResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT p.id, p.booking_id, p.amount::FLOAT8 AS amount, p.status,
                    p.paid_at, p.created_at
             FROM payments p
             JOIN bookings b ON b.id = p.booking_id
             JOIN studios s ON s.id = b.studio_id
             WHERE p.booking_id = $1 AND s.owner_id = $2",
        )
        .bind(booking_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        Ok(payment)
    }

    /// Mark a booking's payment completed. Upsert and client notification
    /// run in the same transaction; the insert path records the explicit
    /// zero-amount placeholder to be reconciled elsewhere.
    pub async fn confirm(pool: &PgPool, owner_id: i64, booking_id: i64) -> ApiResult<Payment> {
        let mut tx = pool.begin().await?;

        let (client_id, studio_name) =
            Self::owned_booking_client(&mut tx, booking_id, owner_id).await?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (booking_id, amount, status, paid_at)
             VALUES ($1, 0, $2, now())
             ON CONFLICT (booking_id)
             DO UPDATE SET status = $2, paid_at = now()
             RETURNING {COLUMNS}"
        ))
        .bind(booking_id)
        .bind(PaymentStatus::Completed.to_string())
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::insert(
            &mut *tx,
            owner_id,
            Some(client_id),
            "payment",
            &format!("Your payment for the booking at {studio_name} was received"),
        )
        .await?;

        tx.commit().await?;
        Ok(payment)
    }

    async fn owned_booking_client(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        owner_id: i64,
    ) -> ApiResult<(i64, String)> {
        sqlx::query_as::<_, (i64, String)>(
            "SELECT b.client_id, s.name
             FROM bookings b
             JOIN studios s ON s.id = b.studio_id
             WHERE b.id = $1 AND s.owner_id = $2",
        )
        .bind(booking_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".into()))
    }
}
