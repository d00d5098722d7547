use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{ApiError, ApiResult};
use crate::models::booking::{BookingDetail, BookingOverview, BookingStatus};
use crate::models::payment::PaymentStatus;
use crate::models::schedule::AvailabilityStatus;
use crate::services::notifications::NotificationService;

pub struct BookingService;

impl BookingService {
    /// Owner dashboard listing: bookings joined with client, studio and slot.
    pub async fn list(pool: &PgPool, owner_id: i64) -> ApiResult<Vec<BookingOverview>> {
        let rows = sqlx::query_as::<_, BookingOverview>(
            "SELECT b.id, b.status_id, c.name AS client_name, c.email AS client_email,
                    s.name AS studio_name, sc.slot_date, sc.start_time, sc.end_time,
                    b.created_at
             FROM bookings b
             JOIN clients c ON c.id = b.client_id
             JOIN studios s ON s.id = b.studio_id
             JOIN schedules sc ON sc.id = b.schedule_id
             WHERE s.owner_id = $1
             ORDER BY sc.slot_date DESC, sc.start_time DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Apply a status transition. All writes (booking
    /// status, payment failure, slot reversion, client notification) happen
    /// in one transaction; the caller handles post-commit side effects like
    /// the confirmation email.
    pub async fn transition(
        pool: &PgPool,
        owner_id: i64,
        booking_id: i64,
        next: BookingStatus,
    ) -> ApiResult<BookingDetail> {
        let mut tx = pool.begin().await?;

        let detail = Self::owned_booking_for_update(&mut tx, booking_id, owner_id).await?;
        let current = BookingStatus::from_id(detail.status_id)
            .ok_or_else(|| ApiError::Validation(format!("Corrupt status id: {}", detail.status_id)))?;

        if !current.can_transition_to(next) {
            return Err(ApiError::Conflict(format!(
                "A {current} booking cannot be marked {next}"
            )));
        }

        sqlx::query("UPDATE bookings SET status_id = $1, updated_at = now() WHERE id = $2")
            .bind(next.as_id())
            .bind(detail.id)
            .execute(&mut *tx)
            .await?;

        match next {
            BookingStatus::Cancelled => {
                // Cancel is three-way atomic: booking, payment and slot
                // either all change or none do.
                sqlx::query("UPDATE payments SET status = $1 WHERE booking_id = $2")
                    .bind(PaymentStatus::Failed.to_string())
                    .bind(detail.id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("UPDATE schedules SET status_id = $1, updated_at = now() WHERE id = $2")
                    .bind(AvailabilityStatus::Available.as_id())
                    .bind(detail.schedule_id)
                    .execute(&mut *tx)
                    .await?;
                NotificationService::insert(
                    &mut *tx,
                    owner_id,
                    Some(detail.client_id),
                    "booking",
                    &format!(
                        "Your booking at {} on {} was cancelled",
                        detail.studio_name, detail.slot_date
                    ),
                )
                .await?;
            }
            BookingStatus::Confirmed => {
                NotificationService::insert(
                    &mut *tx,
                    owner_id,
                    Some(detail.client_id),
                    "booking",
                    &format!(
                        "Your booking at {} on {} {}–{} is confirmed",
                        detail.studio_name, detail.slot_date, detail.start_time, detail.end_time
                    ),
                )
                .await?;
            }
            BookingStatus::Completed => {
                NotificationService::insert(
                    &mut *tx,
                    owner_id,
                    Some(detail.client_id),
                    "booking",
                    &format!(
                        "Your session at {} on {} was marked completed",
                        detail.studio_name, detail.slot_date
                    ),
                )
                .await?;
            }
            // Archive is owner-side housekeeping; the client is not notified.
            BookingStatus::Archived => {}
            BookingStatus::Pending => {}
        }

        tx.commit().await?;
        Ok(detail)
    }

    /// Load the booking with ownership proven through its studio, locking
    /// the row for the duration of the transition.
    async fn owned_booking_for_update(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        owner_id: i64,
    ) -> ApiResult<BookingDetail> {
        sqlx::query_as::<_, BookingDetail>(
            "SELECT b.id, b.client_id, b.studio_id, b.schedule_id, b.status_id,
                    c.name AS client_name, c.email AS client_email,
                    s.name AS studio_name, sc.slot_date, sc.start_time, sc.end_time
             FROM bookings b
             JOIN clients c ON c.id = b.client_id
             JOIN studios s ON s.id = b.studio_id
             JOIN schedules sc ON sc.id = b.schedule_id
             WHERE b.id = $1 AND s.owner_id = $2
             FOR UPDATE OF b",
        )
        .bind(booking_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".into()))
    }
}
