use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{ApiError, ApiResult};
use crate::models::schedule::{
    AvailabilityStatus, BlockDayOutcome, BlockDayRequest, CreateScheduleRequest,
    ListSchedulesQuery, Schedule, UpdateScheduleRequest,
};
use crate::models::booking::BookingStatus;
use crate::models::studio::Studio;
use crate::services::notifications::NotificationService;

/// Column list for the `schedules` table.
const COLUMNS: &str = "id, studio_id, slot_date, start_time, end_time, status_id, \
    created_at, updated_at";

/// Half-open interval overlap: [a_start, a_end) and [b_start, b_end) overlap
/// iff a_start < b_end and b_start < a_end. Touching boundaries do not count.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A slot must fall inside the studio's configured operating window.
/// An unconfigured side is unbounded.
pub fn within_hours(
    opening: Option<NaiveTime>,
    closing: Option<NaiveTime>,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    if let Some(open) = opening {
        if start < open {
            return false;
        }
    }
    if let Some(close) = closing {
        if end > close {
            return false;
        }
    }
    true
}

/// Parse an "HH:MM" (or "HH:MM:SS") time-of-day string from a request body.
pub fn parse_time_of_day(s: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ApiError::Validation(format!("Invalid time of day: {s}")))
}

/// Normalize a free-text or numeric day-block reason to a blocking status.
/// "maintenance" (or its status id) blocks as Maintenance, everything else
/// (holiday, closure, unspecified) as Unavailable.
pub fn normalize_block_reason(reason: Option<&str>) -> AvailabilityStatus {
    match reason.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
        Some("maintenance") | Some("3") => AvailabilityStatus::Maintenance,
        _ => AvailabilityStatus::Unavailable,
    }
}

/// What a day-block should do for one studio, given the blocking status ids
/// already present on that (studio, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBlockAction {
    Insert,
    Skip,
    Conflict,
}

/// An existing Maintenance/Unavailable slot means the day is already blocked
/// (skip, idempotent). A Booked slot means the day cannot be blocked at all.
/// Skip wins when both are present.
pub fn day_block_action(existing: &[i16]) -> DayBlockAction {
    if existing.iter().any(|&s| {
        s == AvailabilityStatus::Maintenance.as_id()
            || s == AvailabilityStatus::Unavailable.as_id()
    }) {
        return DayBlockAction::Skip;
    }
    if existing
        .iter()
        .any(|&s| s == AvailabilityStatus::Booked.as_id())
    {
        return DayBlockAction::Conflict;
    }
    DayBlockAction::Insert
}

/// Client holding a live booking on an edited slot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AffectedClient {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Result of a slot update: the new slot plus what the caller needs for the
/// post-commit change emails.
#[derive(Debug, Clone)]
pub struct SlotUpdate {
    pub slot: Schedule,
    pub studio_name: String,
    pub affected: Vec<AffectedClient>,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Overlap pre-check for a candidate interval on (studio, date), run
    /// inside the same transaction as the subsequent write. The exclusion
    /// constraint on `schedules` is the backstop for concurrent writers.
    pub async fn can_place(
        tx: &mut Transaction<'_, Postgres>,
        studio_id: i64,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude_schedule_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM schedules
             WHERE studio_id = $1 AND slot_date = $2
               AND status_id = ANY($6)
               AND start_time < $4 AND $3 < end_time
               AND ($5::BIGINT IS NULL OR id <> $5)",
        )
        .bind(studio_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .bind(exclude_schedule_id)
        .bind(AvailabilityStatus::blocking_ids())
        .fetch_one(&mut **tx)
        .await?;
        Ok(conflicts == 0)
    }

    pub async fn list(
        pool: &PgPool,
        owner_id: i64,
        studio_id: i64,
        query: &ListSchedulesQuery,
    ) -> ApiResult<Vec<Schedule>> {
        let slots = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT sc.{} FROM schedules sc
             JOIN studios s ON s.id = sc.studio_id
             WHERE sc.studio_id = $1 AND s.owner_id = $2
               AND ($3::DATE IS NULL OR sc.slot_date >= $3)
               AND ($4::DATE IS NULL OR sc.slot_date <= $4)
             ORDER BY sc.slot_date, sc.start_time",
            COLUMNS.replace(", ", ", sc.")
        ))
        .bind(studio_id)
        .bind(owner_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(pool)
        .await?;
        Ok(slots)
    }

    /// Add a slot: validate the time range, confirm studio ownership and
    /// operating hours, run the overlap check, then insert — all in one
    /// transaction.
    pub async fn add_slot(
        pool: &PgPool,
        owner_id: i64,
        req: &CreateScheduleRequest,
    ) -> ApiResult<Schedule> {
        let start = parse_time_of_day(&req.start_time)?;
        let end = parse_time_of_day(&req.end_time)?;
        if start >= end {
            return Err(ApiError::Validation(
                "Start time must be before end time".into(),
            ));
        }
        let status = match req.status_id {
            Some(id) => AvailabilityStatus::from_id(id)
                .ok_or_else(|| ApiError::Validation(format!("Unknown availability status: {id}")))?,
            None => AvailabilityStatus::Available,
        };

        let mut tx = pool.begin().await?;

        let studio = Self::owned_studio(&mut tx, req.studio_id, owner_id).await?;
        if !within_hours(studio.opening_time, studio.closing_time, start, end) {
            return Err(ApiError::Validation(
                "Slot falls outside the studio's operating hours".into(),
            ));
        }
        if !Self::can_place(&mut tx, studio.id, req.slot_date, start, end, None).await? {
            return Err(ApiError::Conflict(
                "The requested time range conflicts with an existing slot".into(),
            ));
        }

        let slot = sqlx::query_as::<_, Schedule>(&format!(
            "INSERT INTO schedules (studio_id, slot_date, start_time, end_time, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(studio.id)
        .bind(req.slot_date)
        .bind(start)
        .bind(end)
        .bind(status.as_id())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(slot)
    }

    /// Update a slot. Booked slots are editable (unlike deletion); bookings
    /// pointing at the slot are notified of the new date and time. Returns
    /// the affected clients so the caller can send change emails post-commit.
    pub async fn update_slot(
        pool: &PgPool,
        owner_id: i64,
        schedule_id: i64,
        req: &UpdateScheduleRequest,
    ) -> ApiResult<SlotUpdate> {
        let start = parse_time_of_day(&req.start_time)?;
        let end = parse_time_of_day(&req.end_time)?;
        if start >= end {
            return Err(ApiError::Validation(
                "Start time must be before end time".into(),
            ));
        }

        let mut tx = pool.begin().await?;

        let existing = Self::owned_schedule(&mut tx, schedule_id, owner_id).await?;
        let studio = Self::owned_studio(&mut tx, existing.studio_id, owner_id).await?;

        let status = match req.status_id {
            Some(id) => AvailabilityStatus::from_id(id)
                .ok_or_else(|| ApiError::Validation(format!("Unknown availability status: {id}")))?,
            None => AvailabilityStatus::from_id(existing.status_id)
                .unwrap_or(AvailabilityStatus::Available),
        };

        if !within_hours(studio.opening_time, studio.closing_time, start, end) {
            return Err(ApiError::Validation(
                "Slot falls outside the studio's operating hours".into(),
            ));
        }
        if !Self::can_place(
            &mut tx,
            studio.id,
            req.slot_date,
            start,
            end,
            Some(existing.id),
        )
        .await?
        {
            return Err(ApiError::Conflict(
                "The requested time range conflicts with an existing slot".into(),
            ));
        }

        let slot = sqlx::query_as::<_, Schedule>(&format!(
            "UPDATE schedules
             SET slot_date = $1, start_time = $2, end_time = $3, status_id = $4,
                 updated_at = now()
             WHERE id = $5
             RETURNING {COLUMNS}"
        ))
        .bind(req.slot_date)
        .bind(start)
        .bind(end)
        .bind(status.as_id())
        .bind(existing.id)
        .fetch_one(&mut *tx)
        .await?;

        // Tell every client with a live booking on this slot about the change.
        let affected: Vec<AffectedClient> = sqlx::query_as(
            "SELECT c.id, c.name, c.email FROM bookings b
             JOIN clients c ON c.id = b.client_id
             WHERE b.schedule_id = $1 AND b.status_id <> ALL($2)",
        )
        .bind(existing.id)
        .bind(BookingStatus::terminal_ids())
        .fetch_all(&mut *tx)
        .await?;
        for client in &affected {
            NotificationService::insert(
                &mut *tx,
                owner_id,
                Some(client.id),
                "schedule_update",
                &format!(
                    "Your session at {} was moved to {} {}–{}",
                    studio.name, slot.slot_date, slot.start_time, slot.end_time
                ),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(SlotUpdate {
            slot,
            studio_name: studio.name,
            affected,
        })
    }

    /// Delete a slot. Rejected outright while the slot is Booked.
    pub async fn delete_slot(pool: &PgPool, owner_id: i64, schedule_id: i64) -> ApiResult<()> {
        let mut tx = pool.begin().await?;

        let existing = Self::owned_schedule(&mut tx, schedule_id, owner_id).await?;
        if existing.status_id == AvailabilityStatus::Booked.as_id() {
            return Err(ApiError::Conflict(
                "Cannot delete a booked schedule".into(),
            ));
        }

        sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(existing.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Block an entire day for one studio or all of the owner's studios,
    /// all-or-nothing. A studio whose day already carries a Maintenance or
    /// Unavailable slot is skipped (idempotent); a standing booking on that
    /// day fails the whole batch.
    pub async fn block_day(
        pool: &PgPool,
        owner_id: i64,
        req: &BlockDayRequest,
    ) -> ApiResult<BlockDayOutcome> {
        let status = normalize_block_reason(req.reason.as_deref());

        let mut tx = pool.begin().await?;

        let studios: Vec<Studio> = match req.studio_id {
            Some(id) => vec![Self::owned_studio(&mut tx, id, owner_id).await?],
            None => {
                sqlx::query_as::<_, Studio>(
                    "SELECT * FROM studios WHERE owner_id = $1 ORDER BY id",
                )
                .bind(owner_id)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        let mut outcome = BlockDayOutcome {
            blocked: Vec::new(),
            skipped: Vec::new(),
        };

        for studio in &studios {
            let existing: Vec<i16> = sqlx::query_scalar(
                "SELECT status_id FROM schedules
                 WHERE studio_id = $1 AND slot_date = $2 AND status_id = ANY($3)",
            )
            .bind(studio.id)
            .bind(req.slot_date)
            .bind(AvailabilityStatus::blocking_ids())
            .fetch_all(&mut *tx)
            .await?;

            match day_block_action(&existing) {
                DayBlockAction::Skip => {
                    outcome.skipped.push(studio.id);
                    continue;
                }
                DayBlockAction::Conflict => {
                    return Err(ApiError::Conflict(format!(
                        "Studio {} has bookings on {}; cancel them before blocking the day",
                        studio.name, req.slot_date
                    )));
                }
                DayBlockAction::Insert => {}
            }

            let open = studio
                .opening_time
                .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
            // TIME 24:00 does not survive the round-trip into NaiveTime, so
            // an unconfigured window closes one second short of midnight.
            let close = studio
                .closing_time
                .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).unwrap());

            sqlx::query(
                "INSERT INTO schedules (studio_id, slot_date, start_time, end_time, status_id)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(studio.id)
            .bind(req.slot_date)
            .bind(open)
            .bind(close)
            .bind(status.as_id())
            .execute(&mut *tx)
            .await?;
            outcome.blocked.push(studio.id);
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Load a studio, proving ownership in the same query.
    async fn owned_studio(
        tx: &mut Transaction<'_, Postgres>,
        studio_id: i64,
        owner_id: i64,
    ) -> ApiResult<Studio> {
        sqlx::query_as::<_, Studio>("SELECT * FROM studios WHERE id = $1 AND owner_id = $2")
            .bind(studio_id)
            .bind(owner_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("Studio not found".into()))
    }

    /// Load a schedule slot, proving ownership through its studio.
    async fn owned_schedule(
        tx: &mut Transaction<'_, Postgres>,
        schedule_id: i64,
        owner_id: i64,
    ) -> ApiResult<Schedule> {
        sqlx::query_as::<_, Schedule>(&format!(
            "SELECT sc.{} FROM schedules sc
             JOIN studios s ON s.id = sc.studio_id
             WHERE sc.id = $1 AND s.owner_id = $2",
            COLUMNS.replace(", ", ", sc.")
        ))
        .bind(schedule_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn partial_and_full_overlaps_are_detected() {
        // new interval partially inside an existing one
        assert!(overlaps(t(10, 30), t(11, 30), t(10, 0), t(11, 0)));
        // new interval fully inside an existing one
        assert!(overlaps(t(10, 15), t(10, 45), t(10, 0), t(11, 0)));
        // existing interval fully inside the new one
        assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
        // identical intervals
        assert!(overlaps(t(10, 0), t(11, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!overlaps(t(11, 0), t(12, 0), t(10, 0), t(11, 0)));
        assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(t(14, 0), t(15, 0), t(10, 0), t(11, 0)));
        assert!(!overlaps(t(8, 0), t(9, 30), t(10, 0), t(11, 0)));
    }

    #[test]
    fn hours_bound_placement_when_configured() {
        let open = Some(t(6, 0));
        let close = Some(t(22, 0));
        assert!(within_hours(open, close, t(10, 0), t(11, 0)));
        assert!(within_hours(open, close, t(6, 0), t(22, 0)));
        assert!(!within_hours(open, close, t(5, 0), t(7, 0)));
        assert!(!within_hours(open, close, t(21, 0), t(23, 0)));
    }

    #[test]
    fn unconfigured_hours_accept_any_time() {
        assert!(within_hours(None, None, t(0, 0), t(23, 59)));
        assert!(within_hours(Some(t(6, 0)), None, t(6, 0), t(23, 59)));
        assert!(!within_hours(Some(t(6, 0)), None, t(5, 0), t(7, 0)));
    }

    #[test]
    fn times_parse_with_and_without_seconds() {
        assert_eq!(parse_time_of_day("10:30").unwrap(), t(10, 30));
        assert_eq!(parse_time_of_day("10:30:00").unwrap(), t(10, 30));
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("half past ten").is_err());
    }

    #[test]
    fn block_reasons_normalize() {
        assert_eq!(
            normalize_block_reason(Some("maintenance")),
            AvailabilityStatus::Maintenance
        );
        assert_eq!(
            normalize_block_reason(Some("  Maintenance ")),
            AvailabilityStatus::Maintenance
        );
        assert_eq!(
            normalize_block_reason(Some("3")),
            AvailabilityStatus::Maintenance
        );
        assert_eq!(
            normalize_block_reason(Some("holiday")),
            AvailabilityStatus::Unavailable
        );
        assert_eq!(normalize_block_reason(None), AvailabilityStatus::Unavailable);
    }

    #[test]
    fn blocking_statuses() {
        assert!(!AvailabilityStatus::Available.is_blocking());
        assert!(AvailabilityStatus::Booked.is_blocking());
        assert!(AvailabilityStatus::Maintenance.is_blocking());
        assert!(AvailabilityStatus::Unavailable.is_blocking());
        assert_eq!(AvailabilityStatus::blocking_ids(), vec![2, 3, 4]);
    }

    #[test]
    fn day_block_inserts_on_a_clear_day() {
        assert_eq!(day_block_action(&[]), DayBlockAction::Insert);
        // Available slots do not reach the classifier, but a stray id
        // that is not blocking must not change the outcome either.
        assert_eq!(day_block_action(&[1]), DayBlockAction::Insert);
    }

    #[test]
    fn day_block_skips_an_already_blocked_day() {
        let maintenance = AvailabilityStatus::Maintenance.as_id();
        let unavailable = AvailabilityStatus::Unavailable.as_id();
        let booked = AvailabilityStatus::Booked.as_id();
        assert_eq!(day_block_action(&[maintenance]), DayBlockAction::Skip);
        assert_eq!(day_block_action(&[unavailable]), DayBlockAction::Skip);
        // an already-blocked day stays a skip even with bookings present
        assert_eq!(day_block_action(&[booked, unavailable]), DayBlockAction::Skip);
    }

    #[test]
    fn day_block_refuses_a_day_with_bookings() {
        let booked = AvailabilityStatus::Booked.as_id();
        assert_eq!(day_block_action(&[booked]), DayBlockAction::Conflict);
        assert_eq!(day_block_action(&[booked, booked]), DayBlockAction::Conflict);
    }
}
