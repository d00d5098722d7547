use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Availability status of a schedule slot. Stored as a SMALLINT id; resolved
/// once here instead of being re-queried from a lookup table per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Booked,
    Maintenance,
    Unavailable,
}

impl AvailabilityStatus {
    pub fn as_id(self) -> i16 {
        match self {
            AvailabilityStatus::Available => 1,
            AvailabilityStatus::Booked => 2,
            AvailabilityStatus::Maintenance => 3,
            AvailabilityStatus::Unavailable => 4,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(AvailabilityStatus::Available),
            2 => Some(AvailabilityStatus::Booked),
            3 => Some(AvailabilityStatus::Maintenance),
            4 => Some(AvailabilityStatus::Unavailable),
            _ => None,
        }
    }

    pub const ALL: [AvailabilityStatus; 4] = [
        AvailabilityStatus::Available,
        AvailabilityStatus::Booked,
        AvailabilityStatus::Maintenance,
        AvailabilityStatus::Unavailable,
    ];

    /// Blocking statuses prevent new overlapping placements.
    pub fn is_blocking(self) -> bool {
        !matches!(self, AvailabilityStatus::Available)
    }

    /// Status ids that participate in overlap checks. SQL binds this list
    /// instead of repeating the ids.
    pub fn blocking_ids() -> Vec<i16> {
        Self::ALL
            .into_iter()
            .filter(|s| s.is_blocking())
            .map(|s| s.as_id())
            .collect()
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Booked => "booked",
            AvailabilityStatus::Maintenance => "maintenance",
            AvailabilityStatus::Unavailable => "unavailable",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub studio_id: i64,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status_id: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub studio_id: i64,
    pub slot_date: NaiveDate,
    /// "HH:MM" time-of-day strings, parsed server-side.
    pub start_time: String,
    pub end_time: String,
    pub status_id: Option<i16>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status_id: Option<i16>,
}

/// Target either one studio or every studio the owner manages.
#[derive(Debug, Deserialize)]
pub struct BlockDayRequest {
    pub slot_date: NaiveDate,
    /// None blocks the day across all of the owner's studios.
    pub studio_id: Option<i64>,
    /// Free-text or numeric reason; normalized to maintenance/unavailable.
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlockDayOutcome {
    pub blocked: Vec<i64>,
    pub skipped: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListSchedulesQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
