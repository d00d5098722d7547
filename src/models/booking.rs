use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Booking lifecycle status. Cancelled and Archived are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Archived,
    Completed,
}

impl BookingStatus {
    pub fn as_id(self) -> i16 {
        match self {
            BookingStatus::Pending => 1,
            BookingStatus::Confirmed => 2,
            BookingStatus::Cancelled => 3,
            BookingStatus::Archived => 4,
            BookingStatus::Completed => 5,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(BookingStatus::Pending),
            2 => Some(BookingStatus::Confirmed),
            3 => Some(BookingStatus::Cancelled),
            4 => Some(BookingStatus::Archived),
            5 => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Archived,
        BookingStatus::Completed,
    ];

    /// Terminal states cannot be re-opened. They can still be archived.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Archived)
    }

    /// Status ids excluded by "live booking" queries.
    pub fn terminal_ids() -> Vec<i16> {
        Self::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .map(|s| s.as_id())
            .collect()
    }

    /// Legal transitions: Pending → {Confirmed, Cancelled},
    /// Confirmed → {Cancelled, Completed}. Archiving is housekeeping and
    /// reverses nothing, so any state may be archived, including Cancelled.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        if next == BookingStatus::Archived {
            return self != BookingStatus::Archived;
        }
        match self {
            BookingStatus::Pending => {
                matches!(next, BookingStatus::Confirmed | BookingStatus::Cancelled)
            }
            BookingStatus::Confirmed => {
                matches!(next, BookingStatus::Cancelled | BookingStatus::Completed)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Archived => "archived",
            BookingStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "archived" => Ok(BookingStatus::Archived),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(anyhow::anyhow!("Unknown booking status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub client_id: i64,
    pub studio_id: i64,
    pub schedule_id: i64,
    pub status_id: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard row: booking joined with client, studio and slot details.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingOverview {
    pub id: i64,
    pub status_id: i16,
    pub client_name: String,
    pub client_email: String,
    pub studio_name: String,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

/// Fully-joined booking loaded at the start of a status transition: the
/// client and slot details feed the notification and confirmation email.
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetail {
    pub id: i64,
    pub client_id: i64,
    pub studio_id: i64,
    pub schedule_id: i64,
    pub status_id: i16,
    pub client_name: String,
    pub client_email: String,
    pub studio_name: String,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn pending_can_confirm_or_cancel() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn confirmed_can_cancel_or_complete() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn archive_allowed_from_any_state_but_archived() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Archived));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Archived));
        assert!(BookingStatus::Completed.can_transition_to(BookingStatus::Archived));
        // archiving a cancelled booking is the usual housekeeping case
        assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Archived));
        assert!(!BookingStatus::Archived.can_transition_to(BookingStatus::Archived));
    }

    #[test]
    fn cancelled_and_archived_cannot_be_reopened() {
        for next in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert!(!BookingStatus::Cancelled.can_transition_to(next));
            assert!(!BookingStatus::Archived.can_transition_to(next));
        }
    }

    #[test]
    fn terminal_ids_cover_cancelled_and_archived() {
        assert_eq!(BookingStatus::terminal_ids(), vec![3, 4]);
    }

    #[test]
    fn status_strings_round_trip_and_reject_unknown() {
        assert_eq!(
            BookingStatus::from_str("Confirmed").unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            BookingStatus::from_str("cancelled").unwrap(),
            BookingStatus::Cancelled
        );
        assert!(BookingStatus::from_str("refunded").is_err());
        assert!(BookingStatus::from_str("").is_err());
    }

    #[test]
    fn ids_match_the_lookup_table_seeding() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Archived,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::from_id(status.as_id()), Some(status));
        }
        assert_eq!(BookingStatus::from_id(0), None);
        assert_eq!(BookingStatus::from_id(9), None);
    }
}
