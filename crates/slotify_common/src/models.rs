// --- File: crates/slotify_common/src/models.rs ---

// This file contains data structures and models that are common across the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a bookable slot.
///
/// `Booked` is never set directly by catalog management; it is owned by the
/// reservation engine and means exactly one active reservation references
/// the slot. `Blocked` removes a slot from sale without deleting it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Booked,
    Blocked,
}

impl SlotStatus {
    /// The exact string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(SlotStatus::Available),
            "BOOKED" => Ok(SlotStatus::Booked),
            "BLOCKED" => Ok(SlotStatus::Blocked),
            other => Err(format!("unknown slot status: {other}")),
        }
    }
}

/// Lifecycle state of a reservation.
///
/// Only `Confirmed` reservations keep their slot booked; every other state
/// is bookkeeping. `Completed` and `NoShow` are set by staff after the fact.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    /// The exact string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            "NO_SHOW" => Ok(ReservationStatus::NoShow),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// Represents a bookable time slot owned by one staff member.
///
/// Dates are `YYYY-MM-DD`, times `HH:MM`; both are carried as strings so the
/// wire format and the stored format stay identical. `(staff_id, slot_date,
/// start_time)` is unique.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// The unique identifier for this slot
    pub id: i64,

    /// The staff member owning this slot
    pub staff_id: String,

    /// The calendar day, `YYYY-MM-DD`
    pub slot_date: String,

    /// Start of the slot, `HH:MM`
    pub start_time: String,

    /// End of the slot, `HH:MM`
    pub end_time: String,

    /// Current lifecycle state
    pub status: SlotStatus,

    /// RFC 3339 timestamp written when the row was created
    pub created_at: String,
}

/// Represents a reservation held against one slot.
///
/// The access code is the bearer credential for self-service cancel and
/// rebook. It rotates on every successful rebook, invalidating the old one.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// The unique identifier for this reservation
    pub id: i64,

    /// The slot this reservation currently holds
    pub slot_id: i64,

    /// Owner of that slot, denormalized for listing
    pub staff_id: String,

    /// Rotating bearer credential, 32 lowercase hex chars
    pub access_code: String,

    /// Customer contact details
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,

    /// Number of people attending, at least 1
    pub headcount: i64,

    /// Free-form note from the customer
    pub notes: Option<String>,

    /// Current lifecycle state
    pub status: ReservationStatus,

    /// RFC 3339 timestamp written when the row was created
    pub created_at: String,

    /// RFC 3339 timestamp of cancellation, when cancelled
    pub cancelled_at: Option<String>,
}

/// Represents one key/value row of the configuration store.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// The setting key
    pub key: String,

    /// The stored value; always a string, parsed by typed accessors
    pub value: String,

    /// Optional operator-facing description
    pub description: Option<String>,
}
