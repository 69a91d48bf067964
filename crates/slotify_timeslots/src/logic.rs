// --- File: crates/slotify_timeslots/src/logic.rs ---
//! Core logic for managing the staff time slot catalog.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use slotify_common::models::{Slot, SlotStatus};
use slotify_common::ApiError;
use slotify_db::{slots as slots_repo, DbClient, DbError};
use slotify_settings::{SettingsError, SettingsStore};
use thiserror::Error;
use tracing::info;

/// Time slot specific error types.
#[derive(Error, Debug)]
pub enum TimeslotsError {
    /// No slot with this id exists
    #[error("Time slot {0} not found")]
    NotFound(i64),

    /// Another slot already occupies this (owner, date, start) key
    #[error("A slot for this staff member, date and start time already exists")]
    DuplicateSlot,

    /// The slot carries an active booking and cannot be changed
    #[error("Time slot {0} has an active booking")]
    SlotBooked(i64),

    /// Malformed input, rejected before touching storage
    #[error("{0}")]
    Validation(String),

    /// Settings lookup failed
    #[error("Settings lookup failed: {0}")]
    Settings(#[from] SettingsError),

    /// Database access failed
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl From<TimeslotsError> for ApiError {
    fn from(err: TimeslotsError) -> Self {
        match err {
            TimeslotsError::NotFound(id) => {
                ApiError::not_found("slot_not_found", format!("Time slot {id} not found"))
            }
            TimeslotsError::DuplicateSlot => ApiError::conflict(
                "slot_exists",
                "A slot for this staff member, date and start time already exists",
            ),
            TimeslotsError::SlotBooked(id) => ApiError::conflict(
                "slot_booked",
                format!("Time slot {id} has an active booking"),
            ),
            TimeslotsError::Validation(msg) => ApiError::validation(msg),
            TimeslotsError::Settings(e) => e.into(),
            TimeslotsError::Db(e) => ApiError::internal(e.to_string()),
        }
    }
}

// --- Request/Response Structures ---

/// Request body for creating a single slot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateSlotRequest {
    /// Owning staff member
    pub staff_id: String,
    /// Day of the slot (YYYY-MM-DD)
    pub slot_date: String,
    /// Start of the window (HH:MM)
    pub start_time: String,
    /// End of the window (HH:MM)
    pub end_time: String,
}

/// One start/end pair inside a bulk request.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlotWindow {
    pub start_time: String,
    pub end_time: String,
}

/// Request body for creating many slots on one day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkCreateSlotsRequest {
    pub staff_id: String,
    pub slot_date: String,
    pub slots: Vec<SlotWindow>,
}

/// Request body for generating slots by tiling a day window.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateSlotsRequest {
    pub staff_id: String,
    pub slot_date: String,
    /// Start of the day window (HH:MM)
    pub day_start: String,
    /// End of the day window (HH:MM)
    pub day_end: String,
    /// Slot length in minutes, defaults to the `slot_length_minutes` setting
    pub slot_minutes: Option<i64>,
    /// Gap between slots in minutes, defaults to the `slot_buffer_minutes` setting
    pub buffer_minutes: Option<i64>,
}

/// Outcome of a bulk or generated creation run.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkCreateSlotsResponse {
    /// Slots actually inserted by this call
    pub created: usize,
    /// Slots skipped because their (owner, date, start) key already existed
    pub skipped: usize,
}

/// Request body for switching a slot between AVAILABLE and BLOCKED.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateSlotRequest {
    pub status: SlotStatus,
}

/// Query parameters for the public slot listing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSlotsQuery {
    pub staff_id: Option<String>,
    pub date: Option<String>,
    pub free_only: Option<bool>,
}

/// Acknowledgement returned after deleting a slot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteSlotResponse {
    pub id: i64,
    pub deleted: bool,
}

// --- Validation helpers ---

/// Parses a HH:MM string, normalizing it for storage.
pub fn parse_time(label: &str, value: &str) -> Result<NaiveTime, TimeslotsError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        TimeslotsError::Validation(format!("{label} must be a HH:MM time, got {value:?}"))
    })
}

/// Parses a YYYY-MM-DD string, normalizing it for storage.
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeslotsError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        TimeslotsError::Validation(format!("slot_date must be a YYYY-MM-DD date, got {value:?}"))
    })
}

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn format_minutes(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Tiles the `[day_start, day_end)` window into fixed-length segments
/// separated by `buffer_minutes`. Segments that would overrun the window
/// are not emitted. Callers validate the window and lengths first.
pub fn tile_windows(
    day_start: NaiveTime,
    day_end: NaiveTime,
    slot_minutes: i64,
    buffer_minutes: i64,
) -> Vec<(String, String)> {
    let end_min = minutes_of(day_end);
    let mut cursor = minutes_of(day_start);
    let mut windows = Vec::new();

    // Checked arithmetic: a slot length near i64::MAX must yield no
    // windows, not wrap the cursor.
    while let Some(slot_end) = cursor.checked_add(slot_minutes) {
        if slot_end > end_min {
            break;
        }
        windows.push((format_minutes(cursor), format_minutes(slot_end)));
        match slot_end.checked_add(buffer_minutes) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    windows
}

// --- Core Logic Functions ---

/// Creates a single slot, enforcing the (owner, date, start) uniqueness.
pub async fn create_slot(
    db: &DbClient,
    req: &CreateSlotRequest,
) -> Result<Slot, TimeslotsError> {
    if req.staff_id.trim().is_empty() {
        return Err(TimeslotsError::Validation(
            "staff_id must not be empty".to_string(),
        ));
    }
    let date = parse_date(&req.slot_date)?;
    let start = parse_time("start_time", &req.start_time)?;
    let end = parse_time("end_time", &req.end_time)?;
    if end <= start {
        return Err(TimeslotsError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }

    let slot = slots_repo::insert_slot(
        db.pool(),
        &req.staff_id,
        &date.format("%Y-%m-%d").to_string(),
        &start.format("%H:%M").to_string(),
        &end.format("%H:%M").to_string(),
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            TimeslotsError::DuplicateSlot
        } else {
            TimeslotsError::Db(e)
        }
    })?;

    info!(
        "Created slot {} for {} on {} at {}",
        slot.id, slot.staff_id, slot.slot_date, slot.start_time
    );
    Ok(slot)
}

/// Upserts a list of windows for one day and owner inside one transaction.
///
/// Windows whose (owner, date, start) key already exists are skipped, so
/// re-running the same request is harmless.
pub async fn bulk_create_slots(
    db: &DbClient,
    req: &BulkCreateSlotsRequest,
) -> Result<BulkCreateSlotsResponse, TimeslotsError> {
    if req.staff_id.trim().is_empty() {
        return Err(TimeslotsError::Validation(
            "staff_id must not be empty".to_string(),
        ));
    }
    let date = parse_date(&req.slot_date)?;
    let mut windows = Vec::with_capacity(req.slots.len());
    for window in &req.slots {
        let start = parse_time("start_time", &window.start_time)?;
        let end = parse_time("end_time", &window.end_time)?;
        if end <= start {
            return Err(TimeslotsError::Validation(format!(
                "window {} to {} is inverted",
                window.start_time, window.end_time
            )));
        }
        windows.push((
            start.format("%H:%M").to_string(),
            end.format("%H:%M").to_string(),
        ));
    }

    upsert_windows(db, &req.staff_id, &date.format("%Y-%m-%d").to_string(), &windows).await
}

/// Derives a window list by tiling the day and upserts it like
/// [`bulk_create_slots`]. Slot length and buffer fall back to the
/// `slot_length_minutes` and `slot_buffer_minutes` settings.
pub async fn generate_slots(
    db: &DbClient,
    settings: &SettingsStore,
    req: &GenerateSlotsRequest,
) -> Result<BulkCreateSlotsResponse, TimeslotsError> {
    if req.staff_id.trim().is_empty() {
        return Err(TimeslotsError::Validation(
            "staff_id must not be empty".to_string(),
        ));
    }
    let date = parse_date(&req.slot_date)?;
    let day_start = parse_time("day_start", &req.day_start)?;
    let day_end = parse_time("day_end", &req.day_end)?;
    if day_end <= day_start {
        return Err(TimeslotsError::Validation(
            "day_end must be after day_start".to_string(),
        ));
    }

    let slot_minutes = match req.slot_minutes {
        Some(v) => v,
        None => settings.get_i64("slot_length_minutes").await?,
    };
    let buffer_minutes = match req.buffer_minutes {
        Some(v) => v,
        None => settings.get_i64("slot_buffer_minutes").await?,
    };
    if slot_minutes < 1 {
        return Err(TimeslotsError::Validation(
            "slot_minutes must be at least 1".to_string(),
        ));
    }
    if buffer_minutes < 0 {
        return Err(TimeslotsError::Validation(
            "buffer_minutes must not be negative".to_string(),
        ));
    }
    // The tiled window lives inside one day, so a stride past 24h can
    // never produce a slot.
    match slot_minutes.checked_add(buffer_minutes) {
        Some(stride) if stride <= 24 * 60 => {}
        _ => {
            return Err(TimeslotsError::Validation(
                "slot_minutes plus buffer_minutes must fit within one day".to_string(),
            ));
        }
    }

    let windows = tile_windows(day_start, day_end, slot_minutes, buffer_minutes);
    upsert_windows(db, &req.staff_id, &date.format("%Y-%m-%d").to_string(), &windows).await
}

async fn upsert_windows(
    db: &DbClient,
    staff_id: &str,
    slot_date: &str,
    windows: &[(String, String)],
) -> Result<BulkCreateSlotsResponse, TimeslotsError> {
    let mut tx = db.begin().await?;
    let mut created = 0;
    let mut skipped = 0;
    for (start, end) in windows {
        if slots_repo::insert_slot_if_absent(&mut *tx, staff_id, slot_date, start, end).await? {
            created += 1;
        } else {
            skipped += 1;
        }
    }
    tx.commit().await.map_err(DbError::from)?;

    info!(
        "Slot upsert for {} on {}: {} created, {} skipped",
        staff_id, slot_date, created, skipped
    );
    Ok(BulkCreateSlotsResponse { created, skipped })
}

/// Loads a slot or fails with not-found.
pub async fn require_slot(db: &DbClient, id: i64) -> Result<Slot, TimeslotsError> {
    slots_repo::find_slot_by_id(db.pool(), id)
        .await?
        .ok_or(TimeslotsError::NotFound(id))
}

/// Switches a slot between AVAILABLE and BLOCKED.
///
/// BOOKED is never a valid target here, bookings own that transition. The
/// update is conditional on the status the caller observed, so a slot
/// that gets booked concurrently is reported as a conflict instead of
/// being silently overwritten.
pub async fn set_slot_availability(
    db: &DbClient,
    slot: Slot,
    target: SlotStatus,
) -> Result<Slot, TimeslotsError> {
    if target == SlotStatus::Booked {
        return Err(TimeslotsError::Validation(
            "status must be AVAILABLE or BLOCKED".to_string(),
        ));
    }
    if slot.status == SlotStatus::Booked {
        return Err(TimeslotsError::SlotBooked(slot.id));
    }

    let updated = slots_repo::set_slot_status_if(db.pool(), slot.id, slot.status, target).await?;
    if !updated {
        return Err(TimeslotsError::SlotBooked(slot.id));
    }

    Ok(Slot {
        status: target,
        ..slot
    })
}

/// Deletes a slot unless it carries an active booking.
pub async fn delete_slot(db: &DbClient, slot: &Slot) -> Result<(), TimeslotsError> {
    if slot.status == SlotStatus::Booked {
        return Err(TimeslotsError::SlotBooked(slot.id));
    }
    let deleted = slots_repo::delete_slot_if_not_booked(db.pool(), slot.id).await?;
    if !deleted {
        return Err(TimeslotsError::SlotBooked(slot.id));
    }
    info!("Deleted slot {}", slot.id);
    Ok(())
}

/// Lists slots for the public catalog view.
pub async fn list_slots(
    db: &DbClient,
    query: &ListSlotsQuery,
) -> Result<Vec<Slot>, TimeslotsError> {
    let slots = slots_repo::list_slots(
        db.pool(),
        query.staff_id.as_deref(),
        query.date.as_deref(),
        query.free_only.unwrap_or(false),
    )
    .await?;
    Ok(slots)
}
