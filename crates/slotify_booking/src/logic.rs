// --- File: crates/slotify_booking/src/logic.rs ---
//! Core logic for the reservation engine.
//!
//! Every state-changing operation runs its precondition checks and writes
//! inside one transaction. Business failures roll the transaction back, so
//! a slot and its reservation always change together. Slot availability is
//! claimed with a conditional update, which is what keeps two concurrent
//! requests from booking the same slot regardless of what they read
//! earlier in their own transaction.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotify_common::models::{Reservation, ReservationStatus, Slot, SlotStatus};
use slotify_common::ApiError;
use slotify_db::reservations::{NewReservationRow, ReservationListFilter, ReservationRecord};
use slotify_db::{reservations as reservations_repo, slots as slots_repo, DbClient, DbError};
use slotify_settings::{SettingsError, SettingsStore};
use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Bounded retries for transactions that fail on serialization conflicts.
const MAX_TX_ATTEMPTS: u32 = 3;
/// Base backoff between retries, multiplied by the attempt number.
const RETRY_BACKOFF_MS: u64 = 50;

/// Reservation engine specific error types.
#[derive(Error, Debug)]
pub enum BookingError {
    /// No reservation matches the given access code or id
    #[error("Reservation not found")]
    ReservationNotFound,

    /// No slot with this id exists
    #[error("Time slot {0} not found")]
    SlotNotFound(i64),

    /// The target slot is not AVAILABLE
    #[error("Time slot {0} is already taken")]
    SlotAlreadyBooked(i64),

    /// The reservation was cancelled earlier
    #[error("Reservation is already cancelled")]
    AlreadyCancelled,

    /// The reservation is already in the requested state
    #[error("Reservation is already {0}")]
    AlreadyInStatus(ReservationStatus),

    /// Rebooking onto the slot the reservation already holds
    #[error("Reservation already holds this slot")]
    SameSlot,

    /// The booking_enabled gate is off
    #[error("Booking is currently disabled")]
    BookingDisabled,

    /// The cancellation_enabled gate is off
    #[error("Cancellation is currently disabled")]
    CancellationDisabled,

    /// The rebooking_enabled gate is off
    #[error("Rebooking is currently disabled")]
    RebookingDisabled,

    /// The slot starts too soon for this operation
    #[error("This operation requires at least {0} hours of notice")]
    NoticeTooShort(i64),

    /// The customer already holds the maximum number of active bookings
    #[error("No more than {0} active bookings are allowed per customer")]
    BookingLimitReached(i64),

    /// Malformed input, rejected before any transaction opens
    #[error("{0}")]
    Validation(String),

    /// A stored row holds a date or time that no longer parses
    #[error("Stored slot data is malformed: {0}")]
    CorruptSlot(String),

    /// Settings lookup failed
    #[error("Settings lookup failed: {0}")]
    Settings(#[from] SettingsError),

    /// Database access failed
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ReservationNotFound => {
                ApiError::not_found("reservation_not_found", "Reservation not found")
            }
            BookingError::SlotNotFound(id) => {
                ApiError::not_found("slot_not_found", format!("Time slot {id} not found"))
            }
            BookingError::SlotAlreadyBooked(id) => ApiError::conflict(
                "slot_already_booked",
                format!("Time slot {id} is already taken"),
            ),
            BookingError::AlreadyCancelled => {
                ApiError::conflict("already_cancelled", "Reservation is already cancelled")
            }
            BookingError::AlreadyInStatus(status) => ApiError::conflict(
                "already_in_status",
                format!("Reservation is already {status}"),
            ),
            BookingError::SameSlot => {
                ApiError::conflict("same_slot", "Reservation already holds this slot")
            }
            BookingError::BookingDisabled => {
                ApiError::conflict("booking_disabled", "Booking is currently disabled")
            }
            BookingError::CancellationDisabled => {
                ApiError::conflict("cancellation_disabled", "Cancellation is currently disabled")
            }
            BookingError::RebookingDisabled => {
                ApiError::conflict("rebooking_disabled", "Rebooking is currently disabled")
            }
            BookingError::NoticeTooShort(hours) => ApiError::conflict(
                "notice_too_short",
                format!("This operation requires at least {hours} hours of notice"),
            ),
            BookingError::BookingLimitReached(limit) => ApiError::conflict(
                "booking_limit_reached",
                format!("No more than {limit} active bookings are allowed per customer"),
            ),
            BookingError::Validation(msg) => ApiError::validation(msg),
            BookingError::CorruptSlot(msg) => ApiError::internal(msg),
            BookingError::Settings(e) => e.into(),
            BookingError::Db(e) => ApiError::internal(e.to_string()),
        }
    }
}

// --- Request/Response Structures ---

/// Request body for creating a reservation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBookingRequest {
    /// The slot to claim
    pub slot_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Number of people attending, defaults to 1
    pub headcount: Option<i64>,
    pub notes: Option<String>,
}

/// Request body for cancelling a reservation by access code.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CancelBookingRequest {
    pub access_code: String,
}

/// Request body for moving a reservation to another slot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RebookBookingRequest {
    pub access_code: String,
    pub new_slot_id: i64,
}

/// Request body for the administrative status transition.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateBookingStatusRequest {
    pub status: ReservationStatus,
}

/// A reservation together with the slot it holds.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub reservation: Reservation,
    pub slot: Slot,
}

/// A rebooked reservation with its new and previous slots.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct RebookResponse {
    pub reservation: Reservation,
    pub slot: Slot,
    pub previous_slot: Slot,
}

/// Outcome of an administrative status transition.
///
/// The slot is absent when the reservation no longer references an
/// existing slot, which can happen after its freed slot was deleted.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct UpdatedBookingResponse {
    pub reservation: Reservation,
    pub slot: Option<Slot>,
}

/// What the holder of an access code may still do.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct AllowedActions {
    pub cancellable: bool,
    pub rebookable: bool,
}

/// Reservation summary returned by the access code lookup.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct BookingCheckResponse {
    pub reservation: Reservation,
    pub slot: Option<Slot>,
    pub allowed_actions: AllowedActions,
}

/// Query parameters for the staff/admin reservation listing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub staff_id: Option<String>,
    pub status: Option<ReservationStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

// --- Helpers ---

/// Generates a fresh access code: 32 hex characters from a random UUID.
pub fn generate_access_code() -> String {
    Uuid::new_v4().simple().to_string()
}

fn slot_start_utc(slot: &Slot) -> Result<DateTime<Utc>, BookingError> {
    let date = NaiveDate::parse_from_str(&slot.slot_date, "%Y-%m-%d")
        .map_err(|e| BookingError::CorruptSlot(format!("slot {} date: {e}", slot.id)))?;
    let time = NaiveTime::parse_from_str(&slot.start_time, "%H:%M")
        .map_err(|e| BookingError::CorruptSlot(format!("slot {} start: {e}", slot.id)))?;
    Ok(date.and_time(time).and_utc())
}

/// Fails unless the slot starts at least `notice_hours` from now.
fn check_notice(slot: &Slot, notice_hours: i64) -> Result<(), BookingError> {
    if notice_hours <= 0 {
        return Ok(());
    }
    let start = slot_start_utc(slot)?;
    if start < Utc::now() + ChronoDuration::hours(notice_hours) {
        return Err(BookingError::NoticeTooShort(notice_hours));
    }
    Ok(())
}

/// Retries `op` when it fails on a retryable database error.
///
/// Serialization failures and lock timeouts are transient under
/// contention. A request that keeps failing after the bounded retries is
/// surfaced as an error rather than an ambiguous outcome.
async fn with_retry<T, F, Fut>(mut op: F) -> Result<T, BookingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BookingError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Err(BookingError::Db(e)) if e.is_retryable() && attempt < MAX_TX_ATTEMPTS => {
                warn!("Retrying transaction after attempt {}: {}", attempt, e);
                tokio::time::sleep(std::time::Duration::from_millis(
                    RETRY_BACKOFF_MS * u64::from(attempt),
                ))
                .await;
            }
            other => return other,
        }
    }
}

// --- Core Logic Functions ---

/// Creates a reservation on an AVAILABLE slot.
///
/// Input validation happens before any transaction opens. The slot is
/// claimed with a conditional AVAILABLE to BOOKED update, so of any
/// number of concurrent attempts exactly one can commit.
pub async fn create_booking(
    db: &DbClient,
    settings: &SettingsStore,
    req: &CreateBookingRequest,
) -> Result<BookingResponse, BookingError> {
    let headcount = req.headcount.unwrap_or(1);
    if req.customer_name.trim().is_empty() {
        return Err(BookingError::Validation(
            "customer_name must not be empty".to_string(),
        ));
    }
    if !req.customer_email.contains('@') {
        return Err(BookingError::Validation(
            "customer_email must be an email address".to_string(),
        ));
    }
    if headcount < 1 {
        return Err(BookingError::Validation(
            "headcount must be at least 1".to_string(),
        ));
    }

    if !settings.get_bool("booking_enabled").await? {
        return Err(BookingError::BookingDisabled);
    }
    let min_notice = settings.get_i64("min_notice_hours").await?;
    let max_active = settings.get_i64("max_active_bookings").await?;

    let response = with_retry(|| async move {
        let mut tx = db.begin().await?;

        let slot = slots_repo::find_slot_by_id(&mut *tx, req.slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(req.slot_id))?;
        check_notice(&slot, min_notice)?;

        if max_active > 0 {
            let held =
                reservations_repo::count_confirmed_by_email(&mut *tx, req.customer_email.trim())
                    .await?;
            if held >= max_active {
                return Err(BookingError::BookingLimitReached(max_active));
            }
        }

        if slot.status != SlotStatus::Available
            || !slots_repo::set_slot_status_if(
                &mut *tx,
                slot.id,
                SlotStatus::Available,
                SlotStatus::Booked,
            )
            .await?
        {
            return Err(BookingError::SlotAlreadyBooked(slot.id));
        }

        let row = NewReservationRow {
            slot_id: slot.id,
            staff_id: slot.staff_id.clone(),
            access_code: generate_access_code(),
            customer_name: req.customer_name.trim().to_string(),
            customer_email: req.customer_email.trim().to_string(),
            customer_phone: req.customer_phone.clone(),
            headcount,
            notes: req.notes.clone(),
        };
        let reservation = reservations_repo::insert_reservation(&mut *tx, &row).await?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(BookingResponse {
            reservation,
            slot: Slot {
                status: SlotStatus::Booked,
                ..slot
            },
        })
    })
    .await?;

    info!(
        "Created reservation {} on slot {} for {}",
        response.reservation.id, response.slot.id, response.reservation.customer_email
    );
    Ok(response)
}

/// Cancels a reservation by access code and frees its slot.
pub async fn cancel_booking(
    db: &DbClient,
    settings: &SettingsStore,
    req: &CancelBookingRequest,
) -> Result<BookingResponse, BookingError> {
    if !settings.get_bool("cancellation_enabled").await? {
        return Err(BookingError::CancellationDisabled);
    }
    let cancel_notice = settings.get_i64("cancel_notice_hours").await?;

    let response = with_retry(|| async move {
        let mut tx = db.begin().await?;

        let reservation = reservations_repo::find_reservation_by_code(&mut *tx, &req.access_code)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;
        match reservation.status {
            ReservationStatus::Confirmed => {}
            ReservationStatus::Cancelled => return Err(BookingError::AlreadyCancelled),
            other => return Err(BookingError::AlreadyInStatus(other)),
        }

        let slot = slots_repo::find_slot_by_id(&mut *tx, reservation.slot_id)
            .await?
            .ok_or_else(|| {
                BookingError::CorruptSlot(format!(
                    "reservation {} references missing slot {}",
                    reservation.id, reservation.slot_id
                ))
            })?;
        check_notice(&slot, cancel_notice)?;

        if !reservations_repo::mark_reservation_cancelled(&mut *tx, reservation.id).await? {
            return Err(BookingError::ReservationNotFound);
        }
        if !slots_repo::set_slot_status_if(
            &mut *tx,
            slot.id,
            SlotStatus::Booked,
            SlotStatus::Available,
        )
        .await?
        {
            return Err(BookingError::CorruptSlot(format!(
                "slot {} was not BOOKED while reservation {} was CONFIRMED",
                slot.id, reservation.id
            )));
        }

        let updated = reservations_repo::find_reservation_by_id(&mut *tx, reservation.id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(BookingResponse {
            reservation: updated,
            slot: Slot {
                status: SlotStatus::Available,
                ..slot
            },
        })
    })
    .await?;

    info!(
        "Cancelled reservation {} and freed slot {}",
        response.reservation.id, response.slot.id
    );
    Ok(response)
}

/// Moves a reservation to a different AVAILABLE slot and rotates its
/// access code. The old code becomes invalid the moment this commits.
pub async fn rebook_booking(
    db: &DbClient,
    settings: &SettingsStore,
    req: &RebookBookingRequest,
) -> Result<RebookResponse, BookingError> {
    if !settings.get_bool("rebooking_enabled").await? {
        return Err(BookingError::RebookingDisabled);
    }
    let min_notice = settings.get_i64("min_notice_hours").await?;

    let response = with_retry(|| async move {
        let mut tx = db.begin().await?;

        let reservation = reservations_repo::find_reservation_by_code(&mut *tx, &req.access_code)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;
        match reservation.status {
            ReservationStatus::Confirmed => {}
            ReservationStatus::Cancelled => return Err(BookingError::AlreadyCancelled),
            other => return Err(BookingError::AlreadyInStatus(other)),
        }

        let new_slot = slots_repo::find_slot_by_id(&mut *tx, req.new_slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(req.new_slot_id))?;
        if new_slot.id == reservation.slot_id {
            return Err(BookingError::SameSlot);
        }
        check_notice(&new_slot, min_notice)?;

        if new_slot.status != SlotStatus::Available
            || !slots_repo::set_slot_status_if(
                &mut *tx,
                new_slot.id,
                SlotStatus::Available,
                SlotStatus::Booked,
            )
            .await?
        {
            return Err(BookingError::SlotAlreadyBooked(new_slot.id));
        }

        let old_slot = slots_repo::find_slot_by_id(&mut *tx, reservation.slot_id)
            .await?
            .ok_or_else(|| {
                BookingError::CorruptSlot(format!(
                    "reservation {} references missing slot {}",
                    reservation.id, reservation.slot_id
                ))
            })?;
        if !slots_repo::set_slot_status_if(
            &mut *tx,
            old_slot.id,
            SlotStatus::Booked,
            SlotStatus::Available,
        )
        .await?
        {
            return Err(BookingError::CorruptSlot(format!(
                "slot {} was not BOOKED while reservation {} was CONFIRMED",
                old_slot.id, reservation.id
            )));
        }

        let new_code = generate_access_code();
        if !reservations_repo::move_reservation(
            &mut *tx,
            reservation.id,
            new_slot.id,
            &new_slot.staff_id,
            &new_code,
        )
        .await?
        {
            return Err(BookingError::ReservationNotFound);
        }
        let updated = reservations_repo::find_reservation_by_id(&mut *tx, reservation.id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(RebookResponse {
            reservation: updated,
            slot: Slot {
                status: SlotStatus::Booked,
                ..new_slot
            },
            previous_slot: Slot {
                status: SlotStatus::Available,
                ..old_slot
            },
        })
    })
    .await?;

    info!(
        "Rebooked reservation {} from slot {} to slot {}",
        response.reservation.id, response.previous_slot.id, response.slot.id
    );
    Ok(response)
}

/// Administrative status transition, without access code checks.
///
/// Setting CANCELLED frees the slot like a customer cancel does. Setting
/// CONFIRMED on a cancelled reservation claims its slot again and fails
/// with a conflict when someone else took it in between. COMPLETED and
/// NO_SHOW are bookkeeping writes that leave the slot alone; a cancelled
/// reservation no longer holds its slot, so it can only come back through
/// CONFIRMED.
pub async fn set_booking_status(
    db: &DbClient,
    id: i64,
    target: ReservationStatus,
) -> Result<UpdatedBookingResponse, BookingError> {
    let response = with_retry(|| async move {
        let mut tx = db.begin().await?;

        let reservation = reservations_repo::find_reservation_by_id(&mut *tx, id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;
        if reservation.status == target {
            return Err(BookingError::AlreadyInStatus(target));
        }

        let mut slot = slots_repo::find_slot_by_id(&mut *tx, reservation.slot_id).await?;

        match target {
            ReservationStatus::Cancelled => {
                if !reservations_repo::mark_reservation_cancelled(&mut *tx, reservation.id).await?
                {
                    return Err(BookingError::ReservationNotFound);
                }
                if let Some(current) = slot.take() {
                    let freed = slots_repo::set_slot_status_if(
                        &mut *tx,
                        current.id,
                        SlotStatus::Booked,
                        SlotStatus::Available,
                    )
                    .await?;
                    slot = Some(if freed {
                        Slot {
                            status: SlotStatus::Available,
                            ..current
                        }
                    } else {
                        current
                    });
                }
            }
            ReservationStatus::Confirmed if reservation.status == ReservationStatus::Cancelled => {
                let current = slot.take().ok_or(BookingError::SlotNotFound(reservation.slot_id))?;
                if current.status != SlotStatus::Available
                    || !slots_repo::set_slot_status_if(
                        &mut *tx,
                        current.id,
                        SlotStatus::Available,
                        SlotStatus::Booked,
                    )
                    .await?
                {
                    return Err(BookingError::SlotAlreadyBooked(current.id));
                }
                if !reservations_repo::reinstate_reservation(&mut *tx, reservation.id).await? {
                    return Err(BookingError::ReservationNotFound);
                }
                slot = Some(Slot {
                    status: SlotStatus::Booked,
                    ..current
                });
            }
            _ if reservation.status == ReservationStatus::Cancelled => {
                return Err(BookingError::AlreadyCancelled);
            }
            _ => {
                if !reservations_repo::set_reservation_status(&mut *tx, reservation.id, target)
                    .await?
                {
                    return Err(BookingError::ReservationNotFound);
                }
            }
        }

        let updated = reservations_repo::find_reservation_by_id(&mut *tx, reservation.id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(UpdatedBookingResponse {
            reservation: updated,
            slot,
        })
    })
    .await?;

    info!(
        "Set reservation {} to {}",
        response.reservation.id, response.reservation.status
    );
    Ok(response)
}

/// Looks up a reservation by its access code.
pub async fn check_booking(
    db: &DbClient,
    settings: &SettingsStore,
    access_code: &str,
) -> Result<BookingCheckResponse, BookingError> {
    let reservation = reservations_repo::find_reservation_by_code(db.pool(), access_code)
        .await?
        .ok_or(BookingError::ReservationNotFound)?;
    let slot = slots_repo::find_slot_by_id(db.pool(), reservation.slot_id).await?;

    let confirmed = reservation.status == ReservationStatus::Confirmed;
    let cancellable = confirmed
        && settings.get_bool("cancellation_enabled").await?
        && match slot.as_ref() {
            Some(slot) => {
                check_notice(slot, settings.get_i64("cancel_notice_hours").await?).is_ok()
            }
            None => false,
        };
    let rebookable = confirmed && settings.get_bool("rebooking_enabled").await?;

    Ok(BookingCheckResponse {
        reservation,
        slot,
        allowed_actions: AllowedActions {
            cancellable,
            rebookable,
        },
    })
}

/// Lists reservations with slot coordinates for the staff/admin view.
pub async fn list_bookings(
    db: &DbClient,
    query: &ListBookingsQuery,
) -> Result<Vec<ReservationRecord>, BookingError> {
    let filter = ReservationListFilter {
        staff_id: query.staff_id.clone(),
        status: query.status,
        date_from: query.date_from.clone(),
        date_to: query.date_to.clone(),
    };
    let records = reservations_repo::list_reservations(db.pool(), &filter).await?;
    Ok(records)
}
