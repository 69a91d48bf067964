// --- File: crates/slotify_booking/src/handlers.rs ---
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::logic::{
    cancel_booking, check_booking, create_booking, list_bookings, rebook_booking,
    set_booking_status, BookingCheckResponse, BookingResponse, CancelBookingRequest,
    CreateBookingRequest, ListBookingsQuery, RebookBookingRequest, RebookResponse,
    UpdateBookingStatusRequest, UpdatedBookingResponse,
};
use crate::notify::{build_notice, dispatch, BookingEvent, SharedNotifier};
use slotify_common::models::ReservationStatus;
use slotify_common::{ApiError, Role};
use slotify_db::reservations::ReservationRecord;
use slotify_db::DbClient;
use slotify_settings::SettingsStore;

// --- State for Booking Handlers ---
#[derive(Clone)]
pub struct BookingState {
    pub db: DbClient,
    pub settings: Arc<SettingsStore>,
    pub notifier: SharedNotifier,
}

/// Axum handler creating a reservation on an available slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings", // Path relative to /api
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Reservation created", body = BookingResponse),
        (status = 400, description = "Malformed customer details"),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot taken, booking disabled, notice too short or limit reached")
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let response = create_booking(&state.db, &state.settings, &payload).await?;
    dispatch(
        &state.notifier,
        BookingEvent::Confirmed,
        build_notice(&response.reservation, &response.slot, None),
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// Axum handler cancelling a reservation by access code.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings/cancel", // Path relative to /api
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Reservation cancelled, slot freed", body = BookingResponse),
        (status = 404, description = "Unknown access code"),
        (status = 409, description = "Already cancelled, cancellation disabled or notice too short")
    ),
    tag = "Bookings"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let response = cancel_booking(&state.db, &state.settings, &payload).await?;
    dispatch(
        &state.notifier,
        BookingEvent::Cancelled,
        build_notice(&response.reservation, &response.slot, None),
    );
    Ok(Json(response))
}

/// Axum handler moving a reservation to a different slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings/rebook", // Path relative to /api
    request_body = RebookBookingRequest,
    responses(
        (status = 200, description = "Reservation moved, access code rotated", body = RebookResponse),
        (status = 404, description = "Unknown access code or slot"),
        (status = 409, description = "New slot taken, same slot, rebooking disabled or notice too short")
    ),
    tag = "Bookings"
))]
pub async fn rebook_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<RebookBookingRequest>,
) -> Result<Json<RebookResponse>, ApiError> {
    let response = rebook_booking(&state.db, &state.settings, &payload).await?;
    dispatch(
        &state.notifier,
        BookingEvent::Rebooked,
        build_notice(
            &response.reservation,
            &response.slot,
            Some(&response.previous_slot),
        ),
    );
    Ok(Json(response))
}

/// Axum handler for the public access code lookup.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings/check/{code}", // Path relative to /api
    params(("code" = String, Path, description = "Reservation access code")),
    responses(
        (status = 200, description = "Reservation summary", body = BookingCheckResponse),
        (status = 404, description = "Unknown access code")
    ),
    tag = "Bookings"
))]
pub async fn check_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(code): Path<String>,
) -> Result<Json<BookingCheckResponse>, ApiError> {
    let response = check_booking(&state.db, &state.settings, &code).await?;
    Ok(Json(response))
}

/// Axum handler listing reservations for staff and admins.
///
/// Staff keys only ever see their own reservations, whatever the query
/// says.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings", // Path relative to /api
    params(
        ("staff_id" = Option<String>, Query, description = "Only reservations owned by this staff member"),
        ("status" = Option<String>, Query, description = "Only reservations in this status"),
        ("date_from" = Option<String>, Query, description = "Only slots on or after this day (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "Only slots on or before this day (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Matching reservations", body = [ReservationRecord]),
        (status = 401, description = "Missing or invalid API key")
    ),
    tag = "Bookings"
))]
pub async fn list_bookings_handler(
    State(state): State<Arc<BookingState>>,
    Extension(role): Extension<Role>,
    Query(mut query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<ReservationRecord>>, ApiError> {
    if let Role::Staff(staff_id) = &role {
        query.staff_id = Some(staff_id.clone());
    }
    let records = list_bookings(&state.db, &query).await?;
    Ok(Json(records))
}

/// Axum handler for the administrative status transition.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/bookings/{id}/status", // Path relative to /api
    params(("id" = i64, Path, description = "Reservation id")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Updated reservation", body = UpdatedBookingResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Already in this status or freed slot taken")
    ),
    tag = "Bookings"
))]
pub async fn update_booking_status_handler(
    State(state): State<Arc<BookingState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<UpdatedBookingResponse>, ApiError> {
    role.require_admin()?;
    let response = set_booking_status(&state.db, id, payload.status).await?;
    if payload.status == ReservationStatus::Cancelled {
        if let Some(slot) = &response.slot {
            dispatch(
                &state.notifier,
                BookingEvent::Cancelled,
                build_notice(&response.reservation, slot, None),
            );
        }
    }
    Ok(Json(response))
}
