// --- File: crates/slotify_booking/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AllowedActions, BookingCheckResponse, BookingResponse, CancelBookingRequest,
    CreateBookingRequest, RebookBookingRequest, RebookResponse, UpdateBookingStatusRequest,
    UpdatedBookingResponse,
};
use slotify_common::models::{Reservation, ReservationStatus, Slot, SlotStatus};
use slotify_db::reservations::ReservationRecord;

#[utoipa::path(
    post,
    path = "/bookings", // Path relative to /api
    request_body(content = CreateBookingRequest, example = json!({
        "slot_id": 1,
        "customer_name": "Jane Doe",
        "customer_email": "jane@example.com",
        "customer_phone": "+491701234567",
        "headcount": 2,
        "notes": "window seat please"
    })),
    responses(
        (status = 201, description = "Reservation created", body = BookingResponse),
        (status = 400, description = "Malformed customer details"),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot taken, booking disabled, notice too short or limit reached")
    ),
    tag = "Bookings"
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    post,
    path = "/bookings/cancel", // Path relative to /api
    request_body(content = CancelBookingRequest, example = json!({
        "access_code": "f47ac10b58cc4372a5670e02b2c3d479"
    })),
    responses(
        (status = 200, description = "Reservation cancelled, slot freed", body = BookingResponse),
        (status = 404, description = "Unknown access code"),
        (status = 409, description = "Already cancelled, cancellation disabled or notice too short")
    ),
    tag = "Bookings"
)]
fn doc_cancel_booking_handler() {}

#[utoipa::path(
    post,
    path = "/bookings/rebook", // Path relative to /api
    request_body(content = RebookBookingRequest, example = json!({
        "access_code": "f47ac10b58cc4372a5670e02b2c3d479",
        "new_slot_id": 2
    })),
    responses(
        (status = 200, description = "Reservation moved, access code rotated", body = RebookResponse),
        (status = 404, description = "Unknown access code or slot"),
        (status = 409, description = "New slot taken, same slot, rebooking disabled or notice too short")
    ),
    tag = "Bookings"
)]
fn doc_rebook_booking_handler() {}

#[utoipa::path(
    get,
    path = "/bookings/check/{code}", // Path relative to /api
    params(("code" = String, Path, description = "Reservation access code")),
    responses(
        (status = 200, description = "Reservation summary", body = BookingCheckResponse),
        (status = 404, description = "Unknown access code")
    ),
    tag = "Bookings"
)]
fn doc_check_booking_handler() {}

#[utoipa::path(
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
)]
fn doc_list_bookings_handler() {}

#[utoipa::path(
    patch,
    path = "/bookings/{id}/status", // Path relative to /api
    params(("id" = i64, Path, description = "Reservation id")),
    request_body(content = UpdateBookingStatusRequest, example = json!({
        "status": "COMPLETED"
    })),
    responses(
        (status = 200, description = "Updated reservation", body = UpdatedBookingResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Already in this status or freed slot taken")
    ),
    tag = "Bookings"
)]
fn doc_update_booking_status_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_booking_handler,
        doc_cancel_booking_handler,
        doc_rebook_booking_handler,
        doc_check_booking_handler,
        doc_list_bookings_handler,
        doc_update_booking_status_handler
    ),
    components(
        schemas(
            Reservation,
            ReservationStatus,
            Slot,
            SlotStatus,
            ReservationRecord,
            CreateBookingRequest,
            CancelBookingRequest,
            RebookBookingRequest,
            UpdateBookingStatusRequest,
            BookingResponse,
            RebookResponse,
            UpdatedBookingResponse,
            BookingCheckResponse,
            AllowedActions
        )
    ),
    tags(
        (name = "Bookings", description = "Transactional reservations on staff time slots")
    )
)]
pub struct BookingApiDoc;
