// --- File: crates/slotify_timeslots/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    BulkCreateSlotsRequest, BulkCreateSlotsResponse, CreateSlotRequest, DeleteSlotResponse,
    GenerateSlotsRequest, SlotWindow, UpdateSlotRequest,
};
use slotify_common::models::{Slot, SlotStatus};

#[utoipa::path(
    post,
    path = "/timeslots", // Path relative to /api
    request_body(content = CreateSlotRequest, example = json!({
        "staff_id": "anna",
        "slot_date": "2030-06-01",
        "start_time": "09:00",
        "end_time": "09:30"
    })),
    responses(
        (status = 201, description = "Slot created", body = Slot),
        (status = 400, description = "Malformed date or times"),
        (status = 409, description = "Slot already exists for this owner, date and start")
    ),
    tag = "Timeslots"
)]
fn doc_create_slot_handler() {}

#[utoipa::path(
    post,
    path = "/timeslots/bulk", // Path relative to /api
    request_body(content = BulkCreateSlotsRequest, example = json!({
        "staff_id": "anna",
        "slot_date": "2030-06-01",
        "slots": [
            {"start_time": "09:00", "end_time": "09:30"},
            {"start_time": "10:00", "end_time": "10:30"}
        ]
    })),
    responses(
        (status = 201, description = "Windows upserted", body = BulkCreateSlotsResponse)
    ),
    tag = "Timeslots"
)]
fn doc_bulk_create_slots_handler() {}

#[utoipa::path(
    post,
    path = "/timeslots/generate", // Path relative to /api
    request_body(content = GenerateSlotsRequest, example = json!({
        "staff_id": "anna",
        "slot_date": "2030-06-01",
        "day_start": "09:00",
        "day_end": "12:00",
        "slot_minutes": 45,
        "buffer_minutes": 15
    })),
    responses(
        (status = 201, description = "Generated slots upserted", body = BulkCreateSlotsResponse),
        (status = 400, description = "Inverted window or malformed input")
    ),
    tag = "Timeslots"
)]
fn doc_generate_slots_handler() {}

#[utoipa::path(
    patch,
    path = "/timeslots/{id}", // Path relative to /api
    params(("id" = i64, Path, description = "Slot id")),
    request_body = UpdateSlotRequest,
    responses(
        (status = 200, description = "Updated slot", body = Slot),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot has an active booking")
    ),
    tag = "Timeslots"
)]
fn doc_update_slot_handler() {}

#[utoipa::path(
    delete,
    path = "/timeslots/{id}", // Path relative to /api
    params(("id" = i64, Path, description = "Slot id")),
    responses(
        (status = 200, description = "Slot deleted", body = DeleteSlotResponse),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot has an active booking")
    ),
    tag = "Timeslots"
)]
fn doc_delete_slot_handler() {}

#[utoipa::path(
    get,
    path = "/timeslots", // Path relative to /api
    params(
        ("staff_id" = Option<String>, Query, description = "Only slots owned by this staff member"),
        ("date" = Option<String>, Query, description = "Only slots on this day (YYYY-MM-DD)"),
        ("free_only" = Option<bool>, Query, description = "Only AVAILABLE slots")
    ),
    responses((status = 200, description = "Matching slots", body = [Slot])),
    tag = "Timeslots"
)]
fn doc_list_slots_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_slot_handler,
        doc_bulk_create_slots_handler,
        doc_generate_slots_handler,
        doc_update_slot_handler,
        doc_delete_slot_handler,
        doc_list_slots_handler
    ),
    components(
        schemas(
            Slot,
            SlotStatus,
            CreateSlotRequest,
            SlotWindow,
            BulkCreateSlotsRequest,
            GenerateSlotsRequest,
            BulkCreateSlotsResponse,
            UpdateSlotRequest,
            DeleteSlotResponse
        )
    ),
    tags(
        (name = "Timeslots", description = "Staff time slot catalog")
    )
)]
pub struct TimeslotsApiDoc;
