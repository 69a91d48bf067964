// --- File: crates/slotify_timeslots/src/handlers.rs ---
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::logic::{
    bulk_create_slots, create_slot, delete_slot, generate_slots, list_slots, require_slot,
    set_slot_availability, BulkCreateSlotsRequest, BulkCreateSlotsResponse, CreateSlotRequest,
    DeleteSlotResponse, GenerateSlotsRequest, ListSlotsQuery, UpdateSlotRequest,
};
use slotify_common::models::Slot;
use slotify_common::{ApiError, Role};
use slotify_db::DbClient;
use slotify_settings::SettingsStore;

// --- State for Timeslot Handlers ---
#[derive(Clone)]
pub struct TimeslotsState {
    pub db: DbClient,
    pub settings: Arc<SettingsStore>,
}

/// Axum handler creating one slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/timeslots", // Path relative to /api
    request_body = CreateSlotRequest,
    responses(
        (status = 201, description = "Slot created", body = Slot),
        (status = 400, description = "Malformed date or times"),
        (status = 403, description = "Caller does not own this staff id"),
        (status = 409, description = "Slot already exists for this owner, date and start")
    ),
    tag = "Timeslots"
))]
pub async fn create_slot_handler(
    State(state): State<Arc<TimeslotsState>>,
    Extension(role): Extension<Role>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<Slot>), ApiError> {
    role.require_owner_or_admin(&payload.staff_id)?;
    let slot = create_slot(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Axum handler upserting a list of windows for one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/timeslots/bulk", // Path relative to /api
    request_body = BulkCreateSlotsRequest,
    responses(
        (status = 201, description = "Windows upserted", body = BulkCreateSlotsResponse),
        (status = 400, description = "Malformed date or times"),
        (status = 403, description = "Caller does not own this staff id")
    ),
    tag = "Timeslots"
))]
pub async fn bulk_create_slots_handler(
    State(state): State<Arc<TimeslotsState>>,
    Extension(role): Extension<Role>,
    Json(payload): Json<BulkCreateSlotsRequest>,
) -> Result<(StatusCode, Json<BulkCreateSlotsResponse>), ApiError> {
    role.require_owner_or_admin(&payload.staff_id)?;
    let outcome = bulk_create_slots(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Axum handler tiling a day window into slots.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/timeslots/generate", // Path relative to /api
    request_body = GenerateSlotsRequest,
    responses(
        (status = 201, description = "Generated slots upserted", body = BulkCreateSlotsResponse),
        (status = 400, description = "Inverted window or malformed input"),
        (status = 403, description = "Caller does not own this staff id")
    ),
    tag = "Timeslots"
))]
pub async fn generate_slots_handler(
    State(state): State<Arc<TimeslotsState>>,
    Extension(role): Extension<Role>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<(StatusCode, Json<BulkCreateSlotsResponse>), ApiError> {
    role.require_owner_or_admin(&payload.staff_id)?;
    let outcome = generate_slots(&state.db, &state.settings, &payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Axum handler switching a slot between AVAILABLE and BLOCKED.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/timeslots/{id}", // Path relative to /api
    params(("id" = i64, Path, description = "Slot id")),
    request_body = UpdateSlotRequest,
    responses(
        (status = 200, description = "Updated slot", body = Slot),
        (status = 404, description = "Slot not found"),
        (status = 403, description = "Caller does not own this slot"),
        (status = 409, description = "Slot has an active booking")
    ),
    tag = "Timeslots"
))]
pub async fn update_slot_handler(
    State(state): State<Arc<TimeslotsState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<Slot>, ApiError> {
    let slot = require_slot(&state.db, id).await?;
    role.require_owner_or_admin(&slot.staff_id)?;
    let updated = set_slot_availability(&state.db, slot, payload.status).await?;
    Ok(Json(updated))
}

/// Axum handler deleting a slot without an active booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/timeslots/{id}", // Path relative to /api
    params(("id" = i64, Path, description = "Slot id")),
    responses(
        (status = 200, description = "Slot deleted", body = DeleteSlotResponse),
        (status = 404, description = "Slot not found"),
        (status = 403, description = "Caller does not own this slot"),
        (status = 409, description = "Slot has an active booking")
    ),
    tag = "Timeslots"
))]
pub async fn delete_slot_handler(
    State(state): State<Arc<TimeslotsState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteSlotResponse>, ApiError> {
    let slot = require_slot(&state.db, id).await?;
    role.require_owner_or_admin(&slot.staff_id)?;
    delete_slot(&state.db, &slot).await?;
    Ok(Json(DeleteSlotResponse { id, deleted: true }))
}

/// Axum handler for the public slot listing.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/timeslots", // Path relative to /api
    params(
        ("staff_id" = Option<String>, Query, description = "Only slots owned by this staff member"),
        ("date" = Option<String>, Query, description = "Only slots on this day (YYYY-MM-DD)"),
        ("free_only" = Option<bool>, Query, description = "Only AVAILABLE slots")
    ),
    responses(
        (status = 200, description = "Matching slots", body = [Slot])
    ),
    tag = "Timeslots"
))]
pub async fn list_slots_handler(
    State(state): State<Arc<TimeslotsState>>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<Vec<Slot>>, ApiError> {
    let slots = list_slots(&state.db, &query).await?;
    Ok(Json(slots))
}
