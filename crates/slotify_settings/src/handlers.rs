// --- File: crates/slotify_settings/src/handlers.rs ---
use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::store::SettingsStore;
use slotify_common::models::Setting;
use slotify_common::{ApiError, Role};

// --- State for Settings Handlers ---
#[derive(Clone)]
pub struct SettingsState {
    pub store: Arc<SettingsStore>,
}

/// Request body for updating one setting.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    /// New stored value, always a string regardless of how it is parsed
    pub value: String,
    /// Optional replacement description
    pub description: Option<String>,
}

/// Axum handler for the unauthenticated settings subset.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/settings/public", // Path relative to /api
    responses(
        (status = 200, description = "Public settings as a key/value map"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Settings"
))]
pub async fn public_settings_handler(
    State(state): State<Arc<SettingsState>>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let values = state.store.public_values().await?;
    Ok(Json(values))
}

/// Axum handler listing every setting for administrators.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/settings", // Path relative to /api
    responses(
        (status = 200, description = "All stored settings", body = [Setting]),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Caller is not an administrator")
    ),
    tag = "Settings"
))]
pub async fn list_settings_handler(
    State(state): State<Arc<SettingsState>>,
    Extension(role): Extension<Role>,
) -> Result<Json<Vec<Setting>>, ApiError> {
    role.require_admin()?;
    let rows = state.store.all().await?;
    Ok(Json(rows))
}

/// Axum handler fetching one setting for administrators.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/settings/{key}", // Path relative to /api
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "The stored setting", body = Setting),
        (status = 404, description = "Unknown setting key"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Caller is not an administrator")
    ),
    tag = "Settings"
))]
pub async fn get_setting_handler(
    State(state): State<Arc<SettingsState>>,
    Extension(role): Extension<Role>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, ApiError> {
    role.require_admin()?;
    let setting = state.store.find(&key).await?;
    Ok(Json(setting))
}

/// Axum handler updating one setting for administrators.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/settings/{key}", // Path relative to /api
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "The updated setting", body = Setting),
        (status = 400, description = "Empty value"),
        (status = 404, description = "Unknown setting key"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Caller is not an administrator")
    ),
    tag = "Settings"
))]
pub async fn update_setting_handler(
    State(state): State<Arc<SettingsState>>,
    Extension(role): Extension<Role>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    role.require_admin()?;
    let stored = state
        .store
        .set(&key, &payload.value, payload.description.as_deref())
        .await?;
    Ok(Json(stored))
}
