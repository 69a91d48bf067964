// --- File: crates/slotify_settings/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::UpdateSettingRequest;
use slotify_common::models::Setting;

#[utoipa::path(
    get,
    path = "/settings/public", // Path relative to /api
    responses(
        (status = 200, description = "Public settings as a key/value map"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Settings"
)]
fn doc_public_settings_handler() {}

#[utoipa::path(
    get,
    path = "/settings", // Path relative to /api
    responses(
        (status = 200, description = "All stored settings", body = [Setting]),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Caller is not an administrator")
    ),
    tag = "Settings"
)]
fn doc_list_settings_handler() {}

#[utoipa::path(
    get,
    path = "/settings/{key}", // Path relative to /api
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "The stored setting", body = Setting),
        (status = 404, description = "Unknown setting key")
    ),
    tag = "Settings"
)]
fn doc_get_setting_handler() {}

#[utoipa::path(
    put,
    path = "/settings/{key}", // Path relative to /api
    params(("key" = String, Path, description = "Setting key")),
    request_body(content = UpdateSettingRequest, example = json!({
        "value": "48",
        "description": "Tightened booking lead time"
    })),
    responses(
        (status = 200, description = "The updated setting", body = Setting),
        (status = 400, description = "Empty value"),
        (status = 404, description = "Unknown setting key")
    ),
    tag = "Settings"
)]
fn doc_update_setting_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_public_settings_handler,
        doc_list_settings_handler,
        doc_get_setting_handler,
        doc_update_setting_handler
    ),
    components(schemas(Setting, UpdateSettingRequest)),
    tags(
        (name = "Settings", description = "Runtime settings for the booking engine")
    )
)]
pub struct SettingsApiDoc;
