// --- File: crates/slotify_timeslots/src/routes.rs ---

use crate::handlers::{
    bulk_create_slots_handler, create_slot_handler, delete_slot_handler, generate_slots_handler,
    list_slots_handler, update_slot_handler, TimeslotsState,
};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use slotify_common::{api_key_auth_middleware, ApiKeyAuthState};
use slotify_config::AppConfig;
use slotify_db::DbClient;
use slotify_settings::SettingsStore;
use std::sync::Arc;

/// Creates a router containing all routes for the time slot feature.
///
/// The listing is public, every mutating route requires an API key.
pub fn routes(config: Arc<AppConfig>, db: DbClient, settings: Arc<SettingsStore>) -> Router {
    let state = Arc::new(TimeslotsState { db, settings });
    let auth_state = Arc::new(ApiKeyAuthState { config });

    let manage_routes = Router::new()
        .route("/timeslots", post(create_slot_handler))
        .route("/timeslots/bulk", post(bulk_create_slots_handler))
        .route("/timeslots/generate", post(generate_slots_handler))
        .route(
            "/timeslots/{id}",
            patch(update_slot_handler).delete(delete_slot_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            api_key_auth_middleware,
        ));

    Router::new()
        .route("/timeslots", get(list_slots_handler))
        .merge(manage_routes)
        .with_state(state)
}
