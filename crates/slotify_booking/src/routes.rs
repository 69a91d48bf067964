// --- File: crates/slotify_booking/src/routes.rs ---

use crate::handlers::{
    cancel_booking_handler, check_booking_handler, create_booking_handler, list_bookings_handler,
    rebook_booking_handler, update_booking_status_handler, BookingState,
};
use crate::notify::SharedNotifier;
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

/// Creates a router containing all routes for the booking feature.
///
/// Create, cancel, rebook and the access code lookup are public. The
/// listing and the status transition require an API key.
pub fn routes(
    config: Arc<AppConfig>,
    db: DbClient,
    settings: Arc<SettingsStore>,
    notifier: SharedNotifier,
) -> Router {
    let state = Arc::new(BookingState {
        db,
        settings,
        notifier,
    });
    let auth_state = Arc::new(ApiKeyAuthState { config });

    let manage_routes = Router::new()
        .route("/bookings", get(list_bookings_handler))
        .route("/bookings/{id}/status", patch(update_booking_status_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            api_key_auth_middleware,
        ));

    Router::new()
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/cancel", post(cancel_booking_handler))
        .route("/bookings/rebook", post(rebook_booking_handler))
        .route("/bookings/check/{code}", get(check_booking_handler))
        .merge(manage_routes)
        .with_state(state)
}
