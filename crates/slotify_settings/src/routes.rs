// --- File: crates/slotify_settings/src/routes.rs ---

use crate::handlers::{
    get_setting_handler, list_settings_handler, public_settings_handler, update_setting_handler,
    SettingsState,
};
use crate::store::SettingsStore;
use axum::{middleware, routing::get, Router};
use slotify_common::{api_key_auth_middleware, ApiKeyAuthState};
use slotify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the settings feature.
///
/// `/settings/public` is served without authentication, everything else
/// sits behind the API key middleware.
pub fn routes(config: Arc<AppConfig>, store: Arc<SettingsStore>) -> Router {
    let settings_state = Arc::new(SettingsState { store });
    let auth_state = Arc::new(ApiKeyAuthState { config });

    let admin_routes = Router::new()
        .route("/settings", get(list_settings_handler))
        .route(
            "/settings/{key}",
            get(get_setting_handler).put(update_setting_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            api_key_auth_middleware,
        ));

    Router::new()
        .route("/settings/public", get(public_settings_handler))
        .merge(admin_routes)
        .with_state(settings_state)
}
