// --- File: crates/services/slotify_backend/src/lib.rs ---
//! Wires the feature crates into one HTTP service.
//!
//! Everything lives under `/api`: the settings store, the slot catalog and
//! the reservation engine each contribute their own router and auth rules.
//! The pieces are built once at startup and shared from there.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use slotify_booking::notify::SharedNotifier;
use slotify_config::AppConfig;
use slotify_db::{
    reservations as reservations_repo, settings as settings_repo, slots as slots_repo, DbClient,
    DbClientFactory,
};
use slotify_notify::create_notification_service;
use slotify_settings::SettingsStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Cache lifetime for settings when the config does not set one.
const DEFAULT_SETTINGS_TTL_SECS: u64 = 30;

/// Shared pieces the routers are built from.
#[derive(Clone)]
pub struct Backend {
    pub config: Arc<AppConfig>,
    pub db: DbClient,
    pub settings: Arc<SettingsStore>,
    pub notifier: SharedNotifier,
}

/// Connects to the database, prepares the schema, seeds default settings
/// and picks the notification backend.
pub async fn init_backend(
    config: Arc<AppConfig>,
) -> Result<Backend, Box<dyn std::error::Error + Send + Sync>> {
    let db = DbClientFactory::new().from_app_config(&config).await?;
    if !db.is_healthy().await {
        return Err("database is not reachable".into());
    }

    slots_repo::init_schema(&db).await?;
    reservations_repo::init_schema(&db).await?;
    settings_repo::init_schema(&db).await?;

    let ttl = Duration::from_secs(
        config
            .settings_ttl_secs
            .unwrap_or(DEFAULT_SETTINGS_TTL_SECS),
    );
    let settings = Arc::new(SettingsStore::with_ttl(db.clone(), ttl));
    settings.seed_defaults().await?;

    let notifier = create_notification_service(&config);

    info!("Backend initialized, settings cache TTL {:?}", ttl);
    Ok(Backend {
        config,
        db,
        settings,
        notifier,
    })
}

#[axum::debug_handler]
async fn health_handler(State(db): State<DbClient>) -> impl IntoResponse {
    if db.is_healthy().await {
        (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded", "database": "unreachable" })),
        )
    }
}

/// Assembles the full application router.
pub fn build_app(backend: &Backend) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health_handler))
        .with_state(backend.db.clone());

    let settings_router = slotify_settings::routes::routes(
        Arc::clone(&backend.config),
        Arc::clone(&backend.settings),
    );
    let timeslots_router = slotify_timeslots::routes::routes(
        Arc::clone(&backend.config),
        backend.db.clone(),
        Arc::clone(&backend.settings),
    );
    let booking_router = slotify_booking::routes::routes(
        Arc::clone(&backend.config),
        backend.db.clone(),
        Arc::clone(&backend.settings),
        Arc::clone(&backend.notifier),
    );

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Slotify API!" }))
        .merge(health_routes)
        .merge(settings_router)
        .merge(timeslots_router)
        .merge(booking_router);

    #[allow(unused_mut)] // mutable only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use slotify_booking::doc::BookingApiDoc;
        use slotify_settings::doc::SettingsApiDoc;
        use slotify_timeslots::doc::TimeslotsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotify API",
                version = "0.1.0",
                description = "Slotify Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Slotify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SettingsApiDoc::openapi());
        openapi_doc.merge(TimeslotsApiDoc::openapi());
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        // Create the Swagger UI route, referencing the merged doc
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}
