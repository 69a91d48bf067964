// --- File: crates/slotify_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., DATABASE_URL loaded via SLOTIFY_DATABASE__URL
}

// --- Auth Config ---
// Holds the API keys guarding the admin and staff surfaces. Keys are secrets
// and normally arrive through env overrides rather than the config file.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    pub admin_api_key: Option<String>, // Loaded via SLOTIFY_AUTH__ADMIN_API_KEY
    /// Per-staff API keys, keyed by staff id.
    #[serde(default)]
    pub staff_api_keys: HashMap<String, String>,
}

// --- Notifier Config ---
// Holds the outbound webhook target for booking notifications.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotifierConfig {
    pub webhook_url: String, // Mandatory
    pub timeout_seconds: Option<u64>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_notifier: bool,

    /// Seconds a cached settings snapshot stays fresh before the store
    /// re-reads the database.
    #[serde(default)]
    pub settings_ttl_secs: Option<u64>,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>, // Central DB config
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub notifier: Option<NotifierConfig>,
}
