// --- File: crates/slotify_settings/src/store.rs ---
//! TTL-cached settings store backed by the `settings` table.
//!
//! Reads go through an in-memory snapshot that is refreshed lazily once
//! it is older than the configured TTL. Writes go straight to the
//! database and drop the snapshot so the next read sees the new value.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use slotify_common::models::Setting;
use slotify_common::ApiError;
use slotify_db::{settings as settings_repo, DbClient, DbError};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Snapshot age after which a read reloads from the database.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Every setting the engine knows about, with its compiled-in default
/// value. Keys outside this list are rejected by [`SettingsStore::set`].
pub const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    (
        "booking_enabled",
        "true",
        "Master switch for creating new bookings",
    ),
    (
        "cancellation_enabled",
        "true",
        "Whether customers may cancel via access code",
    ),
    (
        "rebooking_enabled",
        "true",
        "Whether customers may move a booking to another slot",
    ),
    (
        "slot_length_minutes",
        "30",
        "Default slot length used by the generator",
    ),
    (
        "slot_buffer_minutes",
        "0",
        "Default gap between generated slots",
    ),
    (
        "min_notice_hours",
        "24",
        "Minimum lead time before a slot can be booked",
    ),
    (
        "cancel_notice_hours",
        "24",
        "Minimum lead time before a booking can be cancelled",
    ),
    (
        "max_active_bookings",
        "0",
        "Cap on confirmed bookings per customer email, 0 disables the cap",
    ),
    (
        "booking_page_title",
        "Book an appointment",
        "Heading shown on the public booking page",
    ),
    (
        "booking_notice_text",
        "",
        "Free-form notice shown on the public booking page",
    ),
];

/// Keys exposed without authentication via the public settings endpoint.
pub const PUBLIC_SETTING_KEYS: &[&str] = &[
    "booking_enabled",
    "cancellation_enabled",
    "rebooking_enabled",
    "min_notice_hours",
    "cancel_notice_hours",
    "booking_page_title",
    "booking_notice_text",
];

/// Errors raised by the settings store.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The key is not one of the known settings
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// An empty value was supplied for a setting
    #[error("Setting {0} cannot be set to an empty value")]
    EmptyValue(String),

    /// Database access failed
    #[error("Settings storage error: {0}")]
    Db(#[from] DbError),
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::UnknownKey(key) => {
                ApiError::not_found("setting_not_found", format!("Unknown setting: {key}"))
            }
            SettingsError::EmptyValue(key) => {
                ApiError::validation(format!("Setting {key} cannot be set to an empty value"))
            }
            SettingsError::Db(e) => ApiError::internal(e.to_string()),
        }
    }
}

struct CachedValues {
    loaded_at: Instant,
    values: HashMap<String, String>,
}

/// Lazily refreshed view over the `settings` table.
pub struct SettingsStore {
    db: DbClient,
    ttl: Duration,
    cache: RwLock<Option<CachedValues>>,
}

impl SettingsStore {
    /// Create a store with the default snapshot TTL.
    pub fn new(db: DbClient) -> Self {
        Self::with_ttl(db, DEFAULT_TTL)
    }

    /// Create a store with an explicit snapshot TTL.
    ///
    /// A zero TTL makes every read hit the database, which is what the
    /// tests use to observe writes immediately.
    pub fn with_ttl(db: DbClient, ttl: Duration) -> Self {
        Self {
            db,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Returns the compiled-in default for a known key.
    pub fn default_value(key: &str) -> Option<&'static str> {
        DEFAULT_SETTINGS
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, v, _)| *v)
    }

    fn is_known_key(key: &str) -> bool {
        DEFAULT_SETTINGS.iter().any(|(k, _, _)| *k == key)
    }

    /// Insert every missing default row. Existing rows are left alone,
    /// so values edited by an admin survive restarts.
    pub async fn seed_defaults(&self) -> Result<(), SettingsError> {
        let mut created = 0;
        for &(key, value, description) in DEFAULT_SETTINGS {
            if settings_repo::insert_setting_if_absent(
                self.db.pool(),
                key,
                value,
                Some(description),
            )
            .await?
            {
                created += 1;
            }
        }
        if created > 0 {
            info!("Seeded {} default settings", created);
        }
        Ok(())
    }

    async fn load_values(&self) -> Result<HashMap<String, String>, SettingsError> {
        let rows = settings_repo::fetch_all_settings(self.db.pool()).await?;
        let mut values: HashMap<String, String> = DEFAULT_SETTINGS
            .iter()
            .map(|(k, v, _)| (k.to_string(), v.to_string()))
            .collect();
        for row in rows {
            values.insert(row.key, row.value);
        }
        Ok(values)
    }

    /// Run `f` against a fresh-enough snapshot of all values.
    async fn with_snapshot<T>(
        &self,
        f: impl FnOnce(&HashMap<String, String>) -> T,
    ) -> Result<T, SettingsError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(f(&cached.values));
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(f(&cached.values));
            }
        }

        debug!("Refreshing settings snapshot");
        let values = self.load_values().await?;
        let result = f(&values);
        *cache = Some(CachedValues {
            loaded_at: Instant::now(),
            values,
        });
        Ok(result)
    }

    /// Drop the snapshot so the next read reloads from the database.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Fetch one value as a string.
    pub async fn get(&self, key: &str) -> Result<String, SettingsError> {
        if !Self::is_known_key(key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        let key_owned = key.to_string();
        self.with_snapshot(move |values| {
            values
                .get(&key_owned)
                .cloned()
                .unwrap_or_default()
        })
        .await
    }

    /// Fetch one value as a bool. Anything that is not literally
    /// `true` reads as `false`.
    pub async fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        let raw = self.get(key).await?;
        match raw.parse::<bool>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!("Setting {} holds non-boolean value {:?}", key, raw);
                Ok(false)
            }
        }
    }

    /// Fetch one value as an integer. Unparsable values read as `0`.
    pub async fn get_i64(&self, key: &str) -> Result<i64, SettingsError> {
        let raw = self.get(key).await?;
        match raw.parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!("Setting {} holds non-numeric value {:?}", key, raw);
                Ok(0)
            }
        }
    }

    /// Store a new value for a known key and drop the snapshot.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Setting, SettingsError> {
        if !Self::is_known_key(key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        if value.trim().is_empty() && key != "booking_notice_text" {
            return Err(SettingsError::EmptyValue(key.to_string()));
        }

        settings_repo::upsert_setting(self.db.pool(), key, value, description).await?;
        self.invalidate().await;

        let stored = settings_repo::find_setting_by_key(self.db.pool(), key)
            .await?
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        Ok(stored)
    }

    /// Load every stored row for the admin listing, bypassing the cache.
    pub async fn all(&self) -> Result<Vec<Setting>, SettingsError> {
        let mut rows = settings_repo::fetch_all_settings(self.db.pool()).await?;
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows)
    }

    /// Load one stored row for the admin detail view, bypassing the cache.
    pub async fn find(&self, key: &str) -> Result<Setting, SettingsError> {
        if !Self::is_known_key(key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        match settings_repo::find_setting_by_key(self.db.pool(), key).await? {
            Some(row) => Ok(row),
            // Known key without a stored row still resolves to its default.
            None => Ok(Setting {
                key: key.to_string(),
                value: Self::default_value(key).unwrap_or_default().to_string(),
                description: None,
            }),
        }
    }

    /// The public key/value subset served without authentication.
    pub async fn public_values(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        self.with_snapshot(|values| {
            PUBLIC_SETTING_KEYS
                .iter()
                .map(|key| {
                    (
                        key.to_string(),
                        values.get(*key).cloned().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .await
    }
}
