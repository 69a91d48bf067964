#[cfg(test)]
mod tests {
    use crate::store::{SettingsError, SettingsStore, DEFAULT_SETTINGS, PUBLIC_SETTING_KEYS};
    use slotify_db::{settings as settings_repo, DbClient};
    use std::time::Duration;

    async fn test_db() -> DbClient {
        let path = std::env::temp_dir().join(format!(
            "slotify_settings_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.expect("connect test db");
        settings_repo::init_schema(&client)
            .await
            .expect("settings schema");
        client
    }

    #[tokio::test]
    async fn test_defaults_visible_without_seeding() {
        // An empty table must still resolve every known key to its
        // compiled-in default.
        let store = SettingsStore::new(test_db().await);

        assert_eq!(store.get("booking_enabled").await.unwrap(), "true");
        assert!(store.get_bool("booking_enabled").await.unwrap());
        assert_eq!(store.get_i64("slot_length_minutes").await.unwrap(), 30);
        assert_eq!(store.get_i64("max_active_bookings").await.unwrap(), 0);
        assert_eq!(store.get("booking_notice_text").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unknown_keys_are_rejected() {
        let store = SettingsStore::new(test_db().await);

        assert!(matches!(
            store.get("no_such_setting").await,
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            store.set("no_such_setting", "1", None).await,
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            store.find("no_such_setting").await,
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[tokio::test]
    async fn test_set_invalidates_the_cache() {
        // The TTL is generous here, so without the explicit invalidate
        // in set() the second read would still see the cached default.
        let store = SettingsStore::with_ttl(test_db().await, Duration::from_secs(3600));

        assert!(store.get_bool("booking_enabled").await.unwrap());
        store.set("booking_enabled", "false", None).await.unwrap();
        assert!(!store.get_bool("booking_enabled").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_cache_picks_up_external_writes() {
        // A zero TTL forces a reload on every read, so a write that
        // bypasses the store (another process) becomes visible.
        let db = test_db().await;
        let store = SettingsStore::with_ttl(db.clone(), Duration::ZERO);

        assert_eq!(store.get_i64("min_notice_hours").await.unwrap(), 24);

        settings_repo::upsert_setting(db.pool(), "min_notice_hours", "48", None)
            .await
            .unwrap();

        assert_eq!(store.get_i64("min_notice_hours").await.unwrap(), 48);
    }

    #[tokio::test]
    async fn test_typed_helpers_fall_back_on_garbage() {
        let store = SettingsStore::with_ttl(test_db().await, Duration::ZERO);

        store
            .set("slot_length_minutes", "soonish", None)
            .await
            .unwrap();
        store.set("booking_enabled", "yes", None).await.unwrap();

        assert_eq!(store.get_i64("slot_length_minutes").await.unwrap(), 0);
        assert!(!store.get_bool("booking_enabled").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_values_are_rejected_except_notice_text() {
        let store = SettingsStore::new(test_db().await);

        assert!(matches!(
            store.set("booking_page_title", "  ", None).await,
            Err(SettingsError::EmptyValue(_))
        ));

        // The notice text may legitimately be cleared.
        let cleared = store.set("booking_notice_text", "", None).await.unwrap();
        assert_eq!(cleared.value, "");
    }

    #[tokio::test]
    async fn test_seeding_preserves_admin_edits() {
        let store = SettingsStore::new(test_db().await);

        store.seed_defaults().await.unwrap();
        store.set("cancel_notice_hours", "12", None).await.unwrap();
        store.seed_defaults().await.unwrap();

        let stored = store.find("cancel_notice_hours").await.unwrap();
        assert_eq!(stored.value, "12");

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), DEFAULT_SETTINGS.len());
    }

    #[tokio::test]
    async fn test_public_subset_contains_only_curated_keys() {
        let store = SettingsStore::new(test_db().await);

        let public = store.public_values().await.unwrap();
        assert_eq!(public.len(), PUBLIC_SETTING_KEYS.len());
        assert_eq!(public.get("booking_enabled").map(String::as_str), Some("true"));
        assert_eq!(
            public.get("booking_page_title").map(String::as_str),
            Some("Book an appointment")
        );
        // Operational limits stay private.
        assert!(!public.contains_key("max_active_bookings"));
        assert!(!public.contains_key("slot_length_minutes"));
    }
}
