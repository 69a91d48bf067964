#[cfg(test)]
mod tests {
    use crate::logic::{
        bulk_create_slots, create_slot, delete_slot, generate_slots, list_slots, require_slot,
        set_slot_availability, tile_windows, BulkCreateSlotsRequest, CreateSlotRequest,
        GenerateSlotsRequest, ListSlotsQuery, SlotWindow, TimeslotsError,
    };
    use chrono::NaiveTime;
    use slotify_common::models::SlotStatus;
    use slotify_db::{settings as settings_repo, slots as slots_repo, DbClient};
    use slotify_settings::SettingsStore;
    use std::time::Duration;

    async fn test_db() -> DbClient {
        let path = std::env::temp_dir().join(format!(
            "slotify_timeslots_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.expect("connect test db");
        slots_repo::init_schema(&client).await.expect("slots schema");
        settings_repo::init_schema(&client)
            .await
            .expect("settings schema");
        client
    }

    fn test_store(db: &DbClient) -> SettingsStore {
        // Zero TTL so settings writes in a test are visible immediately.
        SettingsStore::with_ttl(db.clone(), Duration::ZERO)
    }

    fn time(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    fn create_request(start: &str, end: &str) -> CreateSlotRequest {
        CreateSlotRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_tile_windows_exact_fit() {
        let windows = tile_windows(time("09:00"), time("10:00"), 30, 0);
        assert_eq!(
            windows,
            vec![
                ("09:00".to_string(), "09:30".to_string()),
                ("09:30".to_string(), "10:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_tile_windows_drops_overrun_segment() {
        // The third segment would end at 10:30, past the window end.
        let windows = tile_windows(time("09:00"), time("10:10"), 30, 0);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].1, "10:00");
    }

    #[test]
    fn test_tile_windows_respects_buffer() {
        let windows = tile_windows(time("09:00"), time("12:00"), 45, 15);
        assert_eq!(
            windows,
            vec![
                ("09:00".to_string(), "09:45".to_string()),
                ("10:00".to_string(), "10:45".to_string()),
                ("11:00".to_string(), "11:45".to_string()),
            ]
        );
    }

    #[test]
    fn test_tile_windows_too_small_for_one_slot() {
        let windows = tile_windows(time("09:00"), time("09:20"), 30, 0);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_tile_windows_survives_extreme_lengths() {
        // Must not wrap the cursor, in any build profile.
        assert!(tile_windows(time("09:00"), time("17:00"), i64::MAX, 0).is_empty());
        assert_eq!(
            tile_windows(time("09:00"), time("17:00"), 60, i64::MAX).len(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_slot_validates_input() {
        let db = test_db().await;

        let inverted = create_request("10:00", "09:00");
        assert!(matches!(
            create_slot(&db, &inverted).await,
            Err(TimeslotsError::Validation(_))
        ));

        let garbage = create_request("soon", "later");
        assert!(matches!(
            create_slot(&db, &garbage).await,
            Err(TimeslotsError::Validation(_))
        ));

        let mut no_owner = create_request("09:00", "09:30");
        no_owner.staff_id = "  ".to_string();
        assert!(matches!(
            create_slot(&db, &no_owner).await,
            Err(TimeslotsError::Validation(_))
        ));

        // Nothing was written by any of the rejected requests.
        let slots = list_slots(&db, &ListSlotsQuery::default()).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_slot_is_a_conflict() {
        let db = test_db().await;

        create_slot(&db, &create_request("09:00", "09:30"))
            .await
            .unwrap();
        assert!(matches!(
            create_slot(&db, &create_request("09:00", "09:45")).await,
            Err(TimeslotsError::DuplicateSlot)
        ));
    }

    #[tokio::test]
    async fn test_bulk_upsert_is_idempotent() {
        let db = test_db().await;

        // One of the two windows already exists.
        create_slot(&db, &create_request("09:00", "09:30"))
            .await
            .unwrap();

        let request = BulkCreateSlotsRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            slots: vec![
                SlotWindow {
                    start_time: "09:00".to_string(),
                    end_time: "09:30".to_string(),
                },
                SlotWindow {
                    start_time: "10:00".to_string(),
                    end_time: "10:30".to_string(),
                },
            ],
        };

        let outcome = bulk_create_slots(&db, &request).await.unwrap();
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.skipped, 1);

        let slots = list_slots(&db, &ListSlotsQuery::default()).await.unwrap();
        assert_eq!(slots.len(), 2);

        // Re-running the same request creates nothing new.
        let rerun = bulk_create_slots(&db, &request).await.unwrap();
        assert_eq!(rerun.created, 0);
        assert_eq!(rerun.skipped, 2);
    }

    #[tokio::test]
    async fn test_generate_rejects_inverted_window_before_writing() {
        let db = test_db().await;
        let store = test_store(&db);

        let request = GenerateSlotsRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            day_start: "12:00".to_string(),
            day_end: "09:00".to_string(),
            slot_minutes: Some(30),
            buffer_minutes: Some(0),
        };

        assert!(matches!(
            generate_slots(&db, &store, &request).await,
            Err(TimeslotsError::Validation(_))
        ));

        let slots = list_slots(&db, &ListSlotsQuery::default()).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_generate_rejects_stride_past_one_day() {
        let db = test_db().await;
        let store = test_store(&db);

        let mut request = GenerateSlotsRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            day_start: "09:00".to_string(),
            day_end: "17:00".to_string(),
            slot_minutes: Some(i64::MAX),
            buffer_minutes: Some(0),
        };
        assert!(matches!(
            generate_slots(&db, &store, &request).await,
            Err(TimeslotsError::Validation(_))
        ));

        // The sum is checked too, so the pair cannot overflow together.
        request.slot_minutes = Some(30);
        request.buffer_minutes = Some(i64::MAX);
        assert!(matches!(
            generate_slots(&db, &store, &request).await,
            Err(TimeslotsError::Validation(_))
        ));

        request.buffer_minutes = Some(24 * 60);
        assert!(matches!(
            generate_slots(&db, &store, &request).await,
            Err(TimeslotsError::Validation(_))
        ));

        let slots = list_slots(&db, &ListSlotsQuery::default()).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_generate_uses_settings_defaults() {
        let db = test_db().await;
        let store = test_store(&db);
        store
            .set("slot_length_minutes", "60", None)
            .await
            .unwrap();

        let request = GenerateSlotsRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            day_start: "09:00".to_string(),
            day_end: "12:00".to_string(),
            slot_minutes: None,
            buffer_minutes: None,
        };

        let outcome = generate_slots(&db, &store, &request).await.unwrap();
        assert_eq!(outcome.created, 3);

        let slots = list_slots(&db, &ListSlotsQuery::default()).await.unwrap();
        assert_eq!(slots[0].start_time, "09:00");
        assert_eq!(slots[0].end_time, "10:00");
        assert_eq!(slots[2].start_time, "11:00");
    }

    #[tokio::test]
    async fn test_generate_then_regenerate_skips_existing() {
        let db = test_db().await;
        let store = test_store(&db);

        let request = GenerateSlotsRequest {
            staff_id: "anna".to_string(),
            slot_date: "2030-06-01".to_string(),
            day_start: "09:00".to_string(),
            day_end: "11:00".to_string(),
            slot_minutes: Some(30),
            buffer_minutes: Some(0),
        };

        let first = generate_slots(&db, &store, &request).await.unwrap();
        assert_eq!(first.created, 4);
        assert_eq!(first.skipped, 0);

        let second = generate_slots(&db, &store, &request).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 4);
    }

    #[tokio::test]
    async fn test_toggle_between_available_and_blocked() {
        let db = test_db().await;

        let slot = create_slot(&db, &create_request("09:00", "09:30"))
            .await
            .unwrap();

        let blocked = set_slot_availability(&db, slot, SlotStatus::Blocked)
            .await
            .unwrap();
        assert_eq!(blocked.status, SlotStatus::Blocked);

        let reloaded = require_slot(&db, blocked.id).await.unwrap();
        assert_eq!(reloaded.status, SlotStatus::Blocked);

        let reopened = set_slot_availability(&db, reloaded, SlotStatus::Available)
            .await
            .unwrap();
        assert_eq!(reopened.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn test_booked_target_is_rejected() {
        let db = test_db().await;

        let slot = create_slot(&db, &create_request("09:00", "09:30"))
            .await
            .unwrap();
        assert!(matches!(
            set_slot_availability(&db, slot, SlotStatus::Booked).await,
            Err(TimeslotsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_booked_slots_resist_toggle_and_delete() {
        let db = test_db().await;

        let slot = create_slot(&db, &create_request("09:00", "09:30"))
            .await
            .unwrap();
        slots_repo::set_slot_status_if(
            db.pool(),
            slot.id,
            SlotStatus::Available,
            SlotStatus::Booked,
        )
        .await
        .unwrap();

        let booked = require_slot(&db, slot.id).await.unwrap();
        assert!(matches!(
            set_slot_availability(&db, booked.clone(), SlotStatus::Blocked).await,
            Err(TimeslotsError::SlotBooked(_))
        ));
        assert!(matches!(
            delete_slot(&db, &booked).await,
            Err(TimeslotsError::SlotBooked(_))
        ));

        // Freeing the slot makes deletion possible again.
        slots_repo::set_slot_status_if(
            db.pool(),
            slot.id,
            SlotStatus::Booked,
            SlotStatus::Available,
        )
        .await
        .unwrap();
        let freed = require_slot(&db, slot.id).await.unwrap();
        delete_slot(&db, &freed).await.unwrap();

        assert!(matches!(
            require_slot(&db, slot.id).await,
            Err(TimeslotsError::NotFound(_))
        ));
    }
}
