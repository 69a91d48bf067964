#[cfg(test)]
mod tests {
    use crate::logic::{
        cancel_booking, check_booking, create_booking, list_bookings, BookingError,
        CancelBookingRequest, CreateBookingRequest, ListBookingsQuery,
    };
    use chrono::{Duration as ChronoDuration, Utc};
    use slotify_common::models::{ReservationStatus, Slot, SlotStatus};
    use slotify_db::{
        reservations as reservations_repo, settings as settings_repo, slots as slots_repo,
        DbClient,
    };
    use slotify_settings::SettingsStore;
    use std::time::Duration;

    async fn test_db() -> DbClient {
        let path = std::env::temp_dir().join(format!(
            "slotify_booking_test_{}.db",
            uuid::Uuid::new_v4().simple()
        ));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.expect("connect test db");
        slots_repo::init_schema(&client).await.expect("slots schema");
        reservations_repo::init_schema(&client)
            .await
            .expect("reservations schema");
        settings_repo::init_schema(&client)
            .await
            .expect("settings schema");
        client
    }

    fn test_store(db: &DbClient) -> SettingsStore {
        // Zero TTL so settings writes in a test are visible immediately.
        SettingsStore::with_ttl(db.clone(), Duration::ZERO)
    }

    async fn seed_slot(db: &DbClient, staff_id: &str, date: &str, start: &str) -> Slot {
        let end = format!("{}:30", &start[..2]);
        slots_repo::insert_slot(db.pool(), staff_id, date, start, &end)
            .await
            .expect("insert slot")
    }

    /// A slot starting roughly two hours from now, inside any sane notice
    /// window.
    async fn seed_near_slot(db: &DbClient) -> Slot {
        let start = Utc::now() + ChronoDuration::hours(2);
        slots_repo::insert_slot(
            db.pool(),
            "anna",
            &start.format("%Y-%m-%d").to_string(),
            &start.format("%H:%M").to_string(),
            &(start + ChronoDuration::minutes(30))
                .format("%H:%M")
                .to_string(),
        )
        .await
        .expect("insert slot")
    }

    fn booking_request(slot_id: i64) -> CreateBookingRequest {
        CreateBookingRequest {
            slot_id,
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            customer_phone: None,
            headcount: None,
            notes: None,
        }
    }

    async fn slot_status(db: &DbClient, id: i64) -> SlotStatus {
        slots_repo::find_slot_by_id(db.pool(), id)
            .await
            .expect("find slot")
            .expect("slot exists")
            .status
    }

    #[tokio::test]
    async fn test_create_booking_claims_slot() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_slot(&db, "anna", "2030-06-01", "09:00").await;

        let response = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("create booking");

        assert_eq!(response.reservation.slot_id, slot.id);
        assert_eq!(response.reservation.staff_id, "anna");
        assert_eq!(response.reservation.status, ReservationStatus::Confirmed);
        assert_eq!(response.reservation.headcount, 1);
        assert_eq!(response.reservation.access_code.len(), 32);
        assert_eq!(response.slot.status, SlotStatus::Booked);
        assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Booked);
    }

    #[tokio::test]
    async fn test_create_booking_rejects_unknown_slot() {
        let db = test_db().await;
        let store = test_store(&db);

        let err = create_booking(&db, &store, &booking_request(999))
            .await
            .expect_err("missing slot");
        assert!(matches!(err, BookingError::SlotNotFound(999)));
    }

    #[tokio::test]
    async fn test_create_booking_rejects_taken_and_blocked_slots() {
        let db = test_db().await;
        let store = test_store(&db);
        let taken = seed_slot(&db, "anna", "2030-06-01", "09:00").await;
        let blocked = seed_slot(&db, "anna", "2030-06-01", "10:00").await;

        create_booking(&db, &store, &booking_request(taken.id))
            .await
            .expect("first booking");
        let err = create_booking(&db, &store, &booking_request(taken.id))
            .await
            .expect_err("taken slot");
        assert!(matches!(err, BookingError::SlotAlreadyBooked(id) if id == taken.id));

        slots_repo::set_slot_status_if(
            db.pool(),
            blocked.id,
            SlotStatus::Available,
            SlotStatus::Blocked,
        )
        .await
        .expect("block slot");
        let err = create_booking(&db, &store, &booking_request(blocked.id))
            .await
            .expect_err("blocked slot");
        assert!(matches!(err, BookingError::SlotAlreadyBooked(id) if id == blocked.id));
    }

    #[tokio::test]
    async fn test_create_booking_validates_customer_details() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_slot(&db, "anna", "2030-06-01", "09:00").await;

        let mut no_name = booking_request(slot.id);
        no_name.customer_name = "   ".to_string();
        let err = create_booking(&db, &store, &no_name)
            .await
            .expect_err("blank name");
        assert!(matches!(err, BookingError::Validation(ref msg) if msg.contains("customer_name")));

        let mut bad_email = booking_request(slot.id);
        bad_email.customer_email = "not-an-email".to_string();
        let err = create_booking(&db, &store, &bad_email)
            .await
            .expect_err("bad email");
        assert!(matches!(err, BookingError::Validation(ref msg) if msg.contains("customer_email")));

        let mut no_guests = booking_request(slot.id);
        no_guests.headcount = Some(0);
        let err = create_booking(&db, &store, &no_guests)
            .await
            .expect_err("zero headcount");
        assert!(matches!(err, BookingError::Validation(ref msg) if msg.contains("headcount")));

        // Nothing was written along the way.
        assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Available);
    }

    #[tokio::test]
    async fn test_create_booking_honours_booking_gate() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_slot(&db, "anna", "2030-06-01", "09:00").await;

        store
            .set("booking_enabled", "false", None)
            .await
            .expect("disable booking");
        let err = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect_err("booking disabled");
        assert!(matches!(err, BookingError::BookingDisabled));

        store
            .set("booking_enabled", "true", None)
            .await
            .expect("enable booking");
        create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("booking works again");
    }

    #[tokio::test]
    async fn test_create_booking_enforces_min_notice() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_near_slot(&db).await;

        // Default minimum notice is 24 hours, the slot is two hours out.
        let err = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect_err("notice too short");
        assert!(matches!(err, BookingError::NoticeTooShort(24)));
        assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Available);

        store
            .set("min_notice_hours", "0", None)
            .await
            .expect("drop notice");
        create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("booking with no notice requirement");
    }

    #[tokio::test]
    async fn test_create_booking_enforces_active_booking_limit() {
        let db = test_db().await;
        let store = test_store(&db);
        let first = seed_slot(&db, "anna", "2030-06-01", "09:00").await;
        let second = seed_slot(&db, "anna", "2030-06-01", "10:00").await;
        let third = seed_slot(&db, "anna", "2030-06-01", "11:00").await;

        store
            .set("max_active_bookings", "1", None)
            .await
            .expect("cap bookings");

        create_booking(&db, &store, &booking_request(first.id))
            .await
            .expect("first booking");
        let err = create_booking(&db, &store, &booking_request(second.id))
            .await
            .expect_err("over the cap");
        assert!(matches!(err, BookingError::BookingLimitReached(1)));
        assert_eq!(slot_status(&db, second.id).await, SlotStatus::Available);

        // A different customer is not affected.
        let mut other = booking_request(third.id);
        other.customer_email = "ben@example.com".to_string();
        create_booking(&db, &store, &other)
            .await
            .expect("other customer books");
    }

    #[tokio::test]
    async fn test_cancel_booking_frees_slot_and_is_not_idempotent() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_slot(&db, "anna", "2030-06-01", "09:00").await;

        let created = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("create booking");
        let cancel = CancelBookingRequest {
            access_code: created.reservation.access_code.clone(),
        };

        let cancelled = cancel_booking(&db, &store, &cancel)
            .await
            .expect("cancel booking");
        assert_eq!(cancelled.reservation.status, ReservationStatus::Cancelled);
        assert!(cancelled.reservation.cancelled_at.is_some());
        assert_eq!(cancelled.slot.status, SlotStatus::Available);
        assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Available);

        // A second cancel with the same code is a conflict, not a no-op.
        let err = cancel_booking(&db, &store, &cancel)
            .await
            .expect_err("second cancel");
        assert!(matches!(err, BookingError::AlreadyCancelled));
    }

    #[tokio::test]
    async fn test_cancel_booking_rejects_unknown_code() {
        let db = test_db().await;
        let store = test_store(&db);

        let err = cancel_booking(
            &db,
            &store,
            &CancelBookingRequest {
                access_code: "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
            },
        )
        .await
        .expect_err("unknown code");
        assert!(matches!(err, BookingError::ReservationNotFound));
    }

    #[tokio::test]
    async fn test_cancel_booking_honours_gate_and_notice() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_near_slot(&db).await;

        store
            .set("min_notice_hours", "0", None)
            .await
            .expect("drop create notice");
        let created = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("create booking");
        let cancel = CancelBookingRequest {
            access_code: created.reservation.access_code.clone(),
        };

        store
            .set("cancellation_enabled", "false", None)
            .await
            .expect("disable cancellation");
        let err = cancel_booking(&db, &store, &cancel)
            .await
            .expect_err("cancellation disabled");
        assert!(matches!(err, BookingError::CancellationDisabled));

        store
            .set("cancellation_enabled", "true", None)
            .await
            .expect("enable cancellation");
        // Default cancel notice is 24 hours, the slot starts in two.
        let err = cancel_booking(&db, &store, &cancel)
            .await
            .expect_err("cancel notice too short");
        assert!(matches!(err, BookingError::NoticeTooShort(24)));
        assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Booked);

        store
            .set("cancel_notice_hours", "0", None)
            .await
            .expect("drop cancel notice");
        cancel_booking(&db, &store, &cancel)
            .await
            .expect("cancel inside the window");
    }

    #[tokio::test]
    async fn test_check_booking_reports_allowed_actions() {
        let db = test_db().await;
        let store = test_store(&db);
        let slot = seed_slot(&db, "anna", "2030-06-01", "09:00").await;

        let created = create_booking(&db, &store, &booking_request(slot.id))
            .await
            .expect("create booking");
        let code = created.reservation.access_code.clone();

        let checked = check_booking(&db, &store, &code).await.expect("check");
        assert_eq!(checked.reservation.id, created.reservation.id);
        assert_eq!(
            checked.slot.as_ref().map(|s| s.id),
            Some(slot.id)
        );
        assert!(checked.allowed_actions.cancellable);
        assert!(checked.allowed_actions.rebookable);

        store
            .set("rebooking_enabled", "false", None)
            .await
            .expect("disable rebooking");
        let checked = check_booking(&db, &store, &code).await.expect("check");
        assert!(checked.allowed_actions.cancellable);
        assert!(!checked.allowed_actions.rebookable);

        store
            .set("rebooking_enabled", "true", None)
            .await
            .expect("enable rebooking");
        cancel_booking(
            &db,
            &store,
            &CancelBookingRequest {
                access_code: code.clone(),
            },
        )
        .await
        .expect("cancel");
        let checked = check_booking(&db, &store, &code).await.expect("check");
        assert_eq!(checked.reservation.status, ReservationStatus::Cancelled);
        assert!(!checked.allowed_actions.cancellable);
        assert!(!checked.allowed_actions.rebookable);

        let err = check_booking(&db, &store, "deadbeefdeadbeefdeadbeefdeadbeef")
            .await
            .expect_err("unknown code");
        assert!(matches!(err, BookingError::ReservationNotFound));
    }

    #[tokio::test]
    async fn test_list_bookings_filters() {
        let db = test_db().await;
        let store = test_store(&db);
        let early = seed_slot(&db, "anna", "2030-06-01", "09:00").await;
        let late = seed_slot(&db, "anna", "2030-06-02", "09:00").await;
        let other = seed_slot(&db, "ben", "2030-06-03", "09:00").await;

        let first = create_booking(&db, &store, &booking_request(early.id))
            .await
            .expect("first booking");
        create_booking(&db, &store, &booking_request(late.id))
            .await
            .expect("second booking");
        create_booking(&db, &store, &booking_request(other.id))
            .await
            .expect("third booking");
        cancel_booking(
            &db,
            &store,
            &CancelBookingRequest {
                access_code: first.reservation.access_code.clone(),
            },
        )
        .await
        .expect("cancel first");

        let all = list_bookings(&db, &ListBookingsQuery::default())
            .await
            .expect("list all");
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|r| r.slot_date.is_some()));

        let annas = list_bookings(
            &db,
            &ListBookingsQuery {
                staff_id: Some("anna".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("list anna");
        assert_eq!(annas.len(), 2);

        let confirmed = list_bookings(
            &db,
            &ListBookingsQuery {
                status: Some(ReservationStatus::Confirmed),
                ..Default::default()
            },
        )
        .await
        .expect("list confirmed");
        assert_eq!(confirmed.len(), 2);

        let from_june_2 = list_bookings(
            &db,
            &ListBookingsQuery {
                date_from: Some("2030-06-02".to_string()),
                date_to: Some("2030-06-03".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("list range");
        assert_eq!(from_june_2.len(), 2);
        assert!(from_june_2
            .iter()
            .all(|r| r.slot_date.as_deref() >= Some("2030-06-02")));
    }
}
