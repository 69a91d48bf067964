// --- File: crates/slotify_booking/tests/booking_flow_tests.rs ---
//! End-to-end tests for the reservation engine against a real SQLite file.
//!
//! The concurrency tests race whole transactions against each other, so
//! they run on a multi-threaded runtime.

use slotify_booking::logic::{
    cancel_booking, check_booking, create_booking, list_bookings, rebook_booking, BookingError,
    CancelBookingRequest, CreateBookingRequest, ListBookingsQuery, RebookBookingRequest,
};
use slotify_common::models::{ReservationStatus, Slot, SlotStatus};
use slotify_db::{
    reservations as reservations_repo, settings as settings_repo, slots as slots_repo, DbClient,
};
use slotify_settings::SettingsStore;
use std::sync::Arc;
use std::time::Duration;

async fn test_db() -> DbClient {
    let path = std::env::temp_dir().join(format!(
        "slotify_flow_test_{}.db",
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

fn test_store(db: &DbClient) -> Arc<SettingsStore> {
    Arc::new(SettingsStore::with_ttl(db.clone(), Duration::ZERO))
}

async fn seed_slot(db: &DbClient, staff_id: &str, start: &str, end: &str) -> Slot {
    slots_repo::insert_slot(db.pool(), staff_id, "2030-06-01", start, end)
        .await
        .expect("insert slot")
}

fn booking_request(slot_id: i64, email: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        slot_id,
        customer_name: "Jane Doe".to_string(),
        customer_email: email.to_string(),
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

/// Five customers race for one slot. Exactly one wins, the rest get a
/// conflict, and exactly one reservation row exists afterwards.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_claim_slot_exactly_once() {
    let db = test_db().await;
    let store = test_store(&db);
    let slot = seed_slot(&db, "anna", "09:00", "09:30").await;

    let mut handles = Vec::new();
    for i in 0..5 {
        let db = db.clone();
        let store = Arc::clone(&store);
        let slot_id = slot.id;
        handles.push(tokio::spawn(async move {
            create_booking(
                &db,
                &store,
                &booking_request(slot_id, &format!("customer{i}@example.com")),
            )
            .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(response) => {
                successes += 1;
                assert_eq!(response.reservation.slot_id, slot.id);
            }
            Err(BookingError::SlotAlreadyBooked(id)) => {
                conflicts += 1;
                assert_eq!(id, slot.id);
            }
            Err(other) => panic!("unexpected error under contention: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 4);

    assert_eq!(slot_status(&db, slot.id).await, SlotStatus::Booked);
    let records = list_bookings(&db, &ListBookingsQuery::default())
        .await
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].reservation.status,
        ReservationStatus::Confirmed
    );
}

/// A create and a rebook race for the same free slot. Whoever loses gets
/// a conflict and the winner's claim is the only one standing.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_and_rebook_contend_for_one_slot() {
    let db = test_db().await;
    let store = test_store(&db);
    let held = seed_slot(&db, "anna", "09:00", "09:30").await;
    let contested = seed_slot(&db, "anna", "10:00", "10:30").await;

    let original = create_booking(&db, &store, &booking_request(held.id, "jane@example.com"))
        .await
        .expect("initial booking");
    let code = original.reservation.access_code.clone();

    let rebook = {
        let db = db.clone();
        let store = Arc::clone(&store);
        let contested_id = contested.id;
        tokio::spawn(async move {
            rebook_booking(
                &db,
                &store,
                &RebookBookingRequest {
                    access_code: code,
                    new_slot_id: contested_id,
                },
            )
            .await
        })
    };
    let create = {
        let db = db.clone();
        let store = Arc::clone(&store);
        let contested_id = contested.id;
        tokio::spawn(async move {
            create_booking(
                &db,
                &store,
                &booking_request(contested_id, "ben@example.com"),
            )
            .await
        })
    };

    let rebook_outcome = rebook.await.expect("rebook task");
    let create_outcome = create.await.expect("create task");

    let rebook_won = match &rebook_outcome {
        Ok(_) => true,
        Err(BookingError::SlotAlreadyBooked(id)) => {
            assert_eq!(*id, contested.id);
            false
        }
        Err(other) => panic!("unexpected rebook error: {other}"),
    };
    let create_won = match &create_outcome {
        Ok(_) => true,
        Err(BookingError::SlotAlreadyBooked(id)) => {
            assert_eq!(*id, contested.id);
            false
        }
        Err(other) => panic!("unexpected create error: {other}"),
    };
    assert!(
        rebook_won != create_won,
        "exactly one contender must win the slot"
    );

    assert_eq!(slot_status(&db, contested.id).await, SlotStatus::Booked);
    if rebook_won {
        // The reservation moved, its old slot is free again.
        assert_eq!(slot_status(&db, held.id).await, SlotStatus::Available);
    } else {
        // The move failed, the reservation kept its old slot.
        assert_eq!(slot_status(&db, held.id).await, SlotStatus::Booked);
        let kept = reservations_repo::find_reservation_by_id(db.pool(), original.reservation.id)
            .await
            .expect("lookup")
            .expect("reservation exists");
        assert_eq!(kept.slot_id, held.id);
    }

    let records = list_bookings(&db, &ListBookingsQuery::default())
        .await
        .expect("list");
    let holders: Vec<_> = records
        .iter()
        .filter(|r| r.reservation.slot_id == contested.id)
        .collect();
    assert_eq!(holders.len(), 1);
}

/// The whole customer journey: book, look up, move, cancel.
#[tokio::test]
async fn test_booking_lifecycle() {
    let db = test_db().await;
    let store = test_store(&db);
    let first = seed_slot(&db, "anna", "09:00", "09:30").await;
    let second = seed_slot(&db, "ben", "10:00", "10:30").await;

    let created = create_booking(&db, &store, &booking_request(first.id, "jane@example.com"))
        .await
        .expect("create");
    let checked = check_booking(&db, &store, &created.reservation.access_code)
        .await
        .expect("check");
    assert!(checked.allowed_actions.cancellable);
    assert!(checked.allowed_actions.rebookable);

    let moved = rebook_booking(
        &db,
        &store,
        &RebookBookingRequest {
            access_code: created.reservation.access_code.clone(),
            new_slot_id: second.id,
        },
    )
    .await
    .expect("rebook");
    assert_ne!(moved.reservation.access_code, created.reservation.access_code);
    let err = check_booking(&db, &store, &created.reservation.access_code)
        .await
        .expect_err("old code is dead");
    assert!(matches!(err, BookingError::ReservationNotFound));

    let cancelled = cancel_booking(
        &db,
        &store,
        &CancelBookingRequest {
            access_code: moved.reservation.access_code.clone(),
        },
    )
    .await
    .expect("cancel");
    assert_eq!(cancelled.reservation.status, ReservationStatus::Cancelled);
    assert_eq!(slot_status(&db, first.id).await, SlotStatus::Available);
    assert_eq!(slot_status(&db, second.id).await, SlotStatus::Available);

    let records = list_bookings(
        &db,
        &ListBookingsQuery {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
    .expect("list cancelled");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reservation.id, created.reservation.id);
}
