// --- File: crates/slotify_booking/src/notify.rs ---
//! Fire-and-forget notification dispatch.
//!
//! Notifications never influence the outcome of an operation. After a
//! transaction has committed, the event is handed to the notification
//! service on a spawned task, and a delivery failure is logged and
//! dropped.

use slotify_common::models::{Reservation, Slot};
use slotify_common::services::{BookingNotice, BoxedError, NotificationService, NoticeSlot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handle to whichever notification backend is configured.
pub type SharedNotifier = Arc<dyn NotificationService<Error = BoxedError>>;

/// The booking events the notifier is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    Confirmed,
    Cancelled,
    Rebooked,
}

fn notice_slot(slot: &Slot) -> NoticeSlot {
    NoticeSlot {
        staff_id: slot.staff_id.clone(),
        slot_date: slot.slot_date.clone(),
        start_time: slot.start_time.clone(),
        end_time: slot.end_time.clone(),
    }
}

/// Builds the notification payload for a reservation and its slot.
pub fn build_notice(
    reservation: &Reservation,
    slot: &Slot,
    previous_slot: Option<&Slot>,
) -> BookingNotice {
    BookingNotice {
        reservation_id: reservation.id,
        access_code: reservation.access_code.clone(),
        customer_name: reservation.customer_name.clone(),
        customer_email: reservation.customer_email.clone(),
        customer_phone: reservation.customer_phone.clone(),
        headcount: reservation.headcount,
        slot: notice_slot(slot),
        previous_slot: previous_slot.map(notice_slot),
    }
}

/// Hands `notice` to the notification service on a background task and
/// returns immediately.
pub fn dispatch(notifier: &SharedNotifier, event: BookingEvent, notice: BookingNotice) {
    let notifier = Arc::clone(notifier);
    let reservation_id = notice.reservation_id;
    tokio::spawn(async move {
        let result = match event {
            BookingEvent::Confirmed => notifier.booking_confirmed(notice).await,
            BookingEvent::Cancelled => notifier.booking_cancelled(notice).await,
            BookingEvent::Rebooked => notifier.booking_rebooked(notice).await,
        };
        match result {
            Ok(outcome) => debug!(
                "Notification for reservation {} dispatched: {}",
                reservation_id, outcome.status
            ),
            Err(err) => warn!(
                "Notification for reservation {} failed: {}",
                reservation_id, err
            ),
        }
    });
}
