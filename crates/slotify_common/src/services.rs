// --- File: crates/slotify_common/src/services.rs ---
//! The boundary between the reservation engine and external delivery.
//!
//! The engine only knows the [`NotificationService`] trait and its payload
//! types; whether announcements go to a webhook, a mail gateway or just
//! the log is decided at startup. Keeping the trait here lets the engine
//! crates depend on the abstraction without pulling in any HTTP client.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by the trait methods, so implementations stay
/// object-safe.
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Type-erased service error, so callers can hold a `dyn
/// NotificationService` without naming the concrete error type.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for notification service operations.
///
/// This trait defines the announcements the reservation engine makes after a
/// state change has been committed. Delivery is best-effort: callers log
/// failures and never let them alter the outcome of the request that
/// triggered them.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Announce a freshly created reservation.
    fn booking_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;

    /// Announce a cancelled reservation.
    fn booking_cancelled(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;

    /// Announce a reservation moved to a different slot.
    fn booking_rebooked(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Slot coordinates carried inside a notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeSlot {
    /// Owner of the slot.
    pub staff_id: String,
    /// The calendar day, `YYYY-MM-DD`.
    pub slot_date: String,
    /// Start of the slot, `HH:MM`.
    pub start_time: String,
    /// End of the slot, `HH:MM`.
    pub end_time: String,
}

/// Snapshot of a reservation handed to the notification boundary.
///
/// Carries everything the delivery side needs, including the access code,
/// so it never has to call back into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotice {
    /// The reservation the announcement is about.
    pub reservation_id: i64,
    /// Current access code of the reservation.
    pub access_code: String,
    /// Customer contact details.
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Number of people attending.
    pub headcount: i64,
    /// The slot the reservation now holds.
    pub slot: NoticeSlot,
    /// The slot the reservation was moved away from, on rebooks.
    pub previous_slot: Option<NoticeSlot>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Identifier assigned by the receiving system, when it reports one.
    pub id: Option<String>,
    /// The status of the notification.
    pub status: String,
}
