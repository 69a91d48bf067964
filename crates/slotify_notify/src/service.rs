// --- File: crates/slotify_notify/src/service.rs ---
//! Notification service implementations.
//!
//! The engine announces committed reservation changes through the
//! [`NotificationService`] trait. [`WebhookNotifier`] delivers them as JSON
//! POSTs to a configured receiver, [`TracingNotifier`] only logs them and is
//! used whenever no receiver is configured.

use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::NotifyError;
use slotify_common::services::{
    BookingNotice, BoxFuture, BoxedError, NotificationResult, NotificationService,
};
use slotify_common::{create_client, is_notifier_enabled, HTTP_CLIENT};
use slotify_config::AppConfig;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    #[serde(flatten)]
    notice: &'a BookingNotice,
}

/// Delivers booking announcements as JSON POSTs to one webhook URL.
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl WebhookNotifier {
    /// Create a notifier from the `[notifier]` configuration section.
    pub fn new(config: &AppConfig) -> Result<Self, NotifyError> {
        let notifier_config = config.notifier.as_ref().ok_or(NotifyError::ConfigError)?;
        if notifier_config.webhook_url.trim().is_empty() {
            return Err(NotifyError::ConfigError);
        }

        let client = match notifier_config.timeout_seconds {
            Some(secs) => create_client(secs)?,
            None => HTTP_CLIENT.clone(),
        };

        Ok(Self {
            webhook_url: notifier_config.webhook_url.clone(),
            client,
        })
    }

    async fn deliver(
        &self,
        event: &'static str,
        notice: BookingNotice,
    ) -> Result<NotificationResult, NotifyError> {
        info!(
            "Delivering {} for reservation {} to {}",
            event, notice.reservation_id, self.webhook_url
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload {
                event,
                notice: &notice,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!("Webhook receiver returned {}: {}", status, body);
            return Err(NotifyError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        Ok(NotificationResult {
            id: None,
            status: "sent".to_string(),
        })
    }
}

impl NotificationService for WebhookNotifier {
    type Error = NotifyError;

    fn booking_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(self.deliver("booking_confirmed", notice))
    }

    fn booking_cancelled(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(self.deliver("booking_cancelled", notice))
    }

    fn booking_rebooked(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(self.deliver("booking_rebooked", notice))
    }
}

/// Fallback notifier that only writes the announcement to the log.
pub struct TracingNotifier;

impl TracingNotifier {
    fn log(event: &str, notice: &BookingNotice) -> NotificationResult {
        info!(
            "Notification {}: reservation {} for {} on {} at {}",
            event,
            notice.reservation_id,
            notice.customer_name,
            notice.slot.slot_date,
            notice.slot.start_time
        );
        NotificationResult {
            id: None,
            status: "logged".to_string(),
        }
    }
}

impl NotificationService for TracingNotifier {
    type Error = NotifyError;

    fn booking_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move { Ok(Self::log("booking_confirmed", &notice)) })
    }

    fn booking_cancelled(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move { Ok(Self::log("booking_cancelled", &notice)) })
    }

    fn booking_rebooked(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move { Ok(Self::log("booking_rebooked", &notice)) })
    }
}

/// A wrapper that erases the concrete error type of a notification service.
struct BoxedNotificationService<S> {
    inner: S,
}

impl<S> NotificationService for BoxedNotificationService<S>
where
    S: NotificationService,
{
    type Error = BoxedError;

    fn booking_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .booking_confirmed(notice)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn booking_cancelled(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .booking_cancelled(notice)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn booking_rebooked(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .booking_rebooked(notice)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Picks the notifier for this configuration.
///
/// The webhook notifier is used when `use_notifier` is set and a
/// `[notifier]` section with a URL exists, otherwise announcements are
/// only logged. A malformed notifier section degrades to logging as well,
/// with an error in the log, so a typo never takes bookings down.
pub fn create_notification_service(
    config: &Arc<AppConfig>,
) -> Arc<dyn NotificationService<Error = BoxedError>> {
    if is_notifier_enabled(config) {
        match WebhookNotifier::new(config) {
            Ok(notifier) => {
                return Arc::new(BoxedNotificationService { inner: notifier });
            }
            Err(e) => {
                error!("🚨 Failed to create webhook notifier, falling back to log-only: {}", e);
            }
        }
    }
    Arc::new(BoxedNotificationService {
        inner: TracingNotifier,
    })
}
