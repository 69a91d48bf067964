// --- File: crates/slotify_notify/src/error.rs ---
use thiserror::Error;

/// Notification-specific error types.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Error occurred while talking to the webhook receiver
    #[error("Webhook request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The webhook receiver answered with a non-success status
    #[error("Webhook receiver returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete notifier configuration
    #[error("Notifier configuration missing or incomplete")]
    ConfigError,
}
