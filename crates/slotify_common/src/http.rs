// --- File: crates/slotify_common/src/http.rs ---
//! Outbound HTTP plumbing shared by crates that call external services.

use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for outbound HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process-wide HTTP client with the default timeout.
///
/// Building a reqwest client is not free; callers without special needs
/// clone this one instead.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
});

/// Build a dedicated client with an explicit request timeout.
pub fn create_client(timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}
