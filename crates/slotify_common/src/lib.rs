// --- File: crates/slotify_common/src/lib.rs ---

// Declare modules within this crate
pub mod models; // Shared domain models
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod services; // Service abstractions
pub mod logging; // Logging utilities
pub mod features; // Feature flag handling
pub mod auth; // API key authentication

// Re-export error types and utilities for easier access
pub use error::{ApiError, ErrorKind, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::{create_client, HTTP_CLIENT};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// Re-export feature flag handling utilities for easier access
pub use features::is_notifier_enabled;

// Re-export auth utilities for easier access
pub use auth::{api_key_auth_middleware, ApiKeyAuthState, Role};

// This crate provides common functionality that can be used across the application.
// It includes shared models, error handling, service abstractions and auth plumbing.
