// --- File: crates/slotify_settings/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod routes;
pub mod store;
#[cfg(test)]
mod store_test;

pub use store::{SettingsError, SettingsStore, DEFAULT_SETTINGS, PUBLIC_SETTING_KEYS};
