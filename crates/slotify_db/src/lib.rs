//! Database integration for Slotify
//!
//! This crate provides a database client that is designed to be database agnostic,
//! using SQLx as the underlying database library. It supports SQLite, PostgreSQL,
//! and MySQL databases through feature flags, and holds every piece of SQL the
//! workspace runs: schema bootstrap plus row-level repository functions for
//! slots, reservations and settings.
//!
//! Repository functions are generic over [`sqlx::Executor`], so the same
//! function serves reads on the pool and writes inside a transaction.
//!
//! # Features
//!
//! - Database agnostic design
//! - Connection pooling
//! - Integration with the Slotify configuration system
//! - Support for SQLite, PostgreSQL, and MySQL
//!
//! # Usage
//!
//! Add the crate to your dependencies:
//!
//! ```toml
//! [dependencies]
//! slotify-db = { version = "0.1.0" }
//! ```
//!
//! To use a specific database backend:
//!
//! ```toml
//! [dependencies]
//! slotify-db = { version = "0.1.0", features = ["postgres"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use slotify_db::DbClient;
//!
//! async fn setup_db() -> Result<DbClient, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_url("sqlite://data/slotify.db").await?;
//!     slotify_db::slots::init_schema(&db_client).await?;
//!     Ok(db_client)
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;

// Re-export the client, factory and error types for ease of use
pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use factory::DbClientFactory;

// Re-export the repository modules for ease of use
pub use repositories::{reservations, settings, slots};
