//! Repository modules for database access
//!
//! This module contains the row-level repository functions for the three
//! tables the service owns. Every function takes a [`sqlx::Executor`], so
//! callers can run it against the pool or inside a transaction as needed.

use crate::error::DbError;
use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};

pub mod reservations;
pub mod settings;
pub mod slots;

/// Decode a nullable TEXT column from an `any`-driver row.
///
/// `AnyRow::try_get::<Option<String>, _>` refuses SQL NULL with a type
/// mismatch, so nullable columns go through a raw null check first.
pub(crate) fn try_get_opt_text(row: &AnyRow, column: &str) -> Result<Option<String>, DbError> {
    let raw = row.try_get_raw(column)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(Some(row.try_get(column)?))
}
