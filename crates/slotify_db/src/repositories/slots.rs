//! Repository functions for the time slot catalog
//!
//! All slot state transitions here are conditional single-row statements.
//! The affected-row count tells the caller whether it won the transition,
//! which is what the reservation engine builds its no-double-booking
//! guarantee on.

use crate::client::DbClient;
use crate::error::DbError;
use chrono::Utc;
use slotify_common::models::{Slot, SlotStatus};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

/// Initialize the time slot schema
///
/// Creates the `time_slots` table if it doesn't exist. The unique key over
/// `(staff_id, slot_date, start_time)` is what makes bulk creation
/// idempotent.
pub async fn init_schema(db_client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing time slot schema");

    let query = r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            staff_id TEXT NOT NULL,
            slot_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'AVAILABLE',
            created_at TEXT NOT NULL,
            UNIQUE(staff_id, slot_date, start_time)
        )
    "#;

    db_client.execute(query).await?;

    info!("Time slot schema initialized successfully");
    Ok(())
}

fn slot_from_row(row: &AnyRow) -> Result<Slot, DbError> {
    let status: String = row.try_get("status")?;
    Ok(Slot {
        id: row.try_get("id")?,
        staff_id: row.try_get("staff_id")?,
        slot_date: row.try_get("slot_date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        status: status.parse::<SlotStatus>().map_err(DbError::DecodeError)?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a single new slot, created AVAILABLE.
///
/// A violation of the `(staff_id, slot_date, start_time)` unique key
/// surfaces as an error for which [`DbError::is_unique_violation`] is true.
pub async fn insert_slot<'e, E>(
    executor: E,
    staff_id: &str,
    slot_date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<Slot, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    debug!("Inserting slot for staff: {} on {}", staff_id, slot_date);

    let query = r#"
        INSERT INTO time_slots (staff_id, slot_date, start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, 'AVAILABLE', $5)
        RETURNING id, staff_id, slot_date, start_time, end_time, status, created_at
    "#;

    let row = sqlx::query(query)
        .bind(staff_id)
        .bind(slot_date)
        .bind(start_time)
        .bind(end_time)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(executor)
        .await?;

    slot_from_row(&row)
}

/// Insert a slot unless one with the same `(staff_id, slot_date, start_time)`
/// key already exists.
///
/// # Returns
///
/// `true` if a row was inserted, `false` if the key was taken.
pub async fn insert_slot_if_absent<'e, E>(
    executor: E,
    staff_id: &str,
    slot_date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        INSERT INTO time_slots (staff_id, slot_date, start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, 'AVAILABLE', $5)
        ON CONFLICT (staff_id, slot_date, start_time) DO NOTHING
    "#;

    let result = sqlx::query(query)
        .bind(staff_id)
        .bind(slot_date)
        .bind(start_time)
        .bind(end_time)
        .bind(Utc::now().to_rfc3339())
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to insert slot: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Find a slot by its id.
pub async fn find_slot_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Slot>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        SELECT id, staff_id, slot_date, start_time, end_time, status, created_at
        FROM time_slots
        WHERE id = $1
    "#;

    let row = sqlx::query(query).bind(id).fetch_optional(executor).await?;

    row.as_ref().map(slot_from_row).transpose()
}

/// Conditionally move a slot from one status to another.
///
/// The compare-and-swap the reservation engine relies on: the UPDATE only
/// applies while the slot is still in `from`, so under concurrent bookings
/// exactly one caller observes `true`.
///
/// # Returns
///
/// `true` if the transition applied, `false` if the slot was missing or no
/// longer in `from`.
pub async fn set_slot_status_if<'e, E>(
    executor: E,
    id: i64,
    from: SlotStatus,
    to: SlotStatus,
) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    debug!("Transitioning slot {} from {} to {}", id, from, to);

    let query = r#"
        UPDATE time_slots
        SET status = $1
        WHERE id = $2 AND status = $3
    "#;

    let result = sqlx::query(query)
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to transition slot status: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Delete a slot unless it is currently BOOKED.
///
/// # Returns
///
/// `true` if the row was deleted, `false` if it was missing or BOOKED.
pub async fn delete_slot_if_not_booked<'e, E>(executor: E, id: i64) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        DELETE FROM time_slots
        WHERE id = $1 AND status <> $2
    "#;

    let result = sqlx::query(query)
        .bind(id)
        .bind(SlotStatus::Booked.as_str())
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to delete slot: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// List slots, optionally narrowed by owner, day and availability.
///
/// Results are ordered by day and start time.
pub async fn list_slots<'e, E>(
    executor: E,
    staff_id: Option<&str>,
    slot_date: Option<&str>,
    only_available: bool,
) -> Result<Vec<Slot>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let mut sql = String::from(
        "SELECT id, staff_id, slot_date, start_time, end_time, status, created_at FROM time_slots",
    );

    let mut clauses: Vec<String> = Vec::new();
    if staff_id.is_some() {
        clauses.push(format!("staff_id = ${}", clauses.len() + 1));
    }
    if slot_date.is_some() {
        clauses.push(format!("slot_date = ${}", clauses.len() + 1));
    }
    if only_available {
        clauses.push(format!("status = ${}", clauses.len() + 1));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY slot_date, start_time");

    let mut query = sqlx::query(&sql);
    if let Some(staff_id) = staff_id {
        query = query.bind(staff_id);
    }
    if let Some(slot_date) = slot_date {
        query = query.bind(slot_date);
    }
    if only_available {
        query = query.bind(SlotStatus::Available.as_str());
    }

    let rows = query.fetch_all(executor).await?;

    rows.iter().map(slot_from_row).collect()
}
