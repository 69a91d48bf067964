//! Repository functions for reservations
//!
//! Reservations reference the slot they hold by id and carry a denormalized
//! copy of the owning staff id for listing. Row timestamps are written here
//! as RFC 3339 text; the `any` driver has no portable timestamp decoding.

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::try_get_opt_text;
use chrono::Utc;
use serde::Serialize;
use slotify_common::models::{Reservation, ReservationStatus};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

/// Initialize the reservation schema
///
/// Creates the `reservations` table if it doesn't exist.
pub async fn init_schema(db_client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing reservation schema");

    let query = r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slot_id INTEGER NOT NULL,
            staff_id TEXT NOT NULL,
            access_code TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            customer_email TEXT NOT NULL,
            customer_phone TEXT,
            headcount INTEGER NOT NULL DEFAULT 1,
            notes TEXT,
            status TEXT NOT NULL DEFAULT 'CONFIRMED',
            created_at TEXT NOT NULL,
            cancelled_at TEXT
        )
    "#;

    db_client.execute(query).await?;

    info!("Reservation schema initialized successfully");
    Ok(())
}

/// The column values needed to insert a fresh reservation.
#[derive(Debug, Clone)]
pub struct NewReservationRow {
    pub slot_id: i64,
    pub staff_id: String,
    pub access_code: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub headcount: i64,
    pub notes: Option<String>,
}

/// A reservation joined with the coordinates of the slot it holds.
///
/// The slot fields are `None` when the slot has since been deleted, which
/// can happen to cancelled reservations.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRecord {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub slot_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Filter for the administrative reservation listing.
#[derive(Debug, Clone, Default)]
pub struct ReservationListFilter {
    pub staff_id: Option<String>,
    pub status: Option<ReservationStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

fn reservation_from_row(row: &AnyRow) -> Result<Reservation, DbError> {
    let status: String = row.try_get("status")?;
    Ok(Reservation {
        id: row.try_get("id")?,
        slot_id: row.try_get("slot_id")?,
        staff_id: row.try_get("staff_id")?,
        access_code: row.try_get("access_code")?,
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        customer_phone: try_get_opt_text(row, "customer_phone")?,
        headcount: row.try_get("headcount")?,
        notes: try_get_opt_text(row, "notes")?,
        status: status
            .parse::<ReservationStatus>()
            .map_err(DbError::DecodeError)?,
        created_at: row.try_get("created_at")?,
        cancelled_at: try_get_opt_text(row, "cancelled_at")?,
    })
}

const RESERVATION_COLUMNS: &str =
    "id, slot_id, staff_id, access_code, customer_name, customer_email, customer_phone, \
     headcount, notes, status, created_at, cancelled_at";

/// Insert a new CONFIRMED reservation and return the stored row.
pub async fn insert_reservation<'e, E>(
    executor: E,
    new_row: &NewReservationRow,
) -> Result<Reservation, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    debug!("Inserting reservation for slot: {}", new_row.slot_id);

    let query = format!(
        r#"
        INSERT INTO reservations
            (slot_id, staff_id, access_code, customer_name, customer_email,
             customer_phone, headcount, notes, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'CONFIRMED', $9)
        RETURNING {RESERVATION_COLUMNS}
    "#
    );

    let row = sqlx::query(&query)
        .bind(new_row.slot_id)
        .bind(&new_row.staff_id)
        .bind(&new_row.access_code)
        .bind(&new_row.customer_name)
        .bind(&new_row.customer_email)
        .bind(new_row.customer_phone.as_deref())
        .bind(new_row.headcount)
        .bind(new_row.notes.as_deref())
        .bind(Utc::now().to_rfc3339())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            error!("Failed to insert reservation: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    reservation_from_row(&row)
}

/// Find a reservation by its access code.
pub async fn find_reservation_by_code<'e, E>(
    executor: E,
    access_code: &str,
) -> Result<Option<Reservation>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query =
        format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE access_code = $1");

    let row = sqlx::query(&query)
        .bind(access_code)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(reservation_from_row).transpose()
}

/// Find a reservation by its id.
pub async fn find_reservation_by_id<'e, E>(
    executor: E,
    id: i64,
) -> Result<Option<Reservation>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1");

    let row = sqlx::query(&query).bind(id).fetch_optional(executor).await?;

    row.as_ref().map(reservation_from_row).transpose()
}

/// Mark a reservation CANCELLED and record when.
pub async fn mark_reservation_cancelled<'e, E>(executor: E, id: i64) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        UPDATE reservations
        SET status = 'CANCELLED', cancelled_at = $1
        WHERE id = $2
    "#;

    let result = sqlx::query(query)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to cancel reservation: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Set a reservation back to CONFIRMED and clear its cancellation timestamp.
pub async fn reinstate_reservation<'e, E>(executor: E, id: i64) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        UPDATE reservations
        SET status = 'CONFIRMED', cancelled_at = NULL
        WHERE id = $1
    "#;

    let result = sqlx::query(query)
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to reinstate reservation: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Write a plain status change with no slot side effects.
pub async fn set_reservation_status<'e, E>(
    executor: E,
    id: i64,
    status: ReservationStatus,
) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        UPDATE reservations
        SET status = $1
        WHERE id = $2
    "#;

    let result = sqlx::query(query)
        .bind(status.as_str())
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to update reservation status: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Point a reservation at a new slot, rotating its access code.
pub async fn move_reservation<'e, E>(
    executor: E,
    id: i64,
    new_slot_id: i64,
    new_staff_id: &str,
    new_access_code: &str,
) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    debug!("Moving reservation {} to slot {}", id, new_slot_id);

    let query = r#"
        UPDATE reservations
        SET slot_id = $1, staff_id = $2, access_code = $3
        WHERE id = $4
    "#;

    let result = sqlx::query(query)
        .bind(new_slot_id)
        .bind(new_staff_id)
        .bind(new_access_code)
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to move reservation: {}", e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Count CONFIRMED reservations held by one customer email.
pub async fn count_confirmed_by_email<'e, E>(executor: E, email: &str) -> Result<i64, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        SELECT COUNT(*) AS cnt
        FROM reservations
        WHERE customer_email = $1 AND status = $2
    "#;

    let row = sqlx::query(query)
        .bind(email)
        .bind(ReservationStatus::Confirmed.as_str())
        .fetch_one(executor)
        .await?;

    Ok(row.try_get("cnt")?)
}

/// List reservations for the administrative view, joined with their slots.
///
/// Results are ordered by slot day and start time.
pub async fn list_reservations<'e, E>(
    executor: E,
    filter: &ReservationListFilter,
) -> Result<Vec<ReservationRecord>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let mut sql = String::from(
        "SELECT r.id, r.slot_id, r.staff_id, r.access_code, r.customer_name, \
         r.customer_email, r.customer_phone, r.headcount, r.notes, r.status, \
         r.created_at, r.cancelled_at, \
         t.slot_date AS slot_date, t.start_time AS start_time, t.end_time AS end_time \
         FROM reservations r LEFT JOIN time_slots t ON t.id = r.slot_id",
    );

    let mut clauses: Vec<String> = Vec::new();
    if filter.staff_id.is_some() {
        clauses.push(format!("r.staff_id = ${}", clauses.len() + 1));
    }
    if filter.status.is_some() {
        clauses.push(format!("r.status = ${}", clauses.len() + 1));
    }
    if filter.date_from.is_some() {
        clauses.push(format!("t.slot_date >= ${}", clauses.len() + 1));
    }
    if filter.date_to.is_some() {
        clauses.push(format!("t.slot_date <= ${}", clauses.len() + 1));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY t.slot_date, t.start_time");

    let mut query = sqlx::query(&sql);
    if let Some(staff_id) = filter.staff_id.as_deref() {
        query = query.bind(staff_id);
    }
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    if let Some(date_from) = filter.date_from.as_deref() {
        query = query.bind(date_from);
    }
    if let Some(date_to) = filter.date_to.as_deref() {
        query = query.bind(date_to);
    }

    let rows = query.fetch_all(executor).await?;

    rows.iter()
        .map(|row| {
            Ok(ReservationRecord {
                reservation: reservation_from_row(row)?,
                slot_date: try_get_opt_text(row, "slot_date")?,
                start_time: try_get_opt_text(row, "start_time")?,
                end_time: try_get_opt_text(row, "end_time")?,
            })
        })
        .collect()
}
