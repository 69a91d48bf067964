//! Repository functions for the settings key/value store

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::try_get_opt_text;
use slotify_common::models::Setting;
use sqlx::Row;
use tracing::{debug, error, info};

/// Initialize the settings schema
///
/// Creates the `settings` table if it doesn't exist.
pub async fn init_schema(db_client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing settings schema");

    let query = r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            description TEXT
        )
    "#;

    db_client.execute(query).await?;

    info!("Settings schema initialized successfully");
    Ok(())
}

/// Load every settings row.
pub async fn fetch_all_settings<'e, E>(executor: E) -> Result<Vec<Setting>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = "SELECT key, value, description FROM settings";

    let rows = sqlx::query(query).fetch_all(executor).await?;

    rows.iter()
        .map(|row| {
            Ok(Setting {
                key: row.try_get("key")?,
                value: row.try_get("value")?,
                description: try_get_opt_text(row, "description")?,
            })
        })
        .collect()
}

/// Insert or overwrite one settings row.
///
/// A `None` description leaves any stored description in place.
pub async fn upsert_setting<'e, E>(
    executor: E,
    key: &str,
    value: &str,
    description: Option<&str>,
) -> Result<(), DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    debug!("Upserting setting: {}", key);

    let query = r#"
        INSERT INTO settings (key, value, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE
        SET value = excluded.value,
            description = COALESCE(excluded.description, settings.description)
    "#;

    sqlx::query(query)
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to upsert setting {}: {}", key, e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(())
}

/// Insert one settings row only when the key is not present yet.
///
/// Returns `true` when a row was created. Existing values are left
/// untouched, so seeding defaults never clobbers an admin edit.
pub async fn insert_setting_if_absent<'e, E>(
    executor: E,
    key: &str,
    value: &str,
    description: Option<&str>,
) -> Result<bool, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = r#"
        INSERT INTO settings (key, value, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO NOTHING
    "#;

    let result = sqlx::query(query)
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(executor)
        .await
        .map_err(|e| {
            error!("Failed to seed setting {}: {}", key, e);
            DbError::QueryError(e.to_string())
        })?;

    Ok(result.rows_affected() > 0)
}

/// Load a single settings row by key.
pub async fn find_setting_by_key<'e, E>(executor: E, key: &str) -> Result<Option<Setting>, DbError>
where
    E: sqlx::Executor<'e, Database = sqlx::Any>,
{
    let query = "SELECT key, value, description FROM settings WHERE key = $1";

    let row = sqlx::query(query)
        .bind(key)
        .fetch_optional(executor)
        .await?;

    row.map(|row| {
        Ok(Setting {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            description: try_get_opt_text(&row, "description")?,
        })
    })
    .transpose()
}
