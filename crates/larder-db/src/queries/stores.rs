//! Database query functions for the `stores` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::Store;

/// Insert a store by name, returning the existing row when the name is taken.
pub async fn upsert_store<'e>(exec: impl PgExecutor<'e>, name: &str) -> Result<Store> {
    let store = sqlx::query_as::<_, Store>(
        "INSERT INTO stores (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING *",
    )
    .bind(name)
    .fetch_one(exec)
    .await
    .with_context(|| format!("failed to upsert store {name:?}"))?;

    Ok(store)
}

/// List every store, ordered by name.
pub async fn list_stores<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>("SELECT * FROM stores ORDER BY name")
        .fetch_all(exec)
        .await
        .context("failed to list stores")?;

    Ok(stores)
}

/// Fetch a store by its unique name.
pub async fn get_store_by_name<'e>(exec: impl PgExecutor<'e>, name: &str) -> Result<Option<Store>> {
    let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE name = $1")
        .bind(name)
        .fetch_optional(exec)
        .await
        .with_context(|| format!("failed to fetch store {name:?}"))?;

    Ok(store)
}
