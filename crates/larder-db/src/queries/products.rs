//! Database query functions for the `products` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct<'a> {
    pub store_id: Uuid,
    pub base_ingredient_id: Option<Uuid>,
    pub commercial_name: &'a str,
    pub unit_price: f64,
    pub package_grams: i32,
    pub price_per_kg: f64,
    pub image_url: Option<&'a str>,
}

/// Insert a product, or refresh price and packaging when the store already
/// lists a product with the same commercial name.
pub async fn upsert_product<'e>(
    exec: impl PgExecutor<'e>,
    new: &NewProduct<'_>,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products \
             (store_id, base_ingredient_id, commercial_name, unit_price, \
              package_grams, price_per_kg, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (store_id, commercial_name) DO UPDATE SET \
             base_ingredient_id = EXCLUDED.base_ingredient_id, \
             unit_price = EXCLUDED.unit_price, \
             package_grams = EXCLUDED.package_grams, \
             price_per_kg = EXCLUDED.price_per_kg, \
             image_url = EXCLUDED.image_url \
         RETURNING *",
    )
    .bind(new.store_id)
    .bind(new.base_ingredient_id)
    .bind(new.commercial_name)
    .bind(new.unit_price)
    .bind(new.package_grams)
    .bind(new.price_per_kg)
    .bind(new.image_url)
    .fetch_one(exec)
    .await
    .with_context(|| format!("failed to upsert product {:?}", new.commercial_name))?;

    Ok(product)
}

/// List every product in catalog order (store, then commercial name).
///
/// The planner breaks price-per-kg ties by this order.
pub async fn list_products<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT p.* FROM products p \
         JOIN stores s ON s.id = p.store_id \
         ORDER BY s.name, p.commercial_name",
    )
    .fetch_all(exec)
    .await
    .context("failed to list products")?;

    Ok(rows)
}
