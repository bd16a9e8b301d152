//! Database query functions for the `base_ingredients` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::BaseIngredient;

/// Fields for inserting or refreshing a base ingredient.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub kcal_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
}

/// Insert an ingredient, or refresh its category and macros if the name
/// already exists.
pub async fn upsert_ingredient<'e>(
    exec: impl PgExecutor<'e>,
    new: &NewIngredient<'_>,
) -> Result<BaseIngredient> {
    let ingredient = sqlx::query_as::<_, BaseIngredient>(
        "INSERT INTO base_ingredients \
             (name, category, kcal_per_100g, protein_per_100g, fat_per_100g, carbs_per_100g) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (name) DO UPDATE SET \
             category = EXCLUDED.category, \
             kcal_per_100g = EXCLUDED.kcal_per_100g, \
             protein_per_100g = EXCLUDED.protein_per_100g, \
             fat_per_100g = EXCLUDED.fat_per_100g, \
             carbs_per_100g = EXCLUDED.carbs_per_100g \
         RETURNING *",
    )
    .bind(new.name)
    .bind(new.category)
    .bind(new.kcal_per_100g)
    .bind(new.protein_per_100g)
    .bind(new.fat_per_100g)
    .bind(new.carbs_per_100g)
    .fetch_one(exec)
    .await
    .with_context(|| format!("failed to upsert ingredient {:?}", new.name))?;

    Ok(ingredient)
}

/// List every base ingredient, ordered by name.
pub async fn list_ingredients<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<BaseIngredient>> {
    let rows = sqlx::query_as::<_, BaseIngredient>("SELECT * FROM base_ingredients ORDER BY name")
        .fetch_all(exec)
        .await
        .context("failed to list ingredients")?;

    Ok(rows)
}
