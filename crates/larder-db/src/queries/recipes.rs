//! Database query functions for recipes, their ingredient lists and their
//! per-store cost records.

use anyhow::{Context, Result};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::models::{Recipe, RecipeIngredient, RecipeStoreCost};

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub prep_minutes: i32,
    pub suits_oven: bool,
    pub suits_pan: bool,
    pub suits_airfryer: bool,
    pub suits_microwave: bool,
    pub suits_tupper: bool,
}

/// Per-100g macro values written back after recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacroColumns {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Insert a recipe, or refresh its metadata when the title already exists.
/// Macro columns are left untouched; see [`update_recipe_macros`].
pub async fn upsert_recipe<'e>(exec: impl PgExecutor<'e>, new: &NewRecipe<'_>) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes \
             (title, prep_minutes, suits_oven, suits_pan, \
              suits_airfryer, suits_microwave, suits_tupper) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (title) DO UPDATE SET \
             prep_minutes = EXCLUDED.prep_minutes, \
             suits_oven = EXCLUDED.suits_oven, \
             suits_pan = EXCLUDED.suits_pan, \
             suits_airfryer = EXCLUDED.suits_airfryer, \
             suits_microwave = EXCLUDED.suits_microwave, \
             suits_tupper = EXCLUDED.suits_tupper \
         RETURNING *",
    )
    .bind(new.title)
    .bind(new.prep_minutes)
    .bind(new.suits_oven)
    .bind(new.suits_pan)
    .bind(new.suits_airfryer)
    .bind(new.suits_microwave)
    .bind(new.suits_tupper)
    .fetch_one(exec)
    .await
    .with_context(|| format!("failed to upsert recipe {:?}", new.title))?;

    Ok(recipe)
}

/// Replace the ordered ingredient list of a recipe.
///
/// Takes a connection so callers can run it inside their transaction.
pub async fn replace_recipe_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    requirements: &[(Uuid, i32)],
) -> Result<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await
        .context("failed to clear recipe ingredients")?;

    for (position, (ingredient_id, grams)) in requirements.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, position, base_ingredient_id, grams) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(recipe_id)
        .bind(position as i32)
        .bind(ingredient_id)
        .bind(grams)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("failed to insert ingredient #{position} of recipe {recipe_id}"))?;
    }

    Ok(())
}

/// Store a recomputed per-100g macro profile.
pub async fn update_recipe_macros<'e>(
    exec: impl PgExecutor<'e>,
    recipe_id: Uuid,
    macros: MacroColumns,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE recipes SET kcal_per_100g = $1, protein_per_100g = $2, \
             fat_per_100g = $3, carbs_per_100g = $4 \
         WHERE id = $5",
    )
    .bind(macros.kcal)
    .bind(macros.protein)
    .bind(macros.fat)
    .bind(macros.carbs)
    .bind(recipe_id)
    .execute(exec)
    .await
    .context("failed to update recipe macros")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("recipe {recipe_id} not found");
    }

    Ok(())
}

/// Write the cost record for one (recipe, store) pair.
pub async fn upsert_store_cost<'e>(
    exec: impl PgExecutor<'e>,
    record: &RecipeStoreCost,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO recipe_store_costs (recipe_id, store_id, cost, feasible) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (recipe_id, store_id) DO UPDATE SET \
             cost = EXCLUDED.cost, feasible = EXCLUDED.feasible",
    )
    .bind(record.recipe_id)
    .bind(record.store_id)
    .bind(record.cost)
    .bind(record.feasible)
    .execute(exec)
    .await
    .context("failed to upsert recipe store cost")?;

    Ok(())
}

/// List every recipe, ordered by title.
pub async fn list_recipes<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY title")
        .fetch_all(exec)
        .await
        .context("failed to list recipes")?;

    Ok(rows)
}

/// List every ingredient requirement of every recipe, in recipe order.
pub async fn list_recipe_ingredients<'e>(
    exec: impl PgExecutor<'e>,
) -> Result<Vec<RecipeIngredient>> {
    let rows = sqlx::query_as::<_, RecipeIngredient>(
        "SELECT * FROM recipe_ingredients ORDER BY recipe_id, position",
    )
    .fetch_all(exec)
    .await
    .context("failed to list recipe ingredients")?;

    Ok(rows)
}

/// List every per-store cost record.
pub async fn list_store_costs<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<RecipeStoreCost>> {
    let rows = sqlx::query_as::<_, RecipeStoreCost>(
        "SELECT * FROM recipe_store_costs ORDER BY recipe_id, store_id",
    )
    .fetch_all(exec)
    .await
    .context("failed to list recipe store costs")?;

    Ok(rows)
}
