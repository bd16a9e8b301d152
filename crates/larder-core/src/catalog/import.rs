//! Writing a validated catalog file to the database and refreshing the
//! derived recipe columns.

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use larder_db::models::RecipeStoreCost;
use larder_db::queries::{ingredients, products, profiles, recipes, stores};
use larder_db::queries::ingredients::NewIngredient;
use larder_db::queries::products::NewProduct;
use larder_db::queries::profiles::NewProfile;
use larder_db::queries::recipes::{MacroColumns, NewRecipe};

use super::load::load_catalog;
use super::parser::parse_appliances;
use super::price_per_kg;
use super::toml_format::CatalogToml;
use crate::costing::recompute_store_costs;
use crate::nutrition::recipe_macros;

/// Row counts written by [`import_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub stores: usize,
    pub ingredients: usize,
    pub products: usize,
    pub recipes: usize,
    pub profiles: usize,
}

/// Row counts written by [`recompute_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecomputeSummary {
    pub recipes: usize,
    pub cost_records: usize,
    pub feasible: usize,
}

/// Upsert everything in `file` by natural key in one transaction, then
/// recompute macros and store costs.
///
/// `file` must already be validated (see
/// [`parse_catalog_toml`](super::parser::parse_catalog_toml)).
pub async fn import_catalog(pool: &PgPool, file: &CatalogToml) -> Result<ImportSummary> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let mut store_ids: HashMap<&str, Uuid> = HashMap::new();
    for store in &file.stores {
        let row = stores::upsert_store(&mut *tx, &store.name).await?;
        store_ids.insert(store.name.as_str(), row.id);
    }

    let mut ingredient_ids: HashMap<&str, Uuid> = HashMap::new();
    for ingredient in &file.ingredients {
        let row = ingredients::upsert_ingredient(
            &mut *tx,
            &NewIngredient {
                name: &ingredient.name,
                category: &ingredient.category,
                kcal_per_100g: ingredient.kcal,
                protein_per_100g: ingredient.protein,
                fat_per_100g: ingredient.fat,
                carbs_per_100g: ingredient.carbs,
            },
        )
        .await?;
        ingredient_ids.insert(ingredient.name.as_str(), row.id);
    }

    for product in &file.products {
        let store_id = *store_ids
            .get(product.store.as_str())
            .with_context(|| {
                format!("product {:?}: unknown store {:?}", product.name, product.store)
            })?;
        let base_ingredient_id = match &product.ingredient {
            Some(name) => Some(
                *ingredient_ids
                    .get(name.as_str())
                    .with_context(|| {
                        format!("product {:?}: unknown ingredient {name:?}", product.name)
                    })?,
            ),
            None => None,
        };
        let package_grams = i32::try_from(product.grams)
            .with_context(|| format!("product {:?}: package weight out of range", product.name))?;
        let per_kg = price_per_kg(product.price, product.grams).with_context(|| {
            format!("product {:?}: package weight must be positive", product.name)
        })?;
        products::upsert_product(
            &mut *tx,
            &NewProduct {
                store_id,
                base_ingredient_id,
                commercial_name: &product.name,
                unit_price: product.price,
                package_grams,
                price_per_kg: per_kg,
                image_url: product.image.as_deref(),
            },
        )
        .await?;
    }

    for recipe in &file.recipes {
        let suits = parse_appliances(&recipe.title, &recipe.appliances)?;
        let row = recipes::upsert_recipe(
            &mut *tx,
            &NewRecipe {
                title: &recipe.title,
                prep_minutes: recipe.prep_minutes,
                suits_oven: suits.oven,
                suits_pan: suits.pan,
                suits_airfryer: suits.airfryer,
                suits_microwave: suits.microwave,
                suits_tupper: suits.tupper,
            },
        )
        .await?;

        let mut requirements = Vec::with_capacity(recipe.ingredients.len());
        for item in &recipe.ingredients {
            let id = *ingredient_ids
                .get(item.name.as_str())
                .with_context(|| {
                    format!("recipe {:?}: unknown ingredient {:?}", recipe.title, item.name)
                })?;
            let grams = i32::try_from(item.grams)
                .with_context(|| {
                    format!("recipe {:?}: amount of {:?} out of range", recipe.title, item.name)
                })?;
            requirements.push((id, grams));
        }
        recipes::replace_recipe_ingredients(&mut *tx, row.id, &requirements).await?;
    }

    for profile in &file.profiles {
        let kitchen = parse_appliances(&profile.subject, &profile.kitchen)?;
        profiles::upsert_profile(
            &mut *tx,
            &NewProfile {
                subject: &profile.subject,
                energy_kcal: profile.energy_kcal,
                protein_g: profile.protein_g,
                fat_g: profile.fat_g,
                carbs_g: profile.carbs_g,
                weekly_budget: profile.weekly_budget,
                has_oven: kitchen.oven,
                has_pan: kitchen.pan,
                has_airfryer: kitchen.airfryer,
                has_microwave: kitchen.microwave,
            },
        )
        .await?;

        let selected = profile
            .stores
            .iter()
            .map(|name| {
                store_ids
                    .get(name.as_str())
                    .copied()
                    .with_context(|| {
                        format!("profile {:?}: unknown store {name:?}", profile.subject)
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        profiles::set_profile_stores(&mut *tx, &profile.subject, &selected).await?;
    }

    tx.commit().await.context("failed to commit catalog import")?;

    let summary = ImportSummary {
        stores: file.stores.len(),
        ingredients: file.ingredients.len(),
        products: file.products.len(),
        recipes: file.recipes.len(),
        profiles: file.profiles.len(),
    };
    info!(
        stores = summary.stores,
        ingredients = summary.ingredients,
        products = summary.products,
        recipes = summary.recipes,
        profiles = summary.profiles,
        "catalog imported"
    );

    recompute_catalog(pool).await?;
    Ok(summary)
}

/// Recompute every recipe's macro profile and per-store cost records from
/// the current catalog.
pub async fn recompute_catalog(pool: &PgPool) -> Result<RecomputeSummary> {
    let catalog = load_catalog(pool).await?;
    let records = recompute_store_costs(&catalog);

    let mut tx = pool.begin().await.context("failed to begin transaction")?;
    for recipe in &catalog.recipes {
        let macros = recipe_macros(&catalog, &recipe.requirements);
        recipes::update_recipe_macros(
            &mut *tx,
            recipe.id,
            MacroColumns {
                kcal: macros.kcal,
                protein: macros.protein,
                fat: macros.fat,
                carbs: macros.carbs,
            },
        )
        .await?;
    }
    for record in &records {
        recipes::upsert_store_cost(
            &mut *tx,
            &RecipeStoreCost {
                recipe_id: record.recipe,
                store_id: record.store,
                cost: record.cost,
                feasible: record.feasible,
            },
        )
        .await?;
    }
    tx.commit().await.context("failed to commit recomputed catalog")?;

    let summary = RecomputeSummary {
        recipes: catalog.recipes.len(),
        cost_records: records.len(),
        feasible: records.iter().filter(|r| r.feasible).count(),
    };
    info!(
        recipes = summary.recipes,
        cost_records = summary.cost_records,
        feasible = summary.feasible,
        "catalog recomputed"
    );
    Ok(summary)
}
