//! Building a [`Catalog`] snapshot from database rows.

use std::collections::HashMap;

use anyhow::Result;
use sqlx::PgPool;
use tracing::debug;

use larder_db::models::{
    BaseIngredient, Product as ProductRow, Recipe, RecipeIngredient, RecipeStoreCost, Store,
};
use larder_db::queries::{ingredients, products, recipes, stores};

use super::{
    Appliances, Catalog, Ingredient, Macros, Product, RecipeEntry, Requirement, StoreCost,
    StoreInfo, price_per_kg,
};

/// Raw rows a catalog is assembled from.
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub stores: Vec<Store>,
    pub ingredients: Vec<BaseIngredient>,
    pub products: Vec<ProductRow>,
    pub recipes: Vec<Recipe>,
    pub requirements: Vec<RecipeIngredient>,
    pub store_costs: Vec<RecipeStoreCost>,
}

/// Read every catalog table into one snapshot.
pub async fn load_catalog(pool: &PgPool) -> Result<Catalog> {
    let rows = CatalogRows {
        stores: stores::list_stores(pool).await?,
        ingredients: ingredients::list_ingredients(pool).await?,
        products: products::list_products(pool).await?,
        recipes: recipes::list_recipes(pool).await?,
        requirements: recipes::list_recipe_ingredients(pool).await?,
        store_costs: recipes::list_store_costs(pool).await?,
    };
    let catalog = assemble(rows);
    debug!(
        stores = catalog.stores.len(),
        products = catalog.products.len(),
        recipes = catalog.recipes.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Join rows into a catalog. Row order becomes catalog order.
pub fn assemble(rows: CatalogRows) -> Catalog {
    let mut requirements: HashMap<_, Vec<RecipeIngredient>> = HashMap::new();
    for row in rows.requirements {
        requirements.entry(row.recipe_id).or_default().push(row);
    }
    let mut costs: HashMap<_, Vec<StoreCost>> = HashMap::new();
    for row in rows.store_costs {
        costs.entry(row.recipe_id).or_default().push(StoreCost {
            store: row.store_id,
            cost: row.cost,
            feasible: row.feasible,
        });
    }

    let recipes = rows
        .recipes
        .into_iter()
        .map(|row| {
            let mut items = requirements.remove(&row.id).unwrap_or_default();
            items.sort_by_key(|i| i.position);
            RecipeEntry {
                id: row.id,
                title: row.title,
                prep_minutes: row.prep_minutes,
                suits: Appliances {
                    oven: row.suits_oven,
                    pan: row.suits_pan,
                    airfryer: row.suits_airfryer,
                    microwave: row.suits_microwave,
                    tupper: row.suits_tupper,
                },
                requirements: items
                    .into_iter()
                    .map(|i| Requirement {
                        ingredient: i.base_ingredient_id,
                        grams: i64::from(i.grams),
                    })
                    .collect(),
                macros: Macros {
                    kcal: row.kcal_per_100g,
                    protein: row.protein_per_100g,
                    fat: row.fat_per_100g,
                    carbs: row.carbs_per_100g,
                },
                store_costs: costs.remove(&row.id).unwrap_or_default(),
            }
        })
        .collect();

    Catalog {
        stores: rows
            .stores
            .into_iter()
            .map(|s| StoreInfo {
                id: s.id,
                name: s.name,
            })
            .collect(),
        ingredients: rows
            .ingredients
            .into_iter()
            .map(|i| Ingredient {
                id: i.id,
                name: i.name,
                category: i.category,
                macros: Macros {
                    kcal: i.kcal_per_100g,
                    protein: i.protein_per_100g,
                    fat: i.fat_per_100g,
                    carbs: i.carbs_per_100g,
                },
            })
            .collect(),
        products: rows
            .products
            .into_iter()
            .map(|p| Product {
                id: p.id,
                name: p.commercial_name,
                store: p.store_id,
                ingredient: p.base_ingredient_id,
                unit_price: p.unit_price,
                package_grams: i64::from(p.package_grams),
                price_per_kg: price_per_kg(p.unit_price, i64::from(p.package_grams)),
                image_url: p.image_url,
            })
            .collect(),
        recipes,
    }
}
