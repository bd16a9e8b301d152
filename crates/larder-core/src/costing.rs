//! Per-store recipe cost records.
//!
//! The planner never prices a recipe itself; it reads the records produced
//! here. They are refreshed after every catalog import and by
//! `larder catalog recompute`.

use tracing::{debug, warn};

use crate::catalog::{Catalog, RecipeEntry, RecipeId, StoreId};
use crate::package::{check_unit_price, packages_needed};
use crate::picker::resolve_product;
use crate::profile::StoreSet;

/// Cost of buying a recipe's whole ingredient list at one store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRecord {
    pub recipe: RecipeId,
    pub store: StoreId,
    /// Zero when infeasible.
    pub cost: f64,
    pub feasible: bool,
}

/// One record per (recipe, store) pair, recipes in catalog order.
pub fn recompute_store_costs(catalog: &Catalog) -> Vec<CostRecord> {
    let mut records = Vec::with_capacity(catalog.recipes.len() * catalog.stores.len());
    for recipe in &catalog.recipes {
        for store in &catalog.stores {
            let record = match cost_at_store(catalog, recipe, store.id) {
                Some(cost) => CostRecord {
                    recipe: recipe.id,
                    store: store.id,
                    cost,
                    feasible: true,
                },
                None => CostRecord {
                    recipe: recipe.id,
                    store: store.id,
                    cost: 0.0,
                    feasible: false,
                },
            };
            debug!(
                recipe = %recipe.title,
                store = %store.name,
                cost = record.cost,
                feasible = record.feasible,
                "store cost"
            );
            records.push(record);
        }
    }
    records
}

/// Whole-package cost of `recipe` at `store`, or `None` if some requirement
/// cannot be bought there.
fn cost_at_store(catalog: &Catalog, recipe: &RecipeEntry, store: StoreId) -> Option<f64> {
    let only = StoreSet::from_ids([store]);
    let mut total = 0.0;
    for requirement in &recipe.requirements {
        let product = resolve_product(catalog, requirement.ingredient, &only)?;
        let units = match packages_needed(requirement.grams, product.package_grams)
            .and_then(|units| check_unit_price(product.unit_price).map(|_| units))
        {
            Ok(units) => units,
            Err(e) => {
                warn!(
                    recipe = %recipe.title,
                    product = %product.name,
                    error = %e,
                    "unusable product"
                );
                return None;
            }
        };
        total += f64::from(units) * product.unit_price;
    }
    Some(total)
}
