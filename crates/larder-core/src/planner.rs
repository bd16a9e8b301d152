//! Week plan orchestration.
//!
//! Walks the 14 slots day by day (lunch, then dinner), picks a recipe per
//! slot with [`select_recipe`], and buys whatever the pantry cannot cover.
//! Everything here is synchronous and owned by one run; the pantry and the
//! cart are dropped (or moved into the result) when the run ends.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use larder_db::models::MealSlot;

use crate::cart::ShoppingCart;
use crate::catalog::{Catalog, RecipeId, Requirement};
use crate::package::{PackageError, check_unit_price, packages_needed};
use crate::pantry::Pantry;
use crate::picker::resolve_product;
use crate::profile::{PlanningProfile, StoreSet};
use crate::selector::{RecentWindow, select_recipe};
use crate::strategy::{EnergyThresholds, OrderingStrategy};

/// Number of planned days.
pub const DAYS_PER_WEEK: u8 = 7;

/// Tunables of a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How many top-ranked candidates a slot draws from.
    pub pool_size: usize,
    /// How many recent titles are excluded from selection.
    pub recent_window: usize,
    /// Energy targets above this favour calorie-dense recipes.
    pub high_energy_kcal: i32,
    /// Energy targets below this favour light recipes.
    pub low_energy_kcal: i32,
}

impl PlannerConfig {
    pub fn thresholds(&self) -> EnergyThresholds {
        EnergyThresholds {
            high_kcal: self.high_energy_kcal,
            low_kcal: self.low_energy_kcal,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let thresholds = EnergyThresholds::default();
        Self {
            pool_size: 5,
            recent_window: 4,
            high_energy_kcal: thresholds.high_kcal,
            low_energy_kcal: thresholds.low_kcal,
        }
    }
}

/// One filled slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedMeal {
    /// 0 (first day) to 6.
    pub day: u8,
    pub slot: MealSlot,
    pub recipe_id: RecipeId,
    pub title: String,
    pub cost: f64,
}

/// Output of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekPlan {
    pub start_date: NaiveDate,
    pub strategy: OrderingStrategy,
    pub meals: Vec<PlannedMeal>,
    /// Sum of the chosen recipes' minimum costs.
    pub total_cost: f64,
    pub cart: ShoppingCart,
    /// Grams per ingredient name that no purchase covered.
    pub shortfalls: BTreeMap<String, i64>,
}

/// Why one ingredient step bought nothing although a product exists.
#[derive(Debug, Error)]
enum PurchaseError {
    #[error("product {product:?}: {source}")]
    BadProduct {
        product: String,
        #[source]
        source: PackageError,
    },

    #[error("product {product:?} belongs to a store missing from the catalog")]
    UnknownStore { product: String },
}

/// Run-scoped planning state.
struct Run<'c> {
    catalog: &'c Catalog,
    stores: StoreSet,
    pantry: Pantry,
    cart: ShoppingCart,
}

impl Run<'_> {
    /// Cover one requirement from stock, buying packages if needed, then
    /// consume it.
    fn fulfil(&mut self, requirement: &Requirement) {
        let Requirement { ingredient, grams } = *requirement;

        if !self.pantry.covers(ingredient, grams) {
            if let Err(e) = self.buy(requirement) {
                warn!(ingredient = %ingredient, error = %e, "skipping purchase");
            }
        }

        let unmet = self.pantry.consume(ingredient, grams);
        if unmet > 0 {
            debug!(ingredient = %ingredient, unmet, "requirement not covered");
        }
    }

    fn buy(&mut self, requirement: &Requirement) -> Result<(), PurchaseError> {
        let Some(product) = resolve_product(self.catalog, requirement.ingredient, &self.stores)
        else {
            return Ok(());
        };

        let bad = |source| PurchaseError::BadProduct {
            product: product.name.clone(),
            source,
        };
        check_unit_price(product.unit_price).map_err(bad)?;
        let deficit = self.pantry.deficit(requirement.ingredient, requirement.grams);
        let units = packages_needed(deficit, product.package_grams).map_err(bad)?;

        let store = self
            .catalog
            .store(product.store)
            .ok_or_else(|| PurchaseError::UnknownStore {
                product: product.name.clone(),
            })?;

        self.pantry
            .add(requirement.ingredient, i64::from(units) * product.package_grams);
        self.cart.add_purchase(product, &store.name, units);
        debug!(product = %product.name, units, deficit, "bought packages");
        Ok(())
    }
}

/// Plan a week of lunches and dinners for `profile`.
///
/// Slots without a candidate stay empty; ingredients without a usable
/// product are left off the shopping list. Neither aborts the run.
pub fn plan_week<R: Rng>(
    catalog: &Catalog,
    profile: &PlanningProfile,
    config: &PlannerConfig,
    start_date: NaiveDate,
    rng: &mut R,
) -> WeekPlan {
    let strategy =
        OrderingStrategy::for_energy_target(profile.energy_kcal, &config.thresholds());
    let mut run = Run {
        catalog,
        stores: profile.allowed_stores(catalog),
        pantry: Pantry::new(),
        cart: ShoppingCart::new(),
    };
    let mut recent = RecentWindow::new(config.recent_window);
    let mut meals = Vec::with_capacity(usize::from(DAYS_PER_WEEK) * MealSlot::ALL.len());
    let mut total_cost = 0.0;

    for day in 0..DAYS_PER_WEEK {
        for slot in MealSlot::ALL {
            let Some(chosen) = select_recipe(
                catalog,
                &run.stores,
                strategy,
                &recent,
                config.pool_size,
                &mut *rng,
            ) else {
                debug!(day, %slot, "no candidate recipe, slot left empty");
                continue;
            };

            let recipe = chosen.recipe;
            recent.push(&recipe.title);
            total_cost += chosen.min_cost;

            for requirement in &recipe.requirements {
                run.fulfil(requirement);
            }

            debug!(day, %slot, recipe = %recipe.title, cost = chosen.min_cost, "slot filled");
            meals.push(PlannedMeal {
                day,
                slot,
                recipe_id: recipe.id,
                title: recipe.title.clone(),
                cost: chosen.min_cost,
            });
        }
    }

    let names = catalog.ingredient_names();
    let shortfalls = run
        .pantry
        .into_shortfalls()
        .into_iter()
        .map(|(id, grams)| {
            let name = names
                .get(&id)
                .map(|n| (*n).to_owned())
                .unwrap_or_else(|| id.to_string());
            (name, grams)
        })
        .collect();

    info!(
        subject = %profile.subject,
        %strategy,
        meals = meals.len(),
        cart_lines = run.cart.len(),
        total_cost,
        "week planned"
    );

    WeekPlan {
        start_date,
        strategy,
        meals,
        total_cost,
        cart: run.cart,
        shortfalls,
    }
}
