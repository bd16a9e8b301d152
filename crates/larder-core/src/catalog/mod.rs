//! Read-only catalog snapshot consumed by the planning engine.
//!
//! A [`Catalog`] holds stores, base ingredients, products and recipes (with
//! their ingredient requirements and per-store cost records). It is loaded
//! once per planning run ([`load::load_catalog`]) and never mutated while the
//! planner runs.

pub mod import;
pub mod load;
pub mod parser;
pub mod toml_format;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type StoreId = Uuid;
pub type IngredientId = Uuid;
pub type RecipeId = Uuid;
pub type ProductId = Uuid;

/// Per-100g macro values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Cooking equipment a recipe suits (or a kitchen has).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Appliances {
    pub oven: bool,
    pub pan: bool,
    pub airfryer: bool,
    pub microwave: bool,
    /// Keeps well in a lunchbox.
    pub tupper: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: StoreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub category: String,
    pub macros: Macros,
}

/// A purchasable offering of a base ingredient at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Commercial name; the shopping cart is keyed by it.
    pub name: String,
    pub store: StoreId,
    pub ingredient: Option<IngredientId>,
    pub unit_price: f64,
    pub package_grams: i64,
    /// `None` when the package weight is not positive.
    pub price_per_kg: Option<f64>,
    pub image_url: Option<String>,
}

/// `grams` of one base ingredient needed by a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub ingredient: IngredientId,
    pub grams: i64,
}

/// Minimum cost of a recipe's full ingredient list at one store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreCost {
    pub store: StoreId,
    pub cost: f64,
    /// False when some requirement has no offering at the store.
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub id: RecipeId,
    pub title: String,
    pub prep_minutes: i32,
    pub suits: Appliances,
    pub requirements: Vec<Requirement>,
    pub macros: Macros,
    pub store_costs: Vec<StoreCost>,
}

impl RecipeEntry {
    /// A recipe with no requirements, no cost records and zeroed macros.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            prep_minutes: 0,
            suits: Appliances::default(),
            requirements: Vec::new(),
            macros: Macros::default(),
            store_costs: Vec::new(),
        }
    }

    pub fn with_requirement(mut self, ingredient: IngredientId, grams: i64) -> Self {
        self.requirements.push(Requirement { ingredient, grams });
        self
    }

    pub fn with_cost(mut self, store: StoreId, cost: f64, feasible: bool) -> Self {
        self.store_costs.push(StoreCost {
            store,
            cost,
            feasible,
        });
        self
    }

    pub fn with_kcal(mut self, kcal: f64) -> Self {
        self.macros.kcal = kcal;
        self
    }
}

/// In-memory snapshot of everything the planner reads.
///
/// Vectors keep catalog order, which breaks ties in product and recipe
/// ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub stores: Vec<StoreInfo>,
    pub ingredients: Vec<Ingredient>,
    pub products: Vec<Product>,
    pub recipes: Vec<RecipeEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_store(&mut self, name: impl Into<String>) -> StoreId {
        let id = Uuid::new_v4();
        self.stores.push(StoreInfo {
            id,
            name: name.into(),
        });
        id
    }

    pub fn add_ingredient(&mut self, name: impl Into<String>, macros: Macros) -> IngredientId {
        let id = Uuid::new_v4();
        self.ingredients.push(Ingredient {
            id,
            name: name.into(),
            category: "Otros".to_owned(),
            macros,
        });
        id
    }

    /// Add a product; price per kg is derived from price and package weight.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        store: StoreId,
        ingredient: IngredientId,
        unit_price: f64,
        package_grams: i64,
    ) -> ProductId {
        let id = Uuid::new_v4();
        self.products.push(Product {
            id,
            name: name.into(),
            store,
            ingredient: Some(ingredient),
            unit_price,
            package_grams,
            price_per_kg: price_per_kg(unit_price, package_grams),
            image_url: None,
        });
        id
    }

    pub fn add_recipe(&mut self, recipe: RecipeEntry) -> RecipeId {
        let id = recipe.id;
        self.recipes.push(recipe);
        id
    }

    pub fn store_ids(&self) -> Vec<StoreId> {
        self.stores.iter().map(|s| s.id).collect()
    }

    pub fn store(&self, id: StoreId) -> Option<&StoreInfo> {
        self.stores.iter().find(|s| s.id == id)
    }

    pub fn store_by_name(&self, name: &str) -> Option<&StoreInfo> {
        self.stores.iter().find(|s| s.name == name)
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeEntry> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn recipe_by_title(&self, title: &str) -> Option<&RecipeEntry> {
        self.recipes.iter().find(|r| r.title == title)
    }

    /// Products linked to `ingredient`, in catalog order.
    pub fn products_for(&self, ingredient: IngredientId) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| p.ingredient == Some(ingredient))
    }

    /// Ingredient names keyed by id, for reporting.
    pub fn ingredient_names(&self) -> HashMap<IngredientId, &str> {
        self.ingredients
            .iter()
            .map(|i| (i.id, i.name.as_str()))
            .collect()
    }
}

/// Price per kilogram of a package, or `None` for a non-positive weight.
pub fn price_per_kg(unit_price: f64, package_grams: i64) -> Option<f64> {
    (package_grams > 0).then(|| unit_price * 1000.0 / package_grams as f64)
}
