//! TOML format types for catalog files.
//!
//! A catalog file is self-contained: every store and ingredient that a
//! product, recipe or profile names must be declared in the same file.

use serde::{Deserialize, Serialize};

/// Top-level structure of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogToml {
    #[serde(default)]
    pub stores: Vec<StoreToml>,
    #[serde(default)]
    pub ingredients: Vec<IngredientToml>,
    #[serde(default)]
    pub products: Vec<ProductToml>,
    #[serde(default)]
    pub recipes: Vec<RecipeToml>,
    #[serde(default)]
    pub profiles: Vec<ProfileToml>,
}

/// A `[[stores]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreToml {
    pub name: String,
}

/// A `[[ingredients]]` entry. Macros are per 100g.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientToml {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub kcal: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbs: f64,
}

/// A `[[products]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductToml {
    /// Commercial name, unique per store.
    pub name: String,
    pub store: String,
    /// Base ingredient this product supplies. Products without one are
    /// imported but never bought by the planner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
    pub price: f64,
    /// Package weight in grams.
    pub grams: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A `[[recipes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeToml {
    pub title: String,
    #[serde(default)]
    pub prep_minutes: i32,
    /// Any of "oven", "pan", "airfryer", "microwave", "tupper".
    #[serde(default)]
    pub appliances: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientToml>,
}

/// A `[[recipes.ingredients]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientToml {
    pub name: String,
    pub grams: i64,
}

/// A `[[profiles]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileToml {
    pub subject: String,
    pub energy_kcal: i32,
    #[serde(default)]
    pub protein_g: i32,
    #[serde(default)]
    pub fat_g: i32,
    #[serde(default)]
    pub carbs_g: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_budget: Option<f64>,
    /// Any of "oven", "pan", "airfryer", "microwave".
    #[serde(default)]
    pub kitchen: Vec<String>,
    /// Store names; empty means every store.
    #[serde(default)]
    pub stores: Vec<String>,
}

fn default_category() -> String {
    "Otros".to_string()
}
