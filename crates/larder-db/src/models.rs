use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which of the two daily meals a scheduled recipe fills.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Slots in the order they are filled within a day.
    pub const ALL: [MealSlot; 2] = [MealSlot::Lunch, MealSlot::Dinner];
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        };
        f.write_str(s)
    }
}

impl FromStr for MealSlot {
    type Err = MealSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            _ => Err(MealSlotParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MealSlot`] string.
#[derive(Debug, Clone)]
pub struct MealSlotParseError(pub String);

impl fmt::Display for MealSlotParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid meal slot: {:?}", self.0)
    }
}

impl std::error::Error for MealSlotParseError {}

// ---------------------------------------------------------------------------
// Catalog rows
// ---------------------------------------------------------------------------

/// A supermarket products can be bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
}

/// Canonical ingredient identity joining recipes to products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BaseIngredient {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub kcal_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
}

/// A concrete purchasable offering at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub base_ingredient_id: Option<Uuid>,
    pub commercial_name: String,
    pub unit_price: f64,
    pub package_grams: i32,
    pub price_per_kg: f64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub prep_minutes: i32,
    pub suits_oven: bool,
    pub suits_pan: bool,
    pub suits_airfryer: bool,
    pub suits_microwave: bool,
    pub suits_tupper: bool,
    pub kcal_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
}

/// One `(ingredient, grams)` requirement; `position` preserves recipe order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub recipe_id: Uuid,
    pub position: i32,
    pub base_ingredient_id: Uuid,
    pub grams: i32,
}

/// Derived cost of a recipe's full ingredient list at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeStoreCost {
    pub recipe_id: Uuid,
    pub store_id: Uuid,
    pub cost: f64,
    pub feasible: bool,
}

// ---------------------------------------------------------------------------
// Profiles and plans
// ---------------------------------------------------------------------------

/// Planning subject settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub subject: String,
    pub energy_kcal: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub carbs_g: i32,
    pub weekly_budget: Option<f64>,
    pub has_oven: bool,
    pub has_pan: bool,
    pub has_airfryer: bool,
    pub has_microwave: bool,
    pub updated_at: DateTime<Utc>,
}

/// The single active weekly plan of a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub subject: String,
    pub start_date: NaiveDate,
    pub total_cost: f64,
    pub shopping_list: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduledMeal {
    pub plan_id: Uuid,
    pub recipe_id: Uuid,
    pub day: i16,
    pub slot: MealSlot,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
