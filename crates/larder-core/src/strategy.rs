//! Nutrition-driven candidate ordering.
//!
//! One strategy is picked per planning run from the profile's daily energy
//! target and used as the primary sort key for recipe candidates. Minimum
//! cost is the tie-break in every branch.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Energy thresholds (kcal/day) separating the three strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyThresholds {
    /// Targets strictly above this favour calorie-dense recipes.
    pub high_kcal: i32,
    /// Targets strictly below this favour light recipes.
    pub low_kcal: i32,
}

impl Default for EnergyThresholds {
    fn default() -> Self {
        Self {
            high_kcal: 2500,
            low_kcal: 1800,
        }
    }
}

/// Sort values of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankKey {
    /// Calories per 100g of the recipe.
    pub kcal: f64,
    /// Minimum cost over the allowed stores.
    pub min_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Most calories first.
    CalorieDense,
    /// Fewest calories first.
    Light,
    /// Cheapest first.
    Cheapest,
}

impl OrderingStrategy {
    pub fn for_energy_target(kcal: i32, thresholds: &EnergyThresholds) -> Self {
        if kcal > thresholds.high_kcal {
            Self::CalorieDense
        } else if kcal < thresholds.low_kcal {
            Self::Light
        } else {
            Self::Cheapest
        }
    }

    /// Total order on candidates: strategy key first, then cost ascending.
    pub fn compare(&self, a: &RankKey, b: &RankKey) -> Ordering {
        let primary = match self {
            Self::CalorieDense => b.kcal.total_cmp(&a.kcal),
            Self::Light => a.kcal.total_cmp(&b.kcal),
            Self::Cheapest => Ordering::Equal,
        };
        primary.then_with(|| a.min_cost.total_cmp(&b.min_cost))
    }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CalorieDense => "calorie_dense",
            Self::Light => "light",
            Self::Cheapest => "cheapest",
        };
        f.write_str(s)
    }
}
