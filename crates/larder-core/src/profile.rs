//! Planning subject settings as seen by the engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use larder_db::models::Profile;

use crate::catalog::{Catalog, StoreId};

/// Daily macro targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i32,
    pub fat_g: i32,
    pub carbs_g: i32,
}

/// Equipment available in the subject's kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Kitchen {
    pub oven: bool,
    pub pan: bool,
    pub airfryer: bool,
    pub microwave: bool,
}

/// Immutable for the duration of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningProfile {
    pub subject: String,
    /// Daily energy target in kcal.
    pub energy_kcal: i32,
    pub targets: MacroTargets,
    pub weekly_budget: Option<f64>,
    pub kitchen: Kitchen,
    /// Selected stores; empty means every store.
    pub stores: Vec<StoreId>,
}

impl PlanningProfile {
    pub fn new(subject: impl Into<String>, energy_kcal: i32) -> Self {
        Self {
            subject: subject.into(),
            energy_kcal,
            targets: MacroTargets::default(),
            weekly_budget: None,
            kitchen: Kitchen::default(),
            stores: Vec::new(),
        }
    }

    pub fn with_stores(mut self, stores: impl IntoIterator<Item = StoreId>) -> Self {
        self.stores = stores.into_iter().collect();
        self
    }

    /// Build from a stored profile row and its selected store ids.
    pub fn from_row(row: &Profile, stores: Vec<StoreId>) -> Self {
        Self {
            subject: row.subject.clone(),
            energy_kcal: row.energy_kcal,
            targets: MacroTargets {
                protein_g: row.protein_g,
                fat_g: row.fat_g,
                carbs_g: row.carbs_g,
            },
            weekly_budget: row.weekly_budget,
            kitchen: Kitchen {
                oven: row.has_oven,
                pan: row.has_pan,
                airfryer: row.has_airfryer,
                microwave: row.has_microwave,
            },
            stores,
        }
    }

    /// Stores this profile may buy from within `catalog`.
    pub fn allowed_stores(&self, catalog: &Catalog) -> StoreSet {
        if self.stores.is_empty() {
            StoreSet::from_ids(catalog.store_ids())
        } else {
            StoreSet::from_ids(self.stores.iter().copied())
        }
    }

    /// Whether `cost` exceeds the weekly budget, if one is set.
    pub fn over_budget(&self, cost: f64) -> Option<bool> {
        self.weekly_budget.map(|budget| cost > budget)
    }
}

/// Stores a planning run may buy from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSet(HashSet<StoreId>);

impl StoreSet {
    pub fn from_ids(ids: impl IntoIterator<Item = StoreId>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, store: StoreId) -> bool {
        self.0.contains(&store)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
