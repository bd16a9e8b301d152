//! Run-scoped ingredient ledger.
//!
//! Tracks grams bought in earlier packages but not yet consumed, so a later
//! recipe in the same week can use the surplus instead of buying again.
//! Stock never drops below zero: demand that nothing covered is recorded as
//! a shortfall instead.

use std::collections::HashMap;

use crate::catalog::IngredientId;

#[derive(Debug, Clone, Default)]
pub struct Pantry {
    stock: HashMap<IngredientId, i64>,
    shortfalls: HashMap<IngredientId, i64>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grams currently in stock.
    pub fn stock(&self, ingredient: IngredientId) -> i64 {
        self.stock.get(&ingredient).copied().unwrap_or(0)
    }

    /// Whether the stock alone satisfies `need`.
    pub fn covers(&self, ingredient: IngredientId, need: i64) -> bool {
        self.stock(ingredient) >= need
    }

    /// Grams missing to satisfy `need` (zero when covered).
    pub fn deficit(&self, ingredient: IngredientId, need: i64) -> i64 {
        (need - self.stock(ingredient)).max(0)
    }

    /// Credit purchased grams.
    pub fn add(&mut self, ingredient: IngredientId, grams: i64) {
        *self.stock.entry(ingredient).or_insert(0) += grams;
    }

    /// Take `need` grams out of stock. Returns the grams that were not in
    /// stock, which are also added to the ingredient's shortfall.
    pub fn consume(&mut self, ingredient: IngredientId, need: i64) -> i64 {
        let entry = self.stock.entry(ingredient).or_insert(0);
        let remaining = *entry - need;
        if remaining >= 0 {
            *entry = remaining;
            return 0;
        }
        *entry = 0;
        let unmet = -remaining;
        *self.shortfalls.entry(ingredient).or_insert(0) += unmet;
        unmet
    }

    /// Unmet grams per ingredient accumulated over the run.
    pub fn shortfalls(&self) -> &HashMap<IngredientId, i64> {
        &self.shortfalls
    }

    pub fn into_shortfalls(self) -> HashMap<IngredientId, i64> {
        self.shortfalls
    }
}
