//! Recipe candidate ranking and random draw.

use std::collections::VecDeque;

use rand::Rng;

use crate::catalog::{Catalog, RecipeEntry};
use crate::profile::StoreSet;
use crate::strategy::{OrderingStrategy, RankKey};

/// A feasible recipe annotated with its cheapest allowed-store cost.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'c> {
    pub recipe: &'c RecipeEntry,
    pub min_cost: f64,
}

impl Candidate<'_> {
    pub fn key(&self) -> RankKey {
        RankKey {
            kcal: self.recipe.macros.kcal,
            min_cost: self.min_cost,
        }
    }
}

/// Titles of the most recently scheduled meals, oldest first.
#[derive(Debug, Clone)]
pub struct RecentWindow {
    titles: VecDeque<String>,
    capacity: usize,
}

impl RecentWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            titles: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Remember `title`, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, title: &str) {
        self.titles.retain(|t| t != title);
        self.titles.push_back(title.to_owned());
        while self.titles.len() > self.capacity {
            self.titles.pop_front();
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

/// Minimum cost of `recipe` over its feasible records at `stores`, or
/// `None` when no allowed store can supply every ingredient.
pub fn min_feasible_cost(recipe: &RecipeEntry, stores: &StoreSet) -> Option<f64> {
    recipe
        .store_costs
        .iter()
        .filter(|c| c.feasible && stores.contains(c.store))
        .map(|c| c.cost)
        .min_by(f64::total_cmp)
}

/// Every feasible, not recently used recipe, best first.
pub fn rank_candidates<'c>(
    catalog: &'c Catalog,
    stores: &StoreSet,
    strategy: OrderingStrategy,
    recent: &RecentWindow,
) -> Vec<Candidate<'c>> {
    let mut candidates: Vec<Candidate<'c>> = catalog
        .recipes
        .iter()
        .filter(|r| !recent.contains(&r.title))
        .filter_map(|recipe| {
            min_feasible_cost(recipe, stores).map(|min_cost| Candidate { recipe, min_cost })
        })
        .collect();

    // Stable: equal keys keep catalog order.
    candidates.sort_by(|a, b| strategy.compare(&a.key(), &b.key()));
    candidates
}

/// Draw one of the top `pool_size` candidates uniformly at random.
pub fn select_recipe<'c, R: Rng>(
    catalog: &'c Catalog,
    stores: &StoreSet,
    strategy: OrderingStrategy,
    recent: &RecentWindow,
    pool_size: usize,
    rng: &mut R,
) -> Option<Candidate<'c>> {
    let ranked = rank_candidates(catalog, stores, strategy, recent);
    let pool = &ranked[..ranked.len().min(pool_size)];
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog::StoreId;

    fn catalog_with(recipes: &[(&str, f64, f64)]) -> (Catalog, StoreId) {
        let mut catalog = Catalog::new();
        let store = catalog.add_store("Market");
        for (title, kcal, cost) in recipes {
            catalog.add_recipe(
                RecipeEntry::new(*title)
                    .with_kcal(*kcal)
                    .with_cost(store, *cost, true),
            );
        }
        (catalog, store)
    }

    fn titles<'a>(candidates: &'a [Candidate<'_>]) -> Vec<&'a str> {
        candidates.iter().map(|c| c.recipe.title.as_str()).collect()
    }

    #[test]
    fn window_evicts_oldest_beyond_capacity() {
        let mut window = RecentWindow::new(4);
        for t in ["a", "b", "c", "d", "e"] {
            window.push(t);
        }
        assert_eq!(window.len(), 4);
        assert!(!window.contains("a"));
        assert_eq!(window.titles().collect::<Vec<_>>(), vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn window_keeps_entries_distinct() {
        let mut window = RecentWindow::new(4);
        window.push("a");
        window.push("b");
        window.push("a");
        assert_eq!(window.titles().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn infeasible_and_foreign_store_recipes_are_not_candidates() {
        let mut catalog = Catalog::new();
        let mine = catalog.add_store("Mine");
        let other = catalog.add_store("Other");
        catalog.add_recipe(RecipeEntry::new("Feasible").with_cost(mine, 4.0, true));
        catalog.add_recipe(RecipeEntry::new("Missing item").with_cost(mine, 1.0, false));
        catalog.add_recipe(RecipeEntry::new("Elsewhere").with_cost(other, 2.0, true));
        catalog.add_recipe(RecipeEntry::new("No records"));

        let ranked = rank_candidates(
            &catalog,
            &StoreSet::from_ids([mine]),
            OrderingStrategy::Cheapest,
            &RecentWindow::new(4),
        );
        assert_eq!(titles(&ranked), vec!["Feasible"]);
    }

    #[test]
    fn min_cost_uses_cheapest_allowed_feasible_store() {
        let mut catalog = Catalog::new();
        let a = catalog.add_store("A");
        let b = catalog.add_store("B");
        let c = catalog.add_store("C");
        let recipe = RecipeEntry::new("Paella")
            .with_cost(a, 9.0, true)
            .with_cost(b, 6.0, true)
            .with_cost(c, 3.0, false);
        catalog.add_recipe(recipe);

        let ranked = rank_candidates(
            &catalog,
            &StoreSet::from_ids([a, b, c]),
            OrderingStrategy::Cheapest,
            &RecentWindow::new(4),
        );
        assert_eq!(ranked[0].min_cost, 6.0);
    }

    #[test]
    fn recent_titles_are_excluded() {
        let (catalog, store) = catalog_with(&[("a", 100.0, 1.0), ("b", 100.0, 2.0)]);
        let mut recent = RecentWindow::new(4);
        recent.push("a");

        let ranked = rank_candidates(
            &catalog,
            &StoreSet::from_ids([store]),
            OrderingStrategy::Cheapest,
            &recent,
        );
        assert_eq!(titles(&ranked), vec!["b"]);
    }

    #[test]
    fn calorie_dense_ranking_with_cost_tiebreak() {
        let (catalog, store) = catalog_with(&[
            ("light", 90.0, 1.0),
            ("dense-dear", 300.0, 5.0),
            ("dense-cheap", 300.0, 2.0),
            ("middle", 180.0, 1.5),
        ]);
        let ranked = rank_candidates(
            &catalog,
            &StoreSet::from_ids([store]),
            OrderingStrategy::CalorieDense,
            &RecentWindow::new(4),
        );
        assert_eq!(
            titles(&ranked),
            vec!["dense-cheap", "dense-dear", "middle", "light"]
        );
    }

    #[test]
    fn equal_keys_keep_catalog_order() {
        let (catalog, store) = catalog_with(&[("first", 100.0, 2.0), ("second", 100.0, 2.0)]);
        let ranked = rank_candidates(
            &catalog,
            &StoreSet::from_ids([store]),
            OrderingStrategy::Light,
            &RecentWindow::new(4),
        );
        assert_eq!(titles(&ranked), vec!["first", "second"]);
    }

    #[test]
    fn draws_only_from_top_of_ranking() {
        let recipes: Vec<(String, f64, f64)> = (0..8)
            .map(|i| (format!("r{i}"), 100.0, f64::from(i)))
            .collect();
        let borrowed: Vec<(&str, f64, f64)> =
            recipes.iter().map(|(t, k, c)| (t.as_str(), *k, *c)).collect();
        let (catalog, store) = catalog_with(&borrowed);
        let stores = StoreSet::from_ids([store]);
        let recent = RecentWindow::new(4);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pick = select_recipe(
                &catalog,
                &stores,
                OrderingStrategy::Cheapest,
                &recent,
                5,
                &mut rng,
            )
            .expect("pool is not empty");
            assert!(pick.min_cost < 5.0, "picked {} outside the pool", pick.recipe.title);
        }
    }

    #[test]
    fn same_seed_same_choice() {
        let (catalog, store) = catalog_with(&[
            ("a", 100.0, 1.0),
            ("b", 100.0, 2.0),
            ("c", 100.0, 3.0),
        ]);
        let stores = StoreSet::from_ids([store]);
        let recent = RecentWindow::new(4);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| {
                    select_recipe(
                        &catalog,
                        &stores,
                        OrderingStrategy::Cheapest,
                        &recent,
                        5,
                        &mut rng,
                    )
                    .map(|c| c.recipe.title.clone())
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let (catalog, store) = catalog_with(&[("only", 100.0, 1.0)]);
        let mut recent = RecentWindow::new(4);
        recent.push("only");
        let mut rng = StdRng::seed_from_u64(1);
        let pick = select_recipe(
            &catalog,
            &StoreSet::from_ids([store]),
            OrderingStrategy::Cheapest,
            &recent,
            5,
            &mut rng,
        );
        assert!(pick.is_none());
    }
}
