//! Recipe browsing: listing with per-profile prices, and per-store costs.

use crate::catalog::{Catalog, RecipeEntry, StoreCost};
use crate::profile::StoreSet;
use crate::selector::min_feasible_cost;

/// Listing filter. Flags set to `true` require the recipe to suit that
/// equipment; `false` means "don't care".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive title substring.
    pub query: Option<String>,
    pub oven: bool,
    pub pan: bool,
    pub tupper: bool,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &RecipeEntry) -> bool {
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            if !recipe
                .title
                .to_lowercase()
                .contains(&query.to_lowercase())
            {
                return false;
            }
        }
        (!self.oven || recipe.suits.oven)
            && (!self.pan || recipe.suits.pan)
            && (!self.tupper || recipe.suits.tupper)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeListing<'c> {
    pub recipe: &'c RecipeEntry,
    /// Cheapest feasible cost at the viewer's stores; `None` when no such
    /// store can supply the recipe.
    pub price: Option<f64>,
}

/// Recipes matching `filter`, in catalog order.
///
/// `stores` restricts pricing to a profile's selection; `None` prices over
/// every store.
pub fn list_recipes<'c>(
    catalog: &'c Catalog,
    stores: Option<&StoreSet>,
    filter: &RecipeFilter,
) -> Vec<RecipeListing<'c>> {
    let every_store;
    let stores = match stores {
        Some(set) if !set.is_empty() => set,
        _ => {
            every_store = StoreSet::from_ids(catalog.store_ids());
            &every_store
        }
    };
    catalog
        .recipes
        .iter()
        .filter(|r| filter.matches(r))
        .map(|recipe| RecipeListing {
            recipe,
            price: min_feasible_cost(recipe, stores),
        })
        .collect()
}

/// Feasible store costs of `recipe`, cheapest first.
pub fn recipe_costs(recipe: &RecipeEntry) -> Vec<StoreCost> {
    let mut costs: Vec<StoreCost> = recipe
        .store_costs
        .iter()
        .filter(|c| c.feasible)
        .copied()
        .collect();
    costs.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Appliances;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        let a = catalog.add_store("A");
        let b = catalog.add_store("B");

        let mut lasagna = RecipeEntry::new("Lasagna")
            .with_cost(a, 9.0, true)
            .with_cost(b, 7.5, true);
        lasagna.suits = Appliances {
            oven: true,
            tupper: true,
            ..Appliances::default()
        };
        catalog.add_recipe(lasagna);

        let mut omelette = RecipeEntry::new("Spanish omelette")
            .with_cost(a, 3.0, true)
            .with_cost(b, 1.0, false);
        omelette.suits.pan = true;
        catalog.add_recipe(omelette);

        catalog.add_recipe(RecipeEntry::new("Salad").with_cost(b, 2.0, true));
        catalog
    }

    fn titles(listings: &[RecipeListing<'_>]) -> Vec<String> {
        listings.iter().map(|l| l.recipe.title.clone()).collect()
    }

    #[test]
    fn lists_everything_with_cheapest_price() {
        let catalog = sample();
        let listings = list_recipes(&catalog, None, &RecipeFilter::default());
        assert_eq!(titles(&listings), vec!["Lasagna", "Spanish omelette", "Salad"]);
        assert_eq!(listings[0].price, Some(7.5));
        // The infeasible 1.0 record is ignored.
        assert_eq!(listings[1].price, Some(3.0));
    }

    #[test]
    fn prices_follow_selected_stores() {
        let catalog = sample();
        let a = catalog.store_by_name("A").unwrap().id;
        let stores = StoreSet::from_ids([a]);
        let listings = list_recipes(&catalog, Some(&stores), &RecipeFilter::default());
        assert_eq!(listings[0].price, Some(9.0));
        assert_eq!(listings[2].price, None);
    }

    #[test]
    fn query_is_case_insensitive() {
        let catalog = sample();
        let filter = RecipeFilter {
            query: Some("OMEL".into()),
            ..RecipeFilter::default()
        };
        assert_eq!(
            titles(&list_recipes(&catalog, None, &filter)),
            vec!["Spanish omelette"]
        );
    }

    #[test]
    fn appliance_flags_filter() {
        let catalog = sample();
        let oven = RecipeFilter {
            oven: true,
            ..RecipeFilter::default()
        };
        assert_eq!(titles(&list_recipes(&catalog, None, &oven)), vec!["Lasagna"]);

        let pan_and_tupper = RecipeFilter {
            pan: true,
            tupper: true,
            ..RecipeFilter::default()
        };
        assert!(list_recipes(&catalog, None, &pan_and_tupper).is_empty());
    }

    #[test]
    fn costs_are_feasible_and_sorted() {
        let catalog = sample();
        let lasagna = catalog.recipe_by_title("Lasagna").unwrap();
        let costs: Vec<f64> = recipe_costs(lasagna).iter().map(|c| c.cost).collect();
        assert_eq!(costs, vec![7.5, 9.0]);

        let omelette = catalog.recipe_by_title("Spanish omelette").unwrap();
        assert_eq!(recipe_costs(omelette).len(), 1);
    }
}
