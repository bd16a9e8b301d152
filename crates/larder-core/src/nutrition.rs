//! Per-100g macro profile of a recipe from its ingredient list.

use crate::catalog::{Catalog, Macros, Requirement};

/// Weighted per-100g macros of a dish made from `requirements`.
///
/// Ingredients unknown to the catalog contribute their weight but no
/// macros. A dish with no weight has all-zero macros.
pub fn recipe_macros(catalog: &Catalog, requirements: &[Requirement]) -> Macros {
    let total_grams: i64 = requirements.iter().map(|r| r.grams.max(0)).sum();
    if total_grams == 0 {
        return Macros::default();
    }

    let mut absolute = Macros::default();
    for requirement in requirements {
        let Some(ingredient) = catalog.ingredient(requirement.ingredient) else {
            continue;
        };
        let factor = requirement.grams.max(0) as f64 / 100.0;
        absolute.kcal += ingredient.macros.kcal * factor;
        absolute.protein += ingredient.macros.protein * factor;
        absolute.fat += ingredient.macros.fat * factor;
        absolute.carbs += ingredient.macros.carbs * factor;
    }

    let per_100g = 100.0 / total_grams as f64;
    Macros {
        kcal: round1(absolute.kcal * per_100g),
        protein: round1(absolute.protein * per_100g),
        fat: round1(absolute.fat * per_100g),
        carbs: round1(absolute.carbs * per_100g),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecipeEntry;

    #[test]
    fn weighted_average_per_100g() {
        let mut catalog = Catalog::new();
        let rice = catalog.add_ingredient(
            "Rice",
            Macros {
                kcal: 350.0,
                protein: 7.0,
                fat: 1.0,
                carbs: 77.0,
            },
        );
        let oil = catalog.add_ingredient(
            "Olive oil",
            Macros {
                kcal: 900.0,
                protein: 0.0,
                fat: 100.0,
                carbs: 0.0,
            },
        );
        let recipe = RecipeEntry::new("Rice with oil")
            .with_requirement(rice, 90)
            .with_requirement(oil, 10);

        let macros = recipe_macros(&catalog, &recipe.requirements);
        // 90g rice = 315 kcal, 10g oil = 90 kcal, over 100g total.
        assert_eq!(macros.kcal, 405.0);
        assert_eq!(macros.fat, 10.9);
        assert_eq!(macros.protein, 6.3);
        assert_eq!(macros.carbs, 69.3);
    }

    #[test]
    fn unknown_ingredients_dilute() {
        let mut catalog = Catalog::new();
        let sugar = catalog.add_ingredient(
            "Sugar",
            Macros {
                kcal: 400.0,
                ..Macros::default()
            },
        );
        let mystery = uuid::Uuid::new_v4();
        let recipe = RecipeEntry::new("Syrup")
            .with_requirement(sugar, 50)
            .with_requirement(mystery, 50);

        assert_eq!(recipe_macros(&catalog, &recipe.requirements).kcal, 200.0);
    }

    #[test]
    fn no_weight_means_zero() {
        let catalog = Catalog::new();
        assert_eq!(recipe_macros(&catalog, &[]), Macros::default());
    }
}
