//! CLI handlers for `larder recipe` subcommands.

use anyhow::{Context, Result};
use sqlx::PgPool;

use larder_core::browse::{self, RecipeFilter};
use larder_core::catalog::load::load_catalog;
use larder_core::service::load_profile;

use crate::RecipeCommands;

pub async fn run_recipe_command(command: RecipeCommands, pool: &PgPool) -> Result<()> {
    match command {
        RecipeCommands::List {
            subject,
            query,
            oven,
            pan,
            tupper,
        } => {
            let filter = RecipeFilter {
                query,
                oven,
                pan,
                tupper,
            };
            cmd_list(pool, subject.as_deref(), &filter).await
        }
        RecipeCommands::Show { title } => cmd_show(pool, &title).await,
    }
}

// -----------------------------------------------------------------------
// larder recipe list
// -----------------------------------------------------------------------

async fn cmd_list(pool: &PgPool, subject: Option<&str>, filter: &RecipeFilter) -> Result<()> {
    let profile = match subject {
        Some(subject) => Some(load_profile(pool, subject).await?),
        None => None,
    };
    let catalog = load_catalog(pool).await?;

    let stores = profile.as_ref().map(|p| p.allowed_stores(&catalog));
    let listings = browse::list_recipes(&catalog, stores.as_ref(), filter);

    if listings.is_empty() {
        println!("No recipes match.");
        return Ok(());
    }

    println!(
        "{:<40} {:>6} {:>6} {:>6} {:>6} {:>8}",
        "TITLE", "KCAL", "PROT", "FAT", "CARBS", "PRICE"
    );
    println!("{}", "-".repeat(77));
    for listing in &listings {
        let recipe = listing.recipe;
        let price = match listing.price {
            Some(p) => format!("{p:.2}"),
            None => "-".to_owned(),
        };
        println!(
            "{:<40} {:>6.0} {:>6.1} {:>6.1} {:>6.1} {:>8}",
            recipe.title,
            recipe.macros.kcal,
            recipe.macros.protein,
            recipe.macros.fat,
            recipe.macros.carbs,
            price
        );
    }
    println!();
    println!("{} recipe(s)", listings.len());
    Ok(())
}

// -----------------------------------------------------------------------
// larder recipe show <title>
// -----------------------------------------------------------------------

async fn cmd_show(pool: &PgPool, title: &str) -> Result<()> {
    let catalog = load_catalog(pool).await?;
    let recipe = catalog
        .recipe_by_title(title)
        .with_context(|| format!("recipe not found: {title:?}"))?;

    let suits: Vec<&str> = [
        (recipe.suits.oven, "oven"),
        (recipe.suits.pan, "pan"),
        (recipe.suits.airfryer, "airfryer"),
        (recipe.suits.microwave, "microwave"),
        (recipe.suits.tupper, "tupper"),
    ]
    .into_iter()
    .filter_map(|(yes, name)| yes.then_some(name))
    .collect();

    println!("Recipe: {}", recipe.title);
    println!("  Prep time: {} min", recipe.prep_minutes);
    println!(
        "  Suits:     {}",
        if suits.is_empty() { "-".to_owned() } else { suits.join(", ") }
    );
    println!(
        "  Macros:    {:.0} kcal, {:.1}g protein, {:.1}g fat, {:.1}g carbs",
        recipe.macros.kcal, recipe.macros.protein, recipe.macros.fat, recipe.macros.carbs
    );

    let names = catalog.ingredient_names();
    println!();
    println!("Ingredients:");
    for req in &recipe.requirements {
        let name = names.get(&req.ingredient).copied().unwrap_or("(unknown)");
        println!("  {:>6} g  {name}", req.grams);
    }

    let costs = browse::recipe_costs(recipe);
    println!();
    if costs.is_empty() {
        println!("Not purchasable at any store.");
    } else {
        println!("Cost by store:");
        for cost in &costs {
            let store = catalog
                .store(cost.store)
                .map(|s| s.name.as_str())
                .unwrap_or("(unknown)");
            println!("  {store:<24} {:>8.2}", cost.cost);
        }
    }
    Ok(())
}
