//! CLI handlers for `larder catalog` subcommands.
//!
//! - `larder catalog import <file>` -- load a catalog TOML file
//! - `larder catalog recompute`     -- refresh recipe macros and store costs

use anyhow::{Context, Result};
use sqlx::PgPool;

use larder_core::catalog::import::{import_catalog, recompute_catalog};
use larder_core::catalog::parser::parse_catalog_toml;

use crate::CatalogCommands;

pub async fn run_catalog_command(command: CatalogCommands, pool: &PgPool) -> Result<()> {
    match command {
        CatalogCommands::Import { file } => cmd_import(pool, &file).await,
        CatalogCommands::Recompute => cmd_recompute(pool).await,
    }
}

async fn cmd_import(pool: &PgPool, file_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read catalog file: {file_path}"))?;
    let catalog = parse_catalog_toml(&content)
        .with_context(|| format!("failed to parse catalog file: {file_path}"))?;

    let summary = import_catalog(pool, &catalog).await?;

    println!("Catalog imported.");
    println!();
    println!("  Stores:      {}", summary.stores);
    println!("  Ingredients: {}", summary.ingredients);
    println!("  Products:    {}", summary.products);
    println!("  Recipes:     {}", summary.recipes);
    println!("  Profiles:    {}", summary.profiles);
    Ok(())
}

async fn cmd_recompute(pool: &PgPool) -> Result<()> {
    let summary = recompute_catalog(pool).await?;
    println!(
        "Recomputed {} recipes: {} store costs, {} feasible.",
        summary.recipes, summary.cost_records, summary.feasible
    );
    Ok(())
}
