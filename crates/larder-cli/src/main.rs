mod catalog_cmds;
mod config;
mod plan_cmds;
mod profile_cmds;
mod recipe_cmds;
#[cfg(test)]
mod test_util;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use larder_db::config::DbConfig;
use larder_db::pool;

use config::LarderConfig;

#[derive(Parser)]
#[command(name = "larder", about = "Weekly meal planner and shopping-list builder")]
struct Cli {
    /// Database URL (overrides LARDER_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a larder config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the larder database and run migrations
    DbInit,
    /// Catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Planning profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Weekly plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Browse recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Import stores, ingredients, products, recipes and profiles from a TOML file
    Import {
        /// Path to the catalog TOML file
        file: String,
    },
    /// Recompute recipe macros and per-store costs
    Recompute,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create or overwrite a subject's profile
    Set {
        /// Subject the profile belongs to
        subject: String,
        /// Daily energy target in kcal
        #[arg(long)]
        energy_kcal: i32,
        /// Daily protein target in grams
        #[arg(long, default_value_t = 0)]
        protein: i32,
        /// Daily fat target in grams
        #[arg(long, default_value_t = 0)]
        fat: i32,
        /// Daily carbohydrate target in grams
        #[arg(long, default_value_t = 0)]
        carbs: i32,
        /// Weekly shopping budget
        #[arg(long)]
        budget: Option<f64>,
        /// Kitchen has an oven
        #[arg(long)]
        oven: bool,
        /// Kitchen has a pan
        #[arg(long)]
        pan: bool,
        /// Kitchen has an air fryer
        #[arg(long)]
        airfryer: bool,
        /// Kitchen has a microwave
        #[arg(long)]
        microwave: bool,
        /// Store to shop at (repeatable; none means every store)
        #[arg(long = "store")]
        stores: Vec<String>,
    },
    /// Show a subject's profile
    Show {
        subject: String,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a new week, replacing the subject's current plan
    Generate {
        subject: String,
        /// Seed for a reproducible plan
        #[arg(long)]
        seed: Option<u64>,
        /// First day of the plan (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Show the subject's current plan and shopping list
    Show {
        subject: String,
    },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// List recipes with their price
    List {
        /// Price recipes at this subject's stores
        #[arg(long)]
        subject: Option<String>,
        /// Title substring (case-insensitive)
        #[arg(long)]
        query: Option<String>,
        /// Only recipes that suit an oven
        #[arg(long)]
        oven: bool,
        /// Only recipes that suit a pan
        #[arg(long)]
        pan: bool,
        /// Only recipes that keep in a lunchbox
        #[arg(long)]
        tupper: bool,
    },
    /// Show a recipe with its ingredients and per-store costs
    Show {
        title: String,
    },
}

/// Execute the `larder init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        planner: None,
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `larder db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `larder db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = LarderConfig::resolve(cli_db_url)?;

    println!("Initializing larder database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("larder db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Catalog { command } => {
            let resolved = LarderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = catalog_cmds::run_catalog_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Profile { command } => {
            let resolved = LarderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = profile_cmds::run_profile_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = LarderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &db_pool, &resolved.planner).await;
            db_pool.close().await;
            result?;
        }
        Commands::Recipe { command } => {
            let resolved = LarderConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = recipe_cmds::run_recipe_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
