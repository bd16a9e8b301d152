//! CLI handlers for `larder plan` subcommands.
//!
//! Implements:
//! - `larder plan generate <subject>` -- build a new week, replacing the old one
//! - `larder plan show <subject>`     -- calendar and shopping list of the current week

use anyhow::Result;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::PgPool;

use larder_core::cart::StoreGroup;
use larder_core::planner::PlannerConfig;
use larder_core::service::{GeneratedPlan, load_weekly_view, regenerate_plan};

use crate::PlanCommands;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(
    command: PlanCommands,
    pool: &PgPool,
    config: &PlannerConfig,
) -> Result<()> {
    match command {
        PlanCommands::Generate {
            subject,
            seed,
            start,
        } => cmd_generate(pool, config, &subject, seed, start).await,
        PlanCommands::Show { subject } => cmd_show(pool, &subject).await,
    }
}

// -----------------------------------------------------------------------
// larder plan generate <subject>
// -----------------------------------------------------------------------

async fn cmd_generate(
    pool: &PgPool,
    config: &PlannerConfig,
    subject: &str,
    seed: Option<u64>,
    start: Option<NaiveDate>,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let start_date = start.unwrap_or_else(|| chrono::Local::now().date_naive());

    let generated = regenerate_plan(pool, subject, config, start_date, &mut rng).await?;
    print_generated(&generated);
    Ok(())
}

fn print_generated(generated: &GeneratedPlan) {
    let week = &generated.week;

    println!(
        "{} plan for {} starting {}.",
        if generated.replaced { "Replaced" } else { "Created" },
        generated.plan.subject,
        week.start_date
    );
    println!("  Strategy: {}", week.strategy);
    println!();

    if week.meals.is_empty() {
        println!("No recipes could be bought at the selected stores.");
        return;
    }

    println!("{:<4} {:<7} {:<40} {:>8}", "DAY", "SLOT", "RECIPE", "COST");
    println!("{}", "-".repeat(62));
    for meal in &week.meals {
        println!(
            "{:<4} {:<7} {:<40} {:>8.2}",
            meal.day + 1,
            meal.slot.to_string(),
            truncate(&meal.title, 40),
            meal.cost
        );
    }
    println!();
    println!("Estimated total: {:.2}", week.total_cost);
    match generated.over_budget {
        Some(true) => println!("Over the weekly budget."),
        Some(false) => println!("Within the weekly budget."),
        None => {}
    }

    println!();
    print_shopping(&week.cart.by_store());

    if !week.shortfalls.is_empty() {
        println!();
        println!("Not available at the selected stores:");
        for (ingredient, grams) in &week.shortfalls {
            println!("  {ingredient}: {grams} g");
        }
    }
}

// -----------------------------------------------------------------------
// larder plan show <subject>
// -----------------------------------------------------------------------

async fn cmd_show(pool: &PgPool, subject: &str) -> Result<()> {
    let Some(view) = load_weekly_view(pool, subject).await? else {
        println!("No plan for {subject:?}. Use `larder plan generate {subject}`.");
        return Ok(());
    };

    println!("Week of {} for {}", view.start_date, view.subject);
    println!();
    println!("{:<10} {:<32} {:<32}", "DAY", "LUNCH", "DINNER");
    println!("{}", "-".repeat(74));
    for day in &view.days {
        println!(
            "{:<10} {:<32} {:<32}",
            day.name,
            truncate(day.lunch.as_deref().unwrap_or("-"), 32),
            truncate(day.dinner.as_deref().unwrap_or("-"), 32),
        );
    }
    println!();
    println!("Estimated total: {:.2}", view.total_cost);
    println!();
    print_shopping(&view.shopping);
    Ok(())
}

// -----------------------------------------------------------------------
// Shared output
// -----------------------------------------------------------------------

fn print_shopping(groups: &[StoreGroup]) {
    if groups.is_empty() {
        println!("Shopping list is empty.");
        return;
    }

    println!("Shopping list:");
    for group in groups {
        println!();
        println!("  {} ({:.2})", group.store, group.subtotal);
        for (name, line) in &group.lines {
            println!(
                "    {:>3} x {:<36} {:>8} {:>8.2}",
                line.units,
                truncate(name, 36),
                line.weight,
                line.total
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
