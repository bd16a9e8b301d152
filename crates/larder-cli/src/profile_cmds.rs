//! CLI handlers for `larder profile` subcommands.

use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use larder_db::queries::profiles::{self, NewProfile};
use larder_db::queries::stores;

use crate::ProfileCommands;

pub async fn run_profile_command(command: ProfileCommands, pool: &PgPool) -> Result<()> {
    match command {
        ProfileCommands::Set {
            subject,
            energy_kcal,
            protein,
            fat,
            carbs,
            budget,
            oven,
            pan,
            airfryer,
            microwave,
            stores,
        } => {
            let new = NewProfile {
                subject: &subject,
                energy_kcal,
                protein_g: protein,
                fat_g: fat,
                carbs_g: carbs,
                weekly_budget: budget,
                has_oven: oven,
                has_pan: pan,
                has_airfryer: airfryer,
                has_microwave: microwave,
            };
            cmd_set(pool, &new, &stores).await
        }
        ProfileCommands::Show { subject } => cmd_show(pool, &subject).await,
    }
}

async fn cmd_set(pool: &PgPool, new: &NewProfile<'_>, store_names: &[String]) -> Result<()> {
    if new.energy_kcal <= 0 {
        bail!("energy target must be positive, got {}", new.energy_kcal);
    }

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let mut store_ids = Vec::with_capacity(store_names.len());
    for name in store_names {
        let store = stores::get_store_by_name(&mut *tx, name)
            .await?
            .with_context(|| format!("unknown store {name:?}"))?;
        store_ids.push(store.id);
    }

    let profile = profiles::upsert_profile(&mut *tx, new).await?;
    profiles::set_profile_stores(&mut *tx, new.subject, &store_ids).await?;

    tx.commit().await.context("failed to commit profile")?;

    println!("Profile saved for {}.", profile.subject);
    println!("  Energy target: {} kcal", profile.energy_kcal);
    if store_names.is_empty() {
        println!("  Stores:        all");
    } else {
        println!("  Stores:        {}", store_names.join(", "));
    }
    Ok(())
}

async fn cmd_show(pool: &PgPool, subject: &str) -> Result<()> {
    let Some(profile) = profiles::get_profile(pool, subject).await? else {
        println!(
            "No profile for {subject:?}. \
             Use `larder profile set {subject} --energy-kcal <kcal>`."
        );
        return Ok(());
    };

    let selected = profiles::list_profile_store_ids(pool, subject).await?;
    let all_stores = stores::list_stores(pool).await?;
    let store_names: Vec<&str> = all_stores
        .iter()
        .filter(|s| selected.contains(&s.id))
        .map(|s| s.name.as_str())
        .collect();

    let mut kitchen = Vec::new();
    for (has, name) in [
        (profile.has_oven, "oven"),
        (profile.has_pan, "pan"),
        (profile.has_airfryer, "airfryer"),
        (profile.has_microwave, "microwave"),
    ] {
        if has {
            kitchen.push(name);
        }
    }

    println!("Profile: {}", profile.subject);
    println!();
    println!("  Energy:   {} kcal/day", profile.energy_kcal);
    println!(
        "  Macros:   {}g protein, {}g fat, {}g carbs",
        profile.protein_g, profile.fat_g, profile.carbs_g
    );
    match profile.weekly_budget {
        Some(budget) => println!("  Budget:   {budget:.2}/week"),
        None => println!("  Budget:   none"),
    }
    println!(
        "  Kitchen:  {}",
        if kitchen.is_empty() { "-".to_owned() } else { kitchen.join(", ") }
    );
    println!(
        "  Stores:   {}",
        if store_names.is_empty() { "all".to_owned() } else { store_names.join(", ") }
    );
    println!("  Updated:  {}", profile.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}
