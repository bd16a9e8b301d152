//! Database-backed planning operations.
//!
//! Loads a subject's profile and the catalog, runs the synchronous planner,
//! and swaps the result in for the subject's previous plan.

use std::collections::HashMap;

use anyhow::Context;
use chrono::NaiveDate;
use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use larder_db::models::Plan;
use larder_db::queries::plans::{self as plan_queries, NewMeal, NewPlan};
use larder_db::queries::{profiles, recipes};

use crate::cart::SnapshotError;
use crate::catalog::load::load_catalog;
use crate::planner::{PlannerConfig, WeekPlan, plan_week};
use crate::profile::PlanningProfile;
use crate::weekly::WeeklyView;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("subject {0:?} has no profile configured")]
    MissingProfile(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// A freshly generated and stored plan.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub plan: Plan,
    pub week: WeekPlan,
    /// Whether a previous plan was replaced.
    pub replaced: bool,
    /// `Some(true)` when the estimated cost exceeds the weekly budget.
    pub over_budget: Option<bool>,
}

/// Load a subject's profile together with its selected stores.
pub async fn load_profile(pool: &PgPool, subject: &str) -> Result<PlanningProfile, PlannerError> {
    let row = profiles::get_profile(pool, subject)
        .await?
        .ok_or_else(|| PlannerError::MissingProfile(subject.to_owned()))?;
    let stores = profiles::list_profile_store_ids(pool, subject).await?;
    Ok(PlanningProfile::from_row(&row, stores))
}

/// Generate a new week for `subject` and make it their only plan.
///
/// Fails without touching stored plans when the subject has no profile.
pub async fn regenerate_plan<R: Rng>(
    pool: &PgPool,
    subject: &str,
    config: &PlannerConfig,
    start_date: NaiveDate,
    rng: &mut R,
) -> Result<GeneratedPlan, PlannerError> {
    let profile = load_profile(pool, subject).await?;
    let catalog = load_catalog(pool).await?;

    let week = plan_week(&catalog, &profile, config, start_date, rng);

    let snapshot = week.cart.to_snapshot()?;
    let meals: Vec<NewMeal> = week
        .meals
        .iter()
        .map(|m| NewMeal {
            recipe_id: m.recipe_id,
            day: i16::from(m.day),
            slot: m.slot,
        })
        .collect();

    let replaced = plan_queries::replace_plan_for_subject(
        pool,
        &NewPlan {
            subject,
            start_date,
            total_cost: week.total_cost,
            shopping_list: &snapshot,
        },
        &meals,
    )
    .await?;

    let over_budget = profile.over_budget(week.total_cost);
    info!(
        subject,
        plan_id = %replaced.plan.id,
        meals = replaced.meals.len(),
        total_cost = week.total_cost,
        replaced = replaced.removed > 0,
        "plan stored"
    );

    Ok(GeneratedPlan {
        plan: replaced.plan,
        week,
        replaced: replaced.removed > 0,
        over_budget,
    })
}

/// Calendar and shopping list of the subject's current plan, if any.
pub async fn load_weekly_view(pool: &PgPool, subject: &str) -> anyhow::Result<Option<WeeklyView>> {
    let Some(plan) = plan_queries::get_plan_for_subject(pool, subject).await? else {
        return Ok(None);
    };
    let meals = plan_queries::list_meals_for_plan(pool, plan.id)
        .await
        .with_context(|| format!("failed to load meals of plan {}", plan.id))?;
    let titles: HashMap<_, _> = recipes::list_recipes(pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r.title))
        .collect();

    Ok(Some(WeeklyView::build(&plan, &meals, &titles)))
}
