//! Database query functions for the `plans` and `scheduled_meals` tables.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::{MealSlot, Plan, ScheduledMeal};

/// Plan header to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan<'a> {
    pub subject: &'a str,
    pub start_date: NaiveDate,
    pub total_cost: f64,
    pub shopping_list: &'a serde_json::Value,
}

/// One filled slot of a new plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMeal {
    pub recipe_id: Uuid,
    pub day: i16,
    pub slot: MealSlot,
}

/// Outcome of [`replace_plan_for_subject`].
#[derive(Debug, Clone)]
pub struct ReplacedPlan {
    pub plan: Plan,
    pub meals: Vec<ScheduledMeal>,
    /// Number of prior plans removed (0 or 1).
    pub removed: u64,
}

/// Replace the subject's active plan with a new one.
///
/// Deletes the prior plan (its meals cascade), inserts the new plan row and
/// all of its meals inside one transaction. A per-subject advisory lock
/// serializes concurrent regenerations, so readers only ever see the old
/// plan or the complete new one.
pub async fn replace_plan_for_subject(
    pool: &PgPool,
    new: &NewPlan<'_>,
    meals: &[NewMeal],
) -> Result<ReplacedPlan> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(new.subject)
        .execute(&mut *tx)
        .await
        .context("failed to lock subject plan")?;

    let removed = sqlx::query("DELETE FROM plans WHERE subject = $1")
        .bind(new.subject)
        .execute(&mut *tx)
        .await
        .context("failed to delete prior plan")?
        .rows_affected();

    let plan = sqlx::query_as::<_, Plan>(
        "INSERT INTO plans (subject, start_date, total_cost, shopping_list) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(new.subject)
    .bind(new.start_date)
    .bind(new.total_cost)
    .bind(new.shopping_list)
    .fetch_one(&mut *tx)
    .await
    .context("failed to insert plan")?;

    let mut inserted = Vec::with_capacity(meals.len());
    for meal in meals {
        let row = sqlx::query_as::<_, ScheduledMeal>(
            "INSERT INTO scheduled_meals (plan_id, recipe_id, day, slot) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(plan.id)
        .bind(meal.recipe_id)
        .bind(meal.day)
        .bind(meal.slot)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to insert {} meal for day {}", meal.slot, meal.day))?;
        inserted.push(row);
    }

    tx.commit().await.context("failed to commit transaction")?;

    debug!(
        subject = new.subject,
        plan_id = %plan.id,
        removed,
        meals = inserted.len(),
        "plan replaced"
    );

    Ok(ReplacedPlan {
        plan,
        meals: inserted,
        removed,
    })
}

/// Fetch the active plan of a subject.
pub async fn get_plan_for_subject<'e>(
    exec: impl PgExecutor<'e>,
    subject: &str,
) -> Result<Option<Plan>> {
    let plan = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE subject = $1")
        .bind(subject)
        .fetch_optional(exec)
        .await
        .with_context(|| format!("failed to fetch plan for {subject:?}"))?;

    Ok(plan)
}

/// Meals of a plan in calendar order (day, then lunch before dinner).
pub async fn list_meals_for_plan<'e>(
    exec: impl PgExecutor<'e>,
    plan_id: Uuid,
) -> Result<Vec<ScheduledMeal>> {
    let mut meals = sqlx::query_as::<_, ScheduledMeal>(
        "SELECT * FROM scheduled_meals WHERE plan_id = $1",
    )
    .bind(plan_id)
    .fetch_all(exec)
    .await
    .context("failed to list scheduled meals")?;

    meals.sort_by_key(|m| (m.day, m.slot));
    Ok(meals)
}

/// List all plans, newest first.
pub async fn list_plans<'e>(exec: impl PgExecutor<'e>) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY created_at DESC")
        .fetch_all(exec)
        .await
        .context("failed to list plans")?;

    Ok(plans)
}

/// Delete the plan of a subject. Returns the number of rows removed.
pub async fn delete_plan_for_subject<'e>(exec: impl PgExecutor<'e>, subject: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM plans WHERE subject = $1")
        .bind(subject)
        .execute(exec)
        .await
        .with_context(|| format!("failed to delete plan for {subject:?}"))?;

    Ok(result.rows_affected())
}
