//! Database query functions for `profiles` and their selected stores.

use anyhow::{Context, Result};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::models::Profile;

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile<'a> {
    pub subject: &'a str,
    pub energy_kcal: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub carbs_g: i32,
    pub weekly_budget: Option<f64>,
    pub has_oven: bool,
    pub has_pan: bool,
    pub has_airfryer: bool,
    pub has_microwave: bool,
}

/// Create or overwrite the profile of a subject.
pub async fn upsert_profile<'e>(
    exec: impl PgExecutor<'e>,
    new: &NewProfile<'_>,
) -> Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles \
             (subject, energy_kcal, protein_g, fat_g, carbs_g, weekly_budget, \
              has_oven, has_pan, has_airfryer, has_microwave) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (subject) DO UPDATE SET \
             energy_kcal = EXCLUDED.energy_kcal, \
             protein_g = EXCLUDED.protein_g, \
             fat_g = EXCLUDED.fat_g, \
             carbs_g = EXCLUDED.carbs_g, \
             weekly_budget = EXCLUDED.weekly_budget, \
             has_oven = EXCLUDED.has_oven, \
             has_pan = EXCLUDED.has_pan, \
             has_airfryer = EXCLUDED.has_airfryer, \
             has_microwave = EXCLUDED.has_microwave, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(new.subject)
    .bind(new.energy_kcal)
    .bind(new.protein_g)
    .bind(new.fat_g)
    .bind(new.carbs_g)
    .bind(new.weekly_budget)
    .bind(new.has_oven)
    .bind(new.has_pan)
    .bind(new.has_airfryer)
    .bind(new.has_microwave)
    .fetch_one(exec)
    .await
    .with_context(|| format!("failed to upsert profile {:?}", new.subject))?;

    Ok(profile)
}

/// Fetch the profile of a subject.
pub async fn get_profile<'e>(exec: impl PgExecutor<'e>, subject: &str) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE subject = $1")
        .bind(subject)
        .fetch_optional(exec)
        .await
        .with_context(|| format!("failed to fetch profile {subject:?}"))?;

    Ok(profile)
}

/// Replace the set of stores a subject shops at. An empty set means "all
/// stores".
pub async fn set_profile_stores(
    conn: &mut PgConnection,
    subject: &str,
    store_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM profile_stores WHERE subject = $1")
        .bind(subject)
        .execute(&mut *conn)
        .await
        .context("failed to clear profile stores")?;

    for store_id in store_ids {
        sqlx::query(
            "INSERT INTO profile_stores (subject, store_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(subject)
        .bind(store_id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("failed to link store {store_id} to profile {subject:?}"))?;
    }

    Ok(())
}

/// Store ids selected by a subject (possibly empty).
pub async fn list_profile_store_ids<'e>(
    exec: impl PgExecutor<'e>,
    subject: &str,
) -> Result<Vec<Uuid>> {
    let ids: Vec<Uuid> = sqlx::query_scalar(
        "SELECT ps.store_id FROM profile_stores ps \
         JOIN stores s ON s.id = ps.store_id \
         WHERE ps.subject = $1 \
         ORDER BY s.name",
    )
    .bind(subject)
    .fetch_all(exec)
    .await
    .context("failed to list profile stores")?;

    Ok(ids)
}
