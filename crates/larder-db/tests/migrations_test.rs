//! Integration tests for database migrations and table counts.
//!
//! `create_test_db` already runs the embedded migrations; these tests check
//! the resulting schema and that re-running them is a no-op.

use larder_db::pool;
use larder_test_utils::{create_test_db, drop_test_db};

/// Tables created by the initial migration, alphabetically.
const EXPECTED_TABLES: &[&str] = &[
    "base_ingredients",
    "plans",
    "products",
    "profile_stores",
    "profiles",
    "recipe_ingredients",
    "recipe_store_costs",
    "recipes",
    "scheduled_meals",
    "stores",
];

#[tokio::test]
async fn migrations_create_all_tables() {
    let (pool, db_name) = create_test_db().await;

    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT tablename::text FROM pg_tables \
         WHERE schemaname = 'public' \
         ORDER BY tablename",
    )
    .fetch_all(&pool)
    .await
    .expect("should list tables");

    let user_tables: Vec<&str> = rows
        .iter()
        .map(|(name,)| name.as_str())
        .filter(|t| !t.starts_with("_sqlx"))
        .collect();

    assert_eq!(user_tables, EXPECTED_TABLES);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    pool::run_migrations(&pool)
        .await
        .expect("second migration run should succeed");

    let counts = pool::table_counts(&pool).await.expect("table_counts should succeed");
    assert_eq!(counts.len(), EXPECTED_TABLES.len());
    for (table, count) in &counts {
        assert_eq!(*count, 0, "table {table} should be empty after migrations");
    }

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn slot_must_be_lunch_or_dinner() {
    let (pool, db_name) = create_test_db().await;

    let plan_id: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO plans (subject, start_date, total_cost, shopping_list) \
         VALUES ('sam', DATE '2026-10-19', 0, '{}'::jsonb) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let recipe_id: uuid::Uuid =
        sqlx::query_scalar("INSERT INTO recipes (title) VALUES ('Soup') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();

    let result = sqlx::query(
        "INSERT INTO scheduled_meals (plan_id, recipe_id, day, slot) VALUES ($1, $2, 0, 'brunch')",
    )
    .bind(plan_id)
    .bind(recipe_id)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "unknown slot should violate the check constraint");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn package_weight_must_be_positive() {
    let (pool, db_name) = create_test_db().await;

    let store_id: uuid::Uuid =
        sqlx::query_scalar("INSERT INTO stores (name) VALUES ('Market') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();

    let insert = |grams: i32| {
        sqlx::query(
            "INSERT INTO products \
             (store_id, commercial_name, unit_price, package_grams, price_per_kg) \
             VALUES ($1, $2, 0.30, $3, 0)",
        )
        .bind(store_id)
        .bind(format!("Salt {grams}g"))
        .bind(grams)
    };

    assert!(insert(0).execute(&pool).await.is_err(), "zero weight should be rejected");
    assert!(insert(-5).execute(&pool).await.is_err(), "negative weight should be rejected");
    insert(1000)
        .execute(&pool)
        .await
        .expect("positive weight should be accepted");

    pool.close().await;
    drop_test_db(&db_name).await;
}
