//! Integration tests for the catalog and plan query functions.

use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use larder_db::models::MealSlot;
use larder_db::queries::plans::{self, NewMeal, NewPlan};
use larder_db::queries::products::{self, NewProduct};
use larder_db::queries::recipes::{self, NewRecipe};
use larder_db::queries::stores;
use larder_test_utils::{create_test_db, drop_test_db};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

async fn insert_recipe(pool: &PgPool, title: &str) -> Uuid {
    recipes::upsert_recipe(
        pool,
        &NewRecipe {
            title,
            prep_minutes: 10,
            suits_oven: false,
            suits_pan: true,
            suits_airfryer: false,
            suits_microwave: false,
            suits_tupper: false,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn upsert_store_is_idempotent() {
    let (pool, db_name) = create_test_db().await;

    let first = stores::upsert_store(&pool, "Market").await.unwrap();
    let again = stores::upsert_store(&pool, "Market").await.unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(stores::list_stores(&pool).await.unwrap().len(), 1);
    assert!(stores::get_store_by_name(&pool, "Elsewhere").await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn products_list_by_store_then_name() {
    let (pool, db_name) = create_test_db().await;

    let b = stores::upsert_store(&pool, "B-Mart").await.unwrap();
    let a = stores::upsert_store(&pool, "A-Mart").await.unwrap();
    for (store, name) in [(b.id, "Apples"), (a.id, "Pears"), (a.id, "Figs")] {
        products::upsert_product(
            &pool,
            &NewProduct {
                store_id: store,
                base_ingredient_id: None,
                commercial_name: name,
                unit_price: 1.0,
                package_grams: 500,
                price_per_kg: 2.0,
                image_url: None,
            },
        )
        .await
        .unwrap();
    }

    let names: Vec<String> = products::list_products(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.commercial_name)
        .collect();
    assert_eq!(names, vec!["Figs", "Pears", "Apples"]);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn replace_plan_keeps_one_plan_per_subject() {
    let (pool, db_name) = create_test_db().await;
    let stew = insert_recipe(&pool, "Stew").await;
    let soup = insert_recipe(&pool, "Soup").await;
    let list = json!({"Milk 1L": {"super": "Market", "unidades": 1, "precio_u": 0.95,
                                  "total": 0.95, "imagen": null, "peso": "1kg"}});

    let first = plans::replace_plan_for_subject(
        &pool,
        &NewPlan {
            subject: "sam",
            start_date: monday(),
            total_cost: 5.0,
            shopping_list: &list,
        },
        &[NewMeal {
            recipe_id: stew,
            day: 0,
            slot: MealSlot::Lunch,
        }],
    )
    .await
    .unwrap();
    assert_eq!(first.removed, 0);

    let second = plans::replace_plan_for_subject(
        &pool,
        &NewPlan {
            subject: "sam",
            start_date: monday(),
            total_cost: 7.5,
            shopping_list: &json!({}),
        },
        &[
            NewMeal {
                recipe_id: soup,
                day: 1,
                slot: MealSlot::Dinner,
            },
            NewMeal {
                recipe_id: stew,
                day: 1,
                slot: MealSlot::Lunch,
            },
        ],
    )
    .await
    .unwrap();
    assert_eq!(second.removed, 1);

    let stored = plans::get_plan_for_subject(&pool, "sam").await.unwrap().unwrap();
    assert_eq!(stored.id, second.plan.id);
    assert_eq!(stored.total_cost, 7.5);
    assert_eq!(plans::list_plans(&pool).await.unwrap().len(), 1);

    // Old meals went with the old plan; new ones come back lunch first.
    let meals = plans::list_meals_for_plan(&pool, stored.id).await.unwrap();
    let slots: Vec<MealSlot> = meals.iter().map(|m| m.slot).collect();
    assert_eq!(slots, vec![MealSlot::Lunch, MealSlot::Dinner]);
    assert!(plans::list_meals_for_plan(&pool, first.plan.id).await.unwrap().is_empty());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn concurrent_replacements_leave_one_plan() {
    let (pool, db_name) = create_test_db().await;
    let stew = insert_recipe(&pool, "Stew").await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let list = json!({});
            plans::replace_plan_for_subject(
                &pool,
                &NewPlan {
                    subject: "sam",
                    start_date: monday(),
                    total_cost: f64::from(i),
                    shopping_list: &list,
                },
                &[NewMeal {
                    recipe_id: stew,
                    day: 0,
                    slot: MealSlot::Lunch,
                }],
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("replacement should succeed");
    }

    assert_eq!(plans::list_plans(&pool).await.unwrap().len(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_and_missing_plan() {
    let (pool, db_name) = create_test_db().await;
    assert!(plans::get_plan_for_subject(&pool, "sam").await.unwrap().is_none());

    plans::replace_plan_for_subject(
        &pool,
        &NewPlan {
            subject: "sam",
            start_date: monday(),
            total_cost: 0.0,
            shopping_list: &json!({}),
        },
        &[],
    )
    .await
    .unwrap();

    assert_eq!(plans::delete_plan_for_subject(&pool, "sam").await.unwrap(), 1);
    assert_eq!(plans::delete_plan_for_subject(&pool, "sam").await.unwrap(), 0);

    pool.close().await;
    drop_test_db(&db_name).await;
}
