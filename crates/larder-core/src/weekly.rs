//! Calendar and shopping-list view of a stored plan.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use larder_db::models::{MealSlot, Plan, ScheduledMeal};

use crate::cart::{ShoppingCart, StoreGroup};
use crate::planner::DAYS_PER_WEEK;

/// Day names, Monday first; day index 0 is the plan's first day.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK as usize] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub index: u8,
    pub name: &'static str,
    /// Recipe title, if the slot was filled.
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyView {
    pub subject: String,
    pub start_date: NaiveDate,
    pub total_cost: f64,
    pub days: Vec<DayView>,
    pub shopping: Vec<StoreGroup>,
}

impl WeeklyView {
    /// Lay out `meals` on the calendar and group the plan's shopping list.
    ///
    /// Meals whose recipe is missing from `titles` or whose day is out of
    /// range are dropped. An unreadable snapshot shows as an empty list.
    pub fn build(plan: &Plan, meals: &[ScheduledMeal], titles: &HashMap<Uuid, String>) -> Self {
        let mut days: Vec<DayView> = (0..DAYS_PER_WEEK)
            .map(|index| DayView {
                index,
                name: DAY_NAMES[usize::from(index)],
                lunch: None,
                dinner: None,
            })
            .collect();

        for meal in meals {
            let Some(day) = usize::try_from(meal.day).ok().and_then(|d| days.get_mut(d)) else {
                warn!(plan = %plan.id, day = meal.day, "meal outside the week");
                continue;
            };
            let Some(title) = titles.get(&meal.recipe_id) else {
                warn!(plan = %plan.id, recipe = %meal.recipe_id, "meal references unknown recipe");
                continue;
            };
            match meal.slot {
                MealSlot::Lunch => day.lunch = Some(title.clone()),
                MealSlot::Dinner => day.dinner = Some(title.clone()),
            }
        }

        let shopping = match ShoppingCart::from_snapshot(&plan.shopping_list) {
            Ok(cart) => cart.by_store(),
            Err(e) => {
                warn!(plan = %plan.id, error = %e, "ignoring shopping list");
                Vec::new()
            }
        };

        Self {
            subject: plan.subject.clone(),
            start_date: plan.start_date,
            total_cost: plan.total_cost,
            days,
            shopping,
        }
    }

    /// Sum of the store subtotals.
    pub fn shopping_total(&self) -> f64 {
        self.shopping.iter().map(|g| g.subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn plan(shopping_list: serde_json::Value) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            subject: "sam".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            total_cost: 12.5,
            shopping_list,
            created_at: Utc::now(),
        }
    }

    fn meal(plan: &Plan, recipe: Uuid, day: i16, slot: MealSlot) -> ScheduledMeal {
        ScheduledMeal {
            plan_id: plan.id,
            recipe_id: recipe,
            day,
            slot,
        }
    }

    #[test]
    fn calendar_has_seven_named_days() {
        let view = WeeklyView::build(&plan(json!({})), &[], &HashMap::new());
        assert_eq!(view.days.len(), 7);
        assert_eq!(view.days[0].name, "Monday");
        assert_eq!(view.days[6].name, "Sunday");
        assert!(view.days.iter().all(|d| d.lunch.is_none() && d.dinner.is_none()));
    }

    #[test]
    fn meals_land_in_their_slots() {
        let p = plan(json!({}));
        let stew = Uuid::new_v4();
        let soup = Uuid::new_v4();
        let titles = HashMap::from([(stew, "Stew".to_owned()), (soup, "Soup".to_owned())]);
        let meals = [
            meal(&p, stew, 0, MealSlot::Lunch),
            meal(&p, soup, 0, MealSlot::Dinner),
            meal(&p, stew, 3, MealSlot::Dinner),
            meal(&p, soup, 9, MealSlot::Lunch),
        ];

        let view = WeeklyView::build(&p, &meals, &titles);
        assert_eq!(view.days[0].lunch.as_deref(), Some("Stew"));
        assert_eq!(view.days[0].dinner.as_deref(), Some("Soup"));
        assert_eq!(view.days[3].lunch, None);
        assert_eq!(view.days[3].dinner.as_deref(), Some("Stew"));
    }

    #[test]
    fn shopping_list_grouped_with_subtotals() {
        let p = plan(json!({
            "Milk 1L": {"super": "Corner Shop", "unidades": 2, "precio_u": 0.95,
                        "total": 1.9, "imagen": null, "peso": "1kg"},
            "Bread": {"super": "Bakery", "unidades": 1, "precio_u": 1.2,
                      "total": 1.2, "imagen": null, "peso": "400g"},
            "Eggs x12": {"super": "Corner Shop", "unidades": 1, "precio_u": 2.3,
                         "total": 2.3, "imagen": null, "peso": "720g"},
            "Honey": {"unidades": 1, "precio_u": 4.0, "total": 4.0}
        }));

        let view = WeeklyView::build(&p, &[], &HashMap::new());
        let stores: Vec<&str> = view.shopping.iter().map(|g| g.store.as_str()).collect();
        assert_eq!(stores, vec!["Bakery", "Corner Shop", "Otros"]);
        assert!((view.shopping[1].subtotal - 4.2).abs() < 1e-9);
        assert!((view.shopping_total() - 9.4).abs() < 1e-9);
    }

    #[test]
    fn malformed_snapshot_shows_empty_list() {
        let p = plan(json!(["not", "an", "object"]));
        let view = WeeklyView::build(&p, &[], &HashMap::new());
        assert!(view.shopping.is_empty());
        assert_eq!(view.total_cost, 12.5);
    }
}
