//! Weekly meal planning engine.
//!
//! The engine itself ([`planner`], [`selector`], [`pantry`], [`picker`],
//! [`package`], [`cart`]) is synchronous and works on an in-memory
//! [`catalog::Catalog`] snapshot. [`service`] and [`catalog::load`] wire it to
//! the database.

pub mod browse;
pub mod cart;
pub mod catalog;
pub mod costing;
pub mod nutrition;
pub mod package;
pub mod pantry;
pub mod picker;
pub mod planner;
pub mod profile;
pub mod selector;
pub mod service;
pub mod strategy;
pub mod weekly;

pub use larder_db::models::MealSlot;
