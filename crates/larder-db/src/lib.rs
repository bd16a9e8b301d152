//! PostgreSQL persistence for the larder catalog, profiles and weekly plans.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
