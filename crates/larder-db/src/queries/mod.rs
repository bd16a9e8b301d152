pub mod ingredients;
pub mod plans;
pub mod products;
pub mod profiles;
pub mod recipes;
pub mod stores;
