//! Catalog TOML parser with validation.
//!
//! Parses a catalog file into a [`CatalogToml`] and validates:
//! - Store, ingredient, recipe and profile names are unique.
//! - Product names are unique per store.
//! - Products, recipes and profiles only reference declared stores and
//!   ingredients.
//! - Package weights and requirement grams are positive, prices are not
//!   negative, and every recipe has at least one ingredient.
//! - Appliance names are known.

use std::collections::HashSet;

use thiserror::Error;

use super::Appliances;
use super::toml_format::CatalogToml;

/// Errors that can occur during catalog parsing and validation.
#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("duplicate store: {0:?}")]
    DuplicateStore(String),

    #[error("duplicate ingredient: {0:?}")]
    DuplicateIngredient(String),

    #[error("duplicate recipe title: {0:?}")]
    DuplicateRecipe(String),

    #[error("duplicate product {product:?} at store {store:?}")]
    DuplicateProduct { store: String, product: String },

    #[error("duplicate profile: {0:?}")]
    DuplicateProfile(String),

    #[error("{owner:?} references unknown store {store:?}")]
    UnknownStore { owner: String, store: String },

    #[error("{owner:?} references unknown ingredient {ingredient:?}")]
    UnknownIngredient { owner: String, ingredient: String },

    #[error("product {product:?} has non-positive package weight {grams}g")]
    NonPositiveWeight { product: String, grams: i64 },

    #[error("product {product:?} has invalid price {price}")]
    InvalidPrice { product: String, price: f64 },

    #[error("recipe {recipe:?} needs a positive amount of {ingredient:?}, got {grams}g")]
    NonPositiveGrams {
        recipe: String,
        ingredient: String,
        grams: i64,
    },

    #[error("recipe {0:?} has no ingredients")]
    EmptyRecipe(String),

    #[error(
        "invalid appliance {value:?} on {owner:?} \
         (expected oven, pan, airfryer, microwave, or tupper)"
    )]
    InvalidAppliance { owner: String, value: String },
}

/// Parse and validate a catalog TOML string.
pub fn parse_catalog_toml(content: &str) -> Result<CatalogToml, CatalogParseError> {
    let catalog: CatalogToml = toml::from_str(content)?;
    validate(&catalog)?;
    Ok(catalog)
}

/// Turn appliance names into flags.
pub fn parse_appliances(owner: &str, names: &[String]) -> Result<Appliances, CatalogParseError> {
    let mut flags = Appliances::default();
    for name in names {
        let flag = match name.to_ascii_lowercase().as_str() {
            "oven" => &mut flags.oven,
            "pan" => &mut flags.pan,
            "airfryer" => &mut flags.airfryer,
            "microwave" => &mut flags.microwave,
            "tupper" => &mut flags.tupper,
            _ => {
                return Err(CatalogParseError::InvalidAppliance {
                    owner: owner.to_owned(),
                    value: name.clone(),
                });
            }
        };
        *flag = true;
    }
    Ok(flags)
}

fn validate(catalog: &CatalogToml) -> Result<(), CatalogParseError> {
    let mut stores = HashSet::new();
    for store in &catalog.stores {
        if !stores.insert(store.name.as_str()) {
            return Err(CatalogParseError::DuplicateStore(store.name.clone()));
        }
    }

    let mut ingredients = HashSet::new();
    for ingredient in &catalog.ingredients {
        if !ingredients.insert(ingredient.name.as_str()) {
            return Err(CatalogParseError::DuplicateIngredient(
                ingredient.name.clone(),
            ));
        }
    }

    let mut products = HashSet::new();
    for product in &catalog.products {
        if !products.insert((product.store.as_str(), product.name.as_str())) {
            return Err(CatalogParseError::DuplicateProduct {
                store: product.store.clone(),
                product: product.name.clone(),
            });
        }
        if !stores.contains(product.store.as_str()) {
            return Err(CatalogParseError::UnknownStore {
                owner: product.name.clone(),
                store: product.store.clone(),
            });
        }
        if let Some(ingredient) = &product.ingredient {
            if !ingredients.contains(ingredient.as_str()) {
                return Err(CatalogParseError::UnknownIngredient {
                    owner: product.name.clone(),
                    ingredient: ingredient.clone(),
                });
            }
        }
        if product.grams <= 0 {
            return Err(CatalogParseError::NonPositiveWeight {
                product: product.name.clone(),
                grams: product.grams,
            });
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(CatalogParseError::InvalidPrice {
                product: product.name.clone(),
                price: product.price,
            });
        }
    }

    let mut titles = HashSet::new();
    for recipe in &catalog.recipes {
        if !titles.insert(recipe.title.as_str()) {
            return Err(CatalogParseError::DuplicateRecipe(recipe.title.clone()));
        }
        if recipe.ingredients.is_empty() {
            return Err(CatalogParseError::EmptyRecipe(recipe.title.clone()));
        }
        for item in &recipe.ingredients {
            if !ingredients.contains(item.name.as_str()) {
                return Err(CatalogParseError::UnknownIngredient {
                    owner: recipe.title.clone(),
                    ingredient: item.name.clone(),
                });
            }
            if item.grams <= 0 {
                return Err(CatalogParseError::NonPositiveGrams {
                    recipe: recipe.title.clone(),
                    ingredient: item.name.clone(),
                    grams: item.grams,
                });
            }
        }
        parse_appliances(&recipe.title, &recipe.appliances)?;
    }

    let mut subjects = HashSet::new();
    for profile in &catalog.profiles {
        if !subjects.insert(profile.subject.as_str()) {
            return Err(CatalogParseError::DuplicateProfile(profile.subject.clone()));
        }
        for store in &profile.stores {
            if !stores.contains(store.as_str()) {
                return Err(CatalogParseError::UnknownStore {
                    owner: profile.subject.clone(),
                    store: store.clone(),
                });
            }
        }
        let kitchen = parse_appliances(&profile.subject, &profile.kitchen)?;
        if kitchen.tupper {
            return Err(CatalogParseError::InvalidAppliance {
                owner: profile.subject.clone(),
                value: "tupper".to_owned(),
            });
        }
    }

    Ok(())
}
