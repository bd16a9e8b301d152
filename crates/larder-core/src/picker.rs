//! Cheapest-offering lookup.

use tracing::debug;

use crate::catalog::{Catalog, IngredientId, Product};
use crate::profile::StoreSet;

/// The product with the lowest price per kilogram for `ingredient` among
/// `stores`. Ties keep the first product in catalog order.
///
/// Offerings that cannot be bought by weight (non-positive package, missing
/// or non-positive price per kg) are passed over, so a valid product is
/// still found behind a broken one.
pub fn resolve_product<'c>(
    catalog: &'c Catalog,
    ingredient: IngredientId,
    stores: &StoreSet,
) -> Option<&'c Product> {
    let mut best: Option<(&Product, f64)> = None;
    for product in catalog
        .products_for(ingredient)
        .filter(|p| stores.contains(p.store))
    {
        let Some(per_kg) = usable_price_per_kg(product) else {
            debug!(product = %product.name, "skipping unpriceable offering");
            continue;
        };
        match best {
            Some((_, current)) if per_kg.total_cmp(&current).is_ge() => {}
            _ => best = Some((product, per_kg)),
        }
    }
    best.map(|(product, _)| product)
}

fn usable_price_per_kg(product: &Product) -> Option<f64> {
    if product.package_grams <= 0 {
        return None;
    }
    product
        .price_per_kg
        .filter(|per_kg| per_kg.is_finite() && *per_kg > 0.0)
}
