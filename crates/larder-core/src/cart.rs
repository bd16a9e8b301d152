//! Week-long shopping cart and its persisted snapshot.
//!
//! Lines are keyed by commercial product name, so buying the same product
//! for two recipes accumulates onto one line. The snapshot is a JSON object
//! keyed by product name:
//!
//! ```json
//! {"Milk 1L": {"super": "Corner Shop", "unidades": 2, "precio_u": 0.95,
//!              "total": 1.9, "imagen": null, "peso": "1kg"}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::package::format_weight;

/// Store name used for snapshot lines that carry none.
pub const UNKNOWN_STORE: &str = "Otros";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed shopping list snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One aggregated shopping-list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "super", default = "unknown_store")]
    pub store: String,
    #[serde(rename = "unidades")]
    pub units: u32,
    /// Unit price when the line was first bought.
    #[serde(rename = "precio_u")]
    pub unit_price: f64,
    pub total: f64,
    #[serde(rename = "imagen", default)]
    pub image_url: Option<String>,
    #[serde(rename = "peso", default)]
    pub weight: String,
}

fn unknown_store() -> String {
    UNKNOWN_STORE.to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingCart {
    lines: BTreeMap<String, CartLine>,
}

/// Lines bought at one store, with their subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup {
    pub store: String,
    /// `(product name, line)` in product-name order.
    pub lines: Vec<(String, CartLine)>,
    pub subtotal: f64,
}

impl ShoppingCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `units` packages of `product` bought at `store_name`.
    pub fn add_purchase(&mut self, product: &Product, store_name: &str, units: u32) {
        let line = self
            .lines
            .entry(product.name.clone())
            .or_insert_with(|| CartLine {
                store: store_name.to_owned(),
                units: 0,
                unit_price: product.unit_price,
                total: 0.0,
                image_url: product.image_url.clone(),
                weight: format_weight(product.package_grams),
            });
        line.units += units;
        line.total += f64::from(units) * product.unit_price;
    }

    pub fn line(&self, product_name: &str) -> Option<&CartLine> {
        self.lines.get(product_name)
    }

    pub fn lines(&self) -> impl Iterator<Item = (&str, &CartLine)> {
        self.lines.iter().map(|(name, line)| (name.as_str(), line))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of every line total.
    pub fn total(&self) -> f64 {
        self.lines.values().map(|l| l.total).sum()
    }

    /// Lines grouped by store (stores in name order) with subtotals.
    pub fn by_store(&self) -> Vec<StoreGroup> {
        let mut groups: BTreeMap<&str, StoreGroup> = BTreeMap::new();
        for (name, line) in &self.lines {
            let group = groups.entry(line.store.as_str()).or_insert_with(|| StoreGroup {
                store: line.store.clone(),
                lines: Vec::new(),
                subtotal: 0.0,
            });
            group.subtotal += line.total;
            group.lines.push((name.clone(), line.clone()));
        }
        groups.into_values().collect()
    }

    pub fn to_snapshot(&self) -> Result<serde_json::Value, SnapshotError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_snapshot(value: &serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(Self::deserialize(value)?)
    }
}
