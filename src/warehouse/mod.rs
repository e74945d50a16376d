//! Warehouse records as the views consume them

pub mod orders;
mod packaging;

use serde::{Deserialize, Serialize};

use crate::util::Priced;

pub use packaging::*;

/// Product reference embedded in stock and order items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub code: String,
    pub name: String,
}

/// Package an item is stored in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub code: String,
    #[serde(rename = "type")]
    pub package_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    pub unit: String,
}

/// Stock kept at a warehouse location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseItem {
    pub code: String,
    #[serde(alias = "stock_item")]
    pub product: ProductRef,
    pub unit_of_measure: String,
    pub amount: f64,
    #[serde(default)]
    pub package: Option<Package>,
}

/// A line of an incoming order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductRef,
    pub amount: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
}

impl Priced for OrderItem {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }
}
