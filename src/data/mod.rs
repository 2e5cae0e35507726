//! Core data models for the restaurant menu API
//!
//! This module contains the records scraped from the restaurant website along
//! with the clients that fetch and extract them. Every record is built fresh on
//! each extraction; ids are opaque strings copied from the upstream markup.

pub mod extract;
pub mod fetcher;
pub mod selectors;
pub mod service;

pub use fetcher::{FetchError, SiteClient};
pub use selectors::{SelectorConfig, SelectorError, Selectors};
pub use service::{MenuService, ServiceError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A menu category such as "Starters" or "Desserts"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A dish listed under a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Price as displayed on the website, currency symbol included
    pub price: String,
    pub description: String,
    /// Image URL, `null` when the item has no image
    pub image: Option<String>,
    /// Name of the owning category, only set by search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Full detail page of a single menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: Option<String>,
    /// Ingredients in document order
    pub ingredients: Vec<String>,
    /// Allergens in document order
    pub allergens: Vec<String>,
    /// Nutrient name to displayed value, e.g. "Calories" -> "250 kcal"
    pub nutritional_info: BTreeMap<String, String>,
}

/// General information about the restaurant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub description: String,
}

/// A daily special, shaped like a menu item without an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Special {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
}
