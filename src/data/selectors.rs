//! Selector set describing the upstream markup
//!
//! The restaurant website is owned by a third party, so every CSS selector,
//! attribute name and path segment used for scraping lives here as data. The
//! defaults match the current markup; a JSON file can override any subset.
//!
//! ```json
//! { "items": { "container": "li.dish", "price": ".dish-price" } }
//! ```

use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or compiling a selector set
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The overrides file could not be read
    #[error("Failed to read selector file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The overrides file is not valid JSON for a selector set
    #[error("Invalid selector file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configured CSS selector does not parse
    #[error("Invalid CSS selector for {field}: '{selector}' ({message})")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Selectors for the category list on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryConfig {
    pub container: String,
    pub id_attribute: String,
    pub name: String,
    pub description: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            container: ".menu-category".to_string(),
            id_attribute: "data-category-id".to_string(),
            name: ".category-name".to_string(),
            description: ".category-description".to_string(),
        }
    }
}

/// Selectors for the item list on a category page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemConfig {
    pub container: String,
    pub id_attribute: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub image_attribute: String,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            container: ".menu-item".to_string(),
            id_attribute: "data-item-id".to_string(),
            name: ".item-name".to_string(),
            price: ".item-price".to_string(),
            description: ".item-description".to_string(),
            image: ".item-image".to_string(),
            image_attribute: "src".to_string(),
        }
    }
}

/// Selectors for an item detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemDetailConfig {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub image_attribute: String,
    pub ingredient: String,
    pub allergen: String,
    pub nutrition_row: String,
    pub nutrition_name: String,
    pub nutrition_value: String,
}

impl Default for ItemDetailConfig {
    fn default() -> Self {
        Self {
            name: ".item-detail-name".to_string(),
            price: ".item-detail-price".to_string(),
            description: ".item-detail-description".to_string(),
            image: ".item-detail-image".to_string(),
            image_attribute: "src".to_string(),
            ingredient: ".ingredient-item".to_string(),
            allergen: ".allergen-item".to_string(),
            nutrition_row: ".nutrition-item".to_string(),
            nutrition_name: ".nutrition-name".to_string(),
            nutrition_value: ".nutrition-value".to_string(),
        }
    }
}

/// Selectors for the restaurant information block on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestaurantConfig {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub description: String,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: ".restaurant-name".to_string(),
            address: ".restaurant-address".to_string(),
            phone: ".restaurant-phone".to_string(),
            hours: ".restaurant-hours".to_string(),
            description: ".restaurant-description".to_string(),
        }
    }
}

/// Selectors for the specials page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialConfig {
    pub container: String,
    pub id_attribute: String,
    pub name: String,
    pub price: String,
    pub description: String,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self {
            container: ".special-item".to_string(),
            id_attribute: "data-item-id".to_string(),
            name: ".special-name".to_string(),
            price: ".special-price".to_string(),
            description: ".special-description".to_string(),
        }
    }
}

/// Path segments appended to the base origin for each page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstreamPaths {
    /// `<base>/<category>/<categoryId>`
    pub category: String,
    /// `<base>/<item>/<itemId>`
    pub item: String,
    /// `<base>/<specials>`
    pub specials: String,
}

impl Default for UpstreamPaths {
    fn default() -> Self {
        Self {
            category: "category".to_string(),
            item: "item".to_string(),
            specials: "specials".to_string(),
        }
    }
}

/// Uncompiled selector set, as read from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    pub categories: CategoryConfig,
    pub items: ItemConfig,
    pub item_detail: ItemDetailConfig,
    pub restaurant: RestaurantConfig,
    pub specials: SpecialConfig,
    pub paths: UpstreamPaths,
}

impl SelectorConfig {
    /// Loads overrides from a JSON file; fields the file omits keep their defaults
    pub fn load(path: &Path) -> Result<Self, SelectorError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| SelectorError::Io {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SelectorError::Json {
            path: display,
            source,
        })
    }

    /// Parses every CSS selector once so extraction never has to
    pub fn compile(&self) -> Result<Selectors, SelectorError> {
        let c = &self.categories;
        let i = &self.items;
        let d = &self.item_detail;
        let r = &self.restaurant;
        let s = &self.specials;

        Ok(Selectors {
            categories: CategorySelectors {
                container: parse("categories.container", &c.container)?,
                id_attribute: c.id_attribute.clone(),
                name: parse("categories.name", &c.name)?,
                description: parse("categories.description", &c.description)?,
            },
            items: ItemSelectors {
                container: parse("items.container", &i.container)?,
                id_attribute: i.id_attribute.clone(),
                name: parse("items.name", &i.name)?,
                price: parse("items.price", &i.price)?,
                description: parse("items.description", &i.description)?,
                image: parse("items.image", &i.image)?,
                image_attribute: i.image_attribute.clone(),
            },
            item_detail: ItemDetailSelectors {
                name: parse("itemDetail.name", &d.name)?,
                price: parse("itemDetail.price", &d.price)?,
                description: parse("itemDetail.description", &d.description)?,
                image: parse("itemDetail.image", &d.image)?,
                image_attribute: d.image_attribute.clone(),
                ingredient: parse("itemDetail.ingredient", &d.ingredient)?,
                allergen: parse("itemDetail.allergen", &d.allergen)?,
                nutrition_row: parse("itemDetail.nutritionRow", &d.nutrition_row)?,
                nutrition_name: parse("itemDetail.nutritionName", &d.nutrition_name)?,
                nutrition_value: parse("itemDetail.nutritionValue", &d.nutrition_value)?,
            },
            restaurant: RestaurantSelectors {
                name: parse("restaurant.name", &r.name)?,
                address: parse("restaurant.address", &r.address)?,
                phone: parse("restaurant.phone", &r.phone)?,
                hours: parse("restaurant.hours", &r.hours)?,
                description: parse("restaurant.description", &r.description)?,
            },
            specials: SpecialSelectors {
                container: parse("specials.container", &s.container)?,
                id_attribute: s.id_attribute.clone(),
                name: parse("specials.name", &s.name)?,
                price: parse("specials.price", &s.price)?,
                description: parse("specials.description", &s.description)?,
            },
            paths: self.paths.clone(),
        })
    }
}

fn parse(field: &'static str, css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|e| SelectorError::InvalidSelector {
        field,
        selector: css.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct CategorySelectors {
    pub container: Selector,
    pub id_attribute: String,
    pub name: Selector,
    pub description: Selector,
}

#[derive(Debug, Clone)]
pub struct ItemSelectors {
    pub container: Selector,
    pub id_attribute: String,
    pub name: Selector,
    pub price: Selector,
    pub description: Selector,
    pub image: Selector,
    pub image_attribute: String,
}

#[derive(Debug, Clone)]
pub struct ItemDetailSelectors {
    pub name: Selector,
    pub price: Selector,
    pub description: Selector,
    pub image: Selector,
    pub image_attribute: String,
    pub ingredient: Selector,
    pub allergen: Selector,
    pub nutrition_row: Selector,
    pub nutrition_name: Selector,
    pub nutrition_value: Selector,
}

#[derive(Debug, Clone)]
pub struct RestaurantSelectors {
    pub name: Selector,
    pub address: Selector,
    pub phone: Selector,
    pub hours: Selector,
    pub description: Selector,
}

#[derive(Debug, Clone)]
pub struct SpecialSelectors {
    pub container: Selector,
    pub id_attribute: String,
    pub name: Selector,
    pub price: Selector,
    pub description: Selector,
}

/// Compiled selector set used by the extractor
#[derive(Debug, Clone)]
pub struct Selectors {
    pub categories: CategorySelectors,
    pub items: ItemSelectors,
    pub item_detail: ItemDetailSelectors,
    pub restaurant: RestaurantSelectors,
    pub specials: SpecialSelectors,
    pub paths: UpstreamPaths,
}
