//! Menu data service
//!
//! Composes the site client with the extractor into the five operations the
//! API exposes. Failures are logged with their cause and surfaced as a
//! [`ServiceError`] carrying a fixed, human readable message.

use std::sync::Arc;

use scraper::Html;
use thiserror::Error;
use tracing::error;

use super::extract;
use super::fetcher::{FetchError, SiteClient};
use super::selectors::Selectors;
use super::{Category, ItemDetail, MenuItem, RestaurantInfo, Special};

/// A failed service operation
///
/// Displays as `Failed to fetch <subject>`; the cause is kept as the source
/// for logging but never shown to API clients.
#[derive(Debug, Error)]
#[error("Failed to fetch {subject}")]
pub struct ServiceError {
    subject: &'static str,
    #[source]
    source: FetchError,
}

impl ServiceError {
    pub fn subject(&self) -> &'static str {
        self.subject
    }
}

/// Scrapes menu data from the restaurant website
#[derive(Debug, Clone)]
pub struct MenuService {
    client: SiteClient,
    selectors: Arc<Selectors>,
}

impl MenuService {
    pub fn new(client: SiteClient, selectors: Selectors) -> Self {
        Self {
            client,
            selectors: Arc::new(selectors),
        }
    }

    /// Parses `body` and runs one extractor over it
    ///
    /// Kept synchronous so the document never lives across an await point.
    fn extract<T>(&self, body: &str, view: impl FnOnce(&Html, &Selectors) -> T) -> T {
        let doc = Html::parse_document(body);
        view(&doc, &self.selectors)
    }

    pub async fn menu_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let body = self.client.fetch(&[]).await.map_err(|source| {
            error!(error = %source, "Error fetching menu categories");
            ServiceError {
                subject: "menu categories",
                source,
            }
        })?;

        Ok(self.extract(&body, extract::categories))
    }

    pub async fn menu_items_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<MenuItem>, ServiceError> {
        let segment = self.selectors.paths.category.as_str();
        let body = self
            .client
            .fetch(&[segment, category_id])
            .await
            .map_err(|source| {
                error!(category_id, error = %source, "Error fetching menu items for category");
                ServiceError {
                    subject: "menu items",
                    source,
                }
            })?;

        Ok(self.extract(&body, extract::items))
    }

    pub async fn menu_item_details(&self, item_id: &str) -> Result<ItemDetail, ServiceError> {
        let segment = self.selectors.paths.item.as_str();
        let body = self
            .client
            .fetch(&[segment, item_id])
            .await
            .map_err(|source| {
                error!(item_id, error = %source, "Error fetching details for item");
                ServiceError {
                    subject: "item details",
                    source,
                }
            })?;

        Ok(self.extract(&body, |doc, selectors| {
            extract::item_detail(doc, selectors, item_id)
        }))
    }

    pub async fn restaurant_info(&self) -> Result<RestaurantInfo, ServiceError> {
        let body = self.client.fetch(&[]).await.map_err(|source| {
            error!(error = %source, "Error fetching restaurant information");
            ServiceError {
                subject: "restaurant information",
                source,
            }
        })?;

        Ok(self.extract(&body, extract::restaurant_info))
    }

    pub async fn daily_specials(&self) -> Result<Vec<Special>, ServiceError> {
        let segment = self.selectors.paths.specials.as_str();
        let body = self.client.fetch(&[segment]).await.map_err(|source| {
            error!(error = %source, "Error fetching daily specials");
            ServiceError {
                subject: "daily specials",
                source,
            }
        })?;

        Ok(self.extract(&body, extract::specials))
    }
}
