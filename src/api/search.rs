//! Naive full-text search over menu items
//!
//! Fetches every category, then every category's items, and keeps items whose
//! name or description contains the query, ignoring case. Results keep the
//! category order of the website and the item order within each category.

use futures::future::try_join_all;
use tracing::debug;

use crate::data::{Category, MenuItem, MenuService, ServiceError};

/// Case-insensitive substring match on name or description
fn matches(item: &MenuItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle) || item.description.to_lowercase().contains(needle)
}

/// Keeps the matching items and tags them with their category name
fn filter_category(category: &Category, items: Vec<MenuItem>, needle: &str) -> Vec<MenuItem> {
    items
        .into_iter()
        .filter(|item| matches(item, needle))
        .map(|item| MenuItem {
            category: Some(category.name.clone()),
            ..item
        })
        .collect()
}

/// Searches all categories for `query`
///
/// Per-category item fetches run concurrently; the first failure fails the
/// whole search. No deduplication and no ranking.
pub async fn search_menu(service: &MenuService, query: &str) -> Result<Vec<MenuItem>, ServiceError> {
    let needle = query.to_lowercase();
    let categories = service.menu_categories().await?;

    let per_category = try_join_all(
        categories
            .iter()
            .map(|category| service.menu_items_by_category(&category.id)),
    )
    .await?;

    let results: Vec<MenuItem> = categories
        .iter()
        .zip(per_category)
        .flat_map(|(category, items)| filter_category(category, items, &needle))
        .collect();

    debug!(query, categories = categories.len(), hits = results.len(), "Search finished");
    Ok(results)
}
