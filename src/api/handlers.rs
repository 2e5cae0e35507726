//! Route handlers
//!
//! Cached routes build their key from the route name and path parameters and
//! go through [`with_cache`]. Extractor rejections are returned as
//! [`ApiError`] so malformed requests still get the failure envelope.

use std::future::Future;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::response::{ApiError, Success};
use super::search::search_menu;
use super::AppState;
use crate::cache::CacheManager;
use crate::data::{MenuItem, ServiceError};

/// Builds the cache key for a route and its path parameters
pub fn cache_key(route: &str, params: &Value) -> String {
    format!("{route}_{params}")
}

/// Serves a route from the cache, or runs `handler` and caches its envelope
///
/// Only successful responses are stored. With no cache every call goes
/// straight to the handler.
pub async fn with_cache<T, F, Fut>(
    cache: Option<&CacheManager>,
    key: String,
    handler: F,
) -> Result<Json<Value>, ApiError>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    if let Some(cache) = cache {
        if let Some(cached) = cache.read::<Value>(&key) {
            debug!(key = %key, cached_at = %cached.cached_at, "Cache hit");
            return Ok(Json(cached.data));
        }
    }

    let data = handler().await?;
    let envelope = serde_json::to_value(Success::new(data))?;

    if let Some(cache) = cache {
        cache.write(&key, &envelope)?;
    }
    Ok(Json(envelope))
}

/// Liveness check
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Restaurant Menu API is running" }))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let key = cache_key("categories", &json!({}));
    with_cache(state.cache.as_ref(), key, || state.service.menu_categories()).await
}

pub async fn items_by_category(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(category_id) = path?;
    let key = cache_key("items_by_category", &json!({ "categoryId": category_id }));
    with_cache(state.cache.as_ref(), key, || {
        state.service.menu_items_by_category(&category_id)
    })
    .await
}

pub async fn item_details(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(item_id) = path?;
    let key = cache_key("item_details", &json!({ "itemId": item_id }));
    with_cache(state.cache.as_ref(), key, || {
        state.service.menu_item_details(&item_id)
    })
    .await
}

pub async fn restaurant(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let key = cache_key("restaurant_info", &json!({}));
    with_cache(state.cache.as_ref(), key, || state.service.restaurant_info()).await
}

pub async fn specials(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let key = cache_key("daily_specials", &json!({}));
    with_cache(state.cache.as_ref(), key, || state.service.daily_specials()).await
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

/// Searches item names and descriptions across every category; never cached
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Success<Vec<MenuItem>>>, ApiError> {
    let Query(params) = params?;
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::Validation("Search query is required"))?;

    let results = search_menu(&state.service, &query).await?;
    Ok(Json(Success::new(results)))
}
