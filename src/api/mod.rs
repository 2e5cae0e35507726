//! HTTP API for the restaurant menu
//!
//! Maps the JSON endpoints onto [`MenuService`] operations. Cached routes go
//! through [`handlers::with_cache`]; search and the liveness route do not.

pub mod handlers;
pub mod response;
pub mod search;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::cache::CacheManager;
use crate::cli::ServerConfig;
use crate::data::{MenuService, SiteClient};

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<MenuService>,
    /// `None` disables response caching
    pub cache: Option<CacheManager>,
}

impl AppState {
    pub fn new(service: MenuService, cache: Option<CacheManager>) -> Self {
        Self {
            service: Arc::new(service),
            cache,
        }
    }

    /// Builds the service and cache described by `config`
    pub fn from_config(config: &ServerConfig) -> Self {
        let client = SiteClient::new(config.base_url.clone());
        let service = MenuService::new(client, config.selectors.clone());
        let cache = config.cache_ttl.map(CacheManager::new);
        Self::new(service, cache)
    }
}

/// Routes served below `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handlers::categories))
        .route("/categories/:category_id/items", get(handlers::items_by_category))
        .route("/items/:item_id", get(handlers::item_details))
        .route("/restaurant", get(handlers::restaurant))
        .route("/specials", get(handlers::specials))
        .route("/search", get(handlers::search))
}

/// Build the axum Router with all endpoints and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api_routes())
        .fallback(response::not_found)
        .layer(CatchPanicLayer::custom(response::handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Binds the listener and serves until Ctrl+C or SIGTERM
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    let app = router(state);

    let address = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(address).await?;
    info!(
        %address,
        upstream = %config.base_url,
        cache_ttl_secs = ?config.cache_ttl.map(|ttl| ttl.num_seconds()),
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
