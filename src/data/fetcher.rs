//! HTTP client for the restaurant website
//!
//! Issues plain GET requests against the configured base origin and hands back
//! the raw HTML body. Caller supplied ids are appended as percent-encoded path
//! segments, so an id can never reach outside its own segment.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default upstream origin
pub const DEFAULT_BASE_URL: &str = "https://cloudwebv2.dev.loomishub.com/";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; menu-proxy/0.1)";

/// Upper bound for a single upstream request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The website answered with a non-2xx status
    #[error("Request to {url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The base origin cannot take path segments (e.g. `mailto:`)
    #[error("Cannot build a page URL from base {url}")]
    InvalidUrl { url: String },

    /// A `.` or `..` segment, which URL normalisation would drop
    #[error("Invalid path segment '{segment}' below {url}")]
    InvalidSegment { url: String, segment: String },
}

impl FetchError {
    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::InvalidUrl { url }
            | FetchError::InvalidSegment { url, .. } => url,
        }
    }
}

/// Client for fetching raw pages from the restaurant website
#[derive(Debug, Clone)]
pub struct SiteClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Origin every page path is appended to
    base_url: Url,
}

impl SiteClient {
    /// Creates a client for the given base origin
    pub fn new(base_url: Url) -> Self {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self::with_client(http_client, base_url)
    }

    /// Creates a client around an existing reqwest client
    pub fn with_client(http_client: Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Builds the page URL for the given path segments
    ///
    /// Each segment is percent-encoded, `/`, `?` and `#` included. Dot
    /// segments are rejected since they cannot be sent as a literal segment.
    pub fn page_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(FetchError::InvalidSegment {
                url: self.base_url.to_string(),
                segment: segment.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        if segments.is_empty() {
            return Ok(url);
        }

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Fetches the page at `segments` below the base origin
    ///
    /// # Returns
    /// * `Ok(String)` - The response body, unmodified
    /// * `Err(FetchError)` - On transport failure or a non-2xx status
    pub async fn fetch(&self, segments: &[&str]) -> Result<String, FetchError> {
        let url = self.page_url(segments)?;
        debug!(%url, "Fetching upstream page");

        let result = self.get_text(&url).await;
        if let Err(ref e) = result {
            warn!(error = %e, "Upstream fetch failed");
        }
        result
    }

    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(request_error)
    }
}
