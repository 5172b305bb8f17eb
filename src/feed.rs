//! The upstream feed: NASA's Near Earth Object Web Service.
//!
//! [`Feed`] is the seam the watcher depends on. [`NeoWsFeed`] implements it
//! over HTTP with a blocking client; response classification lives in
//! [`interpret`] so it can be exercised without a network.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Credentials;
use crate::model::{DateSpan, TrackedObject};

/// Marker the feed puts in the body when the key's quota is spent.
const RATE_LIMIT_MARKER: &str = "OVER_RATE_LIMIT";

const FEED_PATH: &str = "/neo/rest/v1/feed";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limit reached; wait or use a proper key instead of the demo one")]
    RateLimited,

    #[error("feed returned error status: {0}")]
    Status(StatusCode),

    #[error("invalid feed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One decoded feed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedBatch {
    #[serde(default)]
    pub element_count: usize,

    /// Objects keyed by `YYYY-MM-DD`. Ordered so that batch order is stable.
    #[serde(default)]
    pub near_earth_objects: BTreeMap<String, Vec<TrackedObject>>,
}

impl FeedBatch {
    /// All objects, day by day in ascending date order.
    pub fn objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.near_earth_objects.values().flatten()
    }
}

/// Something that can produce a batch of objects for a date span.
pub trait Feed {
    fn fetch(&self, span: &DateSpan) -> Result<FeedBatch, FeedError>;
}

/// HTTP client for the NeoWs `feed` endpoint.
pub struct NeoWsFeed {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl std::fmt::Debug for NeoWsFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeoWsFeed")
            .field("base_url", &self.base_url)
            .field("demo_key", &self.credentials.is_demo())
            .finish_non_exhaustive()
    }
}

impl NeoWsFeed {
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }
}

impl Feed for NeoWsFeed {
    fn fetch(&self, span: &DateSpan) -> Result<FeedBatch, FeedError> {
        let url = format!("{}{FEED_PATH}", self.base_url);
        let start = span.start.to_string();
        let end = span.end.to_string();

        tracing::debug!(%url, %start, %end, "requesting feed");

        let response = self
            .http
            .get(url)
            .query(&[
                ("api_key", self.credentials.api_key()),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ])
            .send()?;
        let status = response.status();
        let body = response.text()?;

        let batch = interpret(status, &body)?;
        tracing::debug!(elements = batch.element_count, "feed answered");
        Ok(batch)
    }
}

/// Classifies a raw feed response.
///
/// Rate limiting is reported distinctly, whether signalled by status or by
/// the marker in the body.
pub fn interpret(status: StatusCode, body: &str) -> Result<FeedBatch, FeedError> {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains(RATE_LIMIT_MARKER) {
        return Err(FeedError::RateLimited);
    }
    if !status.is_success() {
        return Err(FeedError::Status(status));
    }
    Ok(serde_json::from_str(body)?)
}
