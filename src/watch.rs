//! The watcher: "what hazardous objects are new since last time?"
//!
//! One call runs the whole pipeline sequentially:
//!
//! ```text
//! window ─▶ feed ─▶ select_hazardous ─▶ flatten ─▶ merge(store) ─▶ save
//! ```
//!
//! The window is validated before anything else happens, and the store is
//! only written once every earlier step has succeeded.

use crate::feed::{Feed, FeedError};
use crate::hazard::{self, ParseError};
use crate::merge::merge;
use crate::model::{FetchWindow, TrackedObject, WindowError};
use crate::storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Range(#[from] WindowError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl WatchError {
    /// The feed refused the request for quota reasons; try again later.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Feed(FeedError::RateLimited))
    }
}

/// Polls a feed for hazardous objects and remembers what it has reported.
pub struct Watcher<F> {
    feed: F,
    storage: Storage,
    body: String,
    first_offset: i32,
    offset: i32,
}

impl<F: Feed> Watcher<F> {
    pub fn new(
        feed: F,
        storage: Storage,
        body: impl Into<String>,
        first_offset: i32,
        offset: i32,
    ) -> Self {
        Self {
            feed,
            storage,
            body: body.into(),
            first_offset,
            offset,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Fetches with the first-run window.
    pub fn first_fetch(&self) -> Result<Vec<TrackedObject>, WatchError> {
        self.fetch_novel_hazards(self.first_offset)
    }

    /// Fetches with the regular polling window.
    pub fn fetch(&self) -> Result<Vec<TrackedObject>, WatchError> {
        self.fetch_novel_hazards(self.offset)
    }

    /// Returns hazardous objects never reported before, earliest approach
    /// first, and records them as reported.
    pub fn fetch_novel_hazards(&self, offset: i32) -> Result<Vec<TrackedObject>, WatchError> {
        let window = FetchWindow::new(offset)?;
        let span = window.span()?;

        tracing::info!(%span, days = window.days(), body = %self.body, "checking feed");
        let batch = self.feed.fetch(&span)?;

        let group = hazard::select_hazardous(batch.objects(), &self.body)?;
        let instants = group.len();
        let candidates = hazard::flatten(group);
        tracing::info!(
            count = candidates.len(),
            instants,
            "found potentially hazardous objects"
        );

        let previous = self.storage.load()?;
        let result = merge(previous, candidates);
        self.storage.save(&result.merged)?;

        tracing::info!(
            novel = result.novel.len(),
            observed = result.merged.len(),
            "updated observed set"
        );
        Ok(result.novel)
    }
}
