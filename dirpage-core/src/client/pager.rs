//! src/client/pager.rs
//! ============================================================================
//! # `PagingClient`: scroll-driven incremental loading
//!
//! Accumulates a listing page by page. Fetching needs `&mut self`, so at
//! most one query per client is ever in flight. A client found in
//! `Fetching` at the start of a call had its previous fetch dropped before
//! completion (timeout, `select!`), and is treated as `Idle`. Once the end
//! of the listing has been seen the client stays `Exhausted` until `show`
//! restarts it.

use std::fmt;
use tracing::{debug, warn};

use crate::error::PageOutcome;
use crate::fs::entry::Entry;
use crate::provider::page::PageRequest;
use crate::provider::query::PageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientState {
    #[default]
    Idle,

    Fetching,

    /// The last fetch reached the end of the listing.
    Exhausted,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Fetching => write!(f, "Fetching"),
            Self::Exhausted => write!(f, "Exhausted"),
        }
    }
}

pub struct PagingClient<S: PageSource> {
    source: S,
    page_size: usize,
    items: Vec<Entry>,
    total_count: Option<usize>,
    state: ClientState,
}

impl<S: PageSource> PagingClient<S> {
    /// `page_size` of 0 is bumped to 1 so every fetch can make progress.
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            items: Vec::new(),
            total_count: None,
            state: ClientState::Idle,
        }
    }

    /// Explicit user trigger: drops everything fetched so far and loads
    /// the first page again.
    pub async fn show(&mut self) -> PageOutcome<usize> {
        self.items.clear();
        self.total_count = None;
        self.state = ClientState::Idle;

        self.fetch_next().await
    }

    /// Scroll observation. Fetches the next page when the last accumulated
    /// item is on screen; returns how many entries were appended.
    pub async fn on_scroll(&mut self, last_visible_index: usize) -> PageOutcome<usize> {
        if self.state == ClientState::Exhausted {
            return Ok(0);
        }

        if last_visible_index.saturating_add(1) < self.items.len() {
            return Ok(0);
        }

        self.fetch_next().await
    }

    /// Requests the page that starts after the accumulated items.
    ///
    /// On error the accumulator is left as it was and the client returns to
    /// `Idle`; nothing is retried.
    pub async fn fetch_next(&mut self) -> PageOutcome<usize> {
        match self.state {
            ClientState::Exhausted => return Ok(0),
            ClientState::Fetching => debug!("Previous fetch was dropped, starting over"),
            ClientState::Idle => {}
        }

        let offset = self.items.len();
        let request = PageRequest::new(to_i64(offset), to_i64(self.page_size));

        self.state = ClientState::Fetching;
        let page = match self.source.query_page(request).await {
            Ok(page) => page,

            Err(e) => {
                warn!(offset, page_size = self.page_size, "Page fetch failed: {}", e);
                self.state = ClientState::Idle;
                return Err(e);
            }
        };

        let fetched = page.len();
        self.items.extend(page.entries);
        self.total_count = Some(page.total_count);

        self.state = if fetched == 0 || self.items.len() >= page.total_count {
            ClientState::Exhausted
        } else {
            ClientState::Idle
        };

        debug!(
            marker = "PAGE_FETCHED",
            operation_type = "fetch_next",
            offset,
            fetched,
            total_count = page.total_count,
            state = %self.state,
            "Fetched page"
        );

        Ok(fetched)
    }

    #[must_use]
    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn state(&self) -> ClientState {
        self.state
    }

    /// Total reported by the most recent successful fetch.
    #[must_use]
    pub const fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
