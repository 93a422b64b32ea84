//! Query dispatch for the paged listing provider.
//!
//! Each query re-enumerates the backing store before answering. There is no
//! cache and no snapshot across calls: a directory that changes between two
//! page requests may shift page boundaries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PageError, PageOutcome};
use crate::fs::enumerator::BackingStore;
use crate::provider::page::{PageRequest, PageResult, extract};

/// Kinds of request the provider answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// A page of the listing
    Files(PageRequest),

    /// Only the current number of entries
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryResponse {
    Page(PageResult),
    Count(usize),
}

impl QueryResponse {
    /// The page carried by this response, if it is one.
    #[must_use]
    pub fn into_page(self) -> Option<PageResult> {
        match self {
            Self::Page(page) => Some(page),
            Self::Count(_) => None,
        }
    }
}

/// Anything a paging client can pull pages from.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn query_page(&self, request: PageRequest) -> PageOutcome<PageResult>;
}

#[derive(Debug, Clone)]
pub struct PagingProvider {
    store: BackingStore,
}

impl PagingProvider {
    #[must_use]
    pub const fn new(store: BackingStore) -> Self {
        Self { store }
    }

    /// Builds the provider from config and seeds an empty store.
    pub async fn open(config: &Config) -> PageOutcome<Self> {
        let root = config.resolved_backing_dir()?;
        let store = BackingStore::new(root).with_hidden(config.show_hidden);

        let seeded = store.ensure_seeded(&config.seed).await?;
        info!(
            "Provider ready on {} ({} seed files written)",
            store.root().display(),
            seeded
        );

        Ok(Self::new(store))
    }

    #[must_use]
    pub const fn store(&self) -> &BackingStore {
        &self.store
    }

    pub async fn query(&self, query: Query) -> PageOutcome<QueryResponse> {
        let start_time = Instant::now();
        let entries = self.store.enumerate().await?;

        let response = match query {
            Query::Files(request) => QueryResponse::Page(extract(&entries, &request)?),
            Query::Count => QueryResponse::Count(entries.len()),
        };

        debug!(
            marker = "QUERY_COMPLETE",
            operation_type = "query",
            query = ?query,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Answered query"
        );

        Ok(response)
    }

    pub async fn count(&self) -> PageOutcome<usize> {
        match self.query(Query::Count).await? {
            QueryResponse::Count(n) => Ok(n),
            QueryResponse::Page(_) => Err(PageError::Other(
                "count query answered with a page".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PageSource for PagingProvider {
    async fn query_page(&self, request: PageRequest) -> PageOutcome<PageResult> {
        match self.query(Query::Files(request)).await? {
            QueryResponse::Page(page) => Ok(page),
            QueryResponse::Count(_) => Err(PageError::Other(
                "page query answered with a count".to_string(),
            )),
        }
    }
}
