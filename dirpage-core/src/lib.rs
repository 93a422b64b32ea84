pub mod error;

pub mod config;

pub mod logging;

pub mod fs {
    pub mod digest;

    pub mod entry;
    pub use entry::Entry;

    pub mod enumerator;
    pub use enumerator::BackingStore;
}

pub mod provider {
    pub mod page;
    pub use page::{HonoredArgs, PageRequest, PageResult, QueryArg, extract};

    pub mod query;
    pub use query::{PageSource, PagingProvider, Query, QueryResponse};
}

pub mod client {
    pub mod pager;
    pub use pager::{ClientState, PagingClient};
}

pub use config::Config;
pub use error::{PageError, PageOutcome};
pub use fs::{BackingStore, Entry};
pub use provider::{PageRequest, PageResult, PagingProvider};
pub use client::PagingClient;
