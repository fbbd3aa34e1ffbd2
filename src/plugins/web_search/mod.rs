//! Web search enrichment for questions about current events.

mod plugin;
mod search;

pub use plugin::{WEB_SEARCH_PLUGIN_ID, WebSearchPlugin};
#[cfg(test)]
pub use search::MockSearchProvider;
pub use search::{SearchError, SearchProvider, SearchResult, StaticSearchProvider};
