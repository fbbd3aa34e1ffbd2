//! Search results and the provider port.

use crate::conversation::domain::PluginValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title.
    pub title: String,
    /// Page address.
    pub url: String,
    /// Short excerpt.
    pub snippet: String,
    /// Publishing site.
    pub source: String,
}

impl SearchResult {
    /// Creates a search result.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source: source.into(),
        }
    }

    /// Converts the result into a plugin value map.
    #[must_use]
    pub fn to_value(&self) -> PluginValue {
        PluginValue::from(BTreeMap::from([
            ("title".to_owned(), PluginValue::from(self.title.as_str())),
            ("url".to_owned(), PluginValue::from(self.url.as_str())),
            ("snippet".to_owned(), PluginValue::from(self.snippet.as_str())),
            ("source".to_owned(), PluginValue::from(self.source.as_str())),
        ]))
    }
}

/// Errors reported by a search provider.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The provider could not be reached or refused the query.
    #[error("search provider unavailable: {0}")]
    Unavailable(String),

    /// Provider-specific failure.
    #[error("search failed: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl SearchError {
    /// Wraps a provider error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}

/// Port for running web searches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `limit` results for `query`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Provider answering every query with a fixed result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSearchProvider {
    results: Vec<SearchResult>,
}

impl StaticSearchProvider {
    /// Creates a provider returning `results`.
    #[must_use]
    pub const fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

impl Default for StaticSearchProvider {
    fn default() -> Self {
        Self::new(vec![
            SearchResult::new(
                "Example Result 1",
                "https://example.com/1",
                "This is a sample search result snippet...",
                "example.com",
            ),
            SearchResult::new(
                "Example Result 2",
                "https://example.com/2",
                "Another example of search results...",
                "example.com",
            ),
        ])
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}
