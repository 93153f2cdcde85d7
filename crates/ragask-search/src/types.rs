//! Search gateway types.

use ragask_core::Settings;
use serde::{Deserialize, Serialize};

/// Number of documents requested per question.
pub const DEFAULT_TOP_N: usize = 5;

/// Connection parameters for one search index.
#[derive(Clone)]
pub struct SearchIndex {
    pub endpoint: String,
    pub index_name: String,
    pub api_key: String,
}

impl SearchIndex {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.search_endpoint.clone(),
            index_name: settings.search_index_name.clone(),
            api_key: settings.search_api_key.clone(),
        }
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("endpoint", &self.endpoint)
            .field("index_name", &self.index_name)
            .finish_non_exhaustive()
    }
}

/// A single document returned by the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source_uri: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "@search.score")]
    pub score: Option<f64>,
}

/// Documents in the order the index ranked them. Can be walked only once.
#[derive(Debug)]
pub struct SearchResults {
    inner: std::vec::IntoIter<SearchResult>,
}

impl SearchResults {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            inner: results.into_iter(),
        }
    }
}

impl Iterator for SearchResults {
    type Item = SearchResult;

    fn next(&mut self) -> Option<SearchResult> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SearchResults {}

/// Wire shape of the index's query response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub value: Vec<SearchResult>,
}
