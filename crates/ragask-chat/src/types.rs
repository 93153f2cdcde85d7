//! Chat and citation types.

use ragask_core::Settings;
use ragask_search::SearchResult;
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept from each document.
pub const PREVIEW_CHARS: usize = 300;

/// Chat message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Citation entry: a retrieved document cut down to a short preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: Option<String>,
    pub source_uri: Option<String>,
    pub content_preview: String,
}

impl SourceSummary {
    pub fn from_result(result: &SearchResult) -> Self {
        Self::from(result.clone())
    }
}

impl From<SearchResult> for SourceSummary {
    fn from(result: SearchResult) -> Self {
        Self {
            content_preview: preview(result.content.as_deref().unwrap_or("")),
            id: result.id,
            source_uri: result.source_uri,
        }
    }
}

/// First [`PREVIEW_CHARS`] characters, never splitting a code point.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// Model deployment the completion is sent to.
#[derive(Clone)]
pub struct Deployment {
    pub endpoint: String,
    pub name: String,
    pub api_key: String,
}

impl Deployment {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.aoai_endpoint.clone(),
            name: settings.aoai_deployment.clone(),
            api_key: settings.aoai_api_key.clone(),
        }
    }
}

impl std::fmt::Debug for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("endpoint", &self.endpoint)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
