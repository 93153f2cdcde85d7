//! Azure AI Search REST client.

use async_trait::async_trait;
use ragask_core::{Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use crate::types::{SearchIndex, SearchResponse, SearchResults};

/// REST API version sent with every query.
pub const API_VERSION: &str = "2023-11-01";

/// Anything that can answer a full-text query against an index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one query bounded to `top_n` documents.
    async fn search(&self, index: &SearchIndex, query_text: &str, top_n: usize)
        -> Result<SearchResults>;
}

/// Queries the `docs/search` endpoint of an Azure AI Search service.
#[derive(Debug, Clone, Default)]
pub struct AzureSearchClient {
    client: Client,
}

impl AzureSearchClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn search_url(index: &SearchIndex) -> String {
        format!(
            "{}/indexes/{}/docs/search",
            index.endpoint.trim_end_matches('/'),
            index.index_name
        )
    }
}

#[async_trait]
impl SearchBackend for AzureSearchClient {
    async fn search(
        &self,
        index: &SearchIndex,
        query_text: &str,
        top_n: usize,
    ) -> Result<SearchResults> {
        let url = Self::search_url(index);
        debug!("Querying index {} (top={})", index.index_name, top_n);

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", API_VERSION)])
            .header("api-key", &index.api_key)
            .json(&json!({
                "search": query_text,
                "top": top_n,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Search request to {} failed: {}", url, e);
                Error::SearchUnavailable(format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Search API error {}: {}", status, body);
            return Err(Error::SearchUnavailable(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            error!("Failed to decode search response: {}", e);
            Error::SearchUnavailable(format!("invalid response: {}", e))
        })?;

        debug!("Index {} returned {} documents", index.index_name, parsed.value.len());
        Ok(SearchResults::new(parsed.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn index_at(endpoint: String) -> SearchIndex {
        SearchIndex {
            endpoint,
            index_name: "policies".into(),
            api_key: "search-key".into(),
        }
    }

    #[tokio::test]
    async fn test_search_sends_query_and_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/indexes/policies/docs/search")
            .match_query(Matcher::UrlEncoded("api-version".into(), API_VERSION.into()))
            .match_header("api-key", "search-key")
            .match_body(Matcher::Json(json!({
                "search": "What is the refund policy?",
                "top": 5,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "value": [
                    {"@search.score": 2.1, "id": "1", "source_uri": "kb://refunds", "content": "Refunds within 30 days..."},
                    {"@search.score": 1.4, "id": "2", "source_uri": "kb://terms", "content": "No refunds after 30 days..."}
                ]
            }"#,
            )
            .create_async()
            .await;

        let client = AzureSearchClient::default();
        let results = client
            .search(&index_at(server.url()), "What is the refund policy?", 5)
            .await
            .unwrap();

        let docs: Vec<_> = results.collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_deref(), Some("1"));
        assert_eq!(docs[1].content.as_deref(), Some("No refunds after 30 days..."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trailing_slash_on_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/indexes/policies/docs/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create_async()
            .await;

        let client = AzureSearchClient::default();
        let results = client
            .search(&index_at(format!("{}/", server.url())), "anything", 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure_is_search_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/indexes/policies/docs/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"message": "Forbidden"}}"#)
            .create_async()
            .await;

        let client = AzureSearchClient::default();
        let err = client
            .search(&index_at(server.url()), "q", 5)
            .await
            .unwrap_err();

        match err {
            Error::SearchUnavailable(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("Forbidden"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_search_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/indexes/policies/docs/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = AzureSearchClient::default();
        let err = client
            .search(&index_at(server.url()), "q", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SearchUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_search_unavailable() {
        let client = AzureSearchClient::default();
        let err = client
            .search(&index_at("http://127.0.0.1:1".into()), "q", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SearchUnavailable(_)));
    }
}
