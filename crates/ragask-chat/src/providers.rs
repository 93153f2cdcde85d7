//! Hosted chat-completion providers.
//!
//! Only Azure OpenAI is wired up. The request is a single blocking
//! completion; nothing is streamed.

use async_trait::async_trait;
use ragask_core::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::types::{ChatMessage, Deployment};

/// Azure OpenAI REST API version.
pub const API_VERSION: &str = "2024-02-15-preview";

/// A remote model that turns a message list into one reply.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the reply text, or `None` when the model produced no content.
    async fn complete(
        &self,
        deployment: &Deployment,
        messages: Vec<ChatMessage>,
        temperature: f64,
    ) -> Result<Option<String>>;
}

/// Chat completions against an Azure OpenAI deployment.
#[derive(Debug, Clone, Default)]
pub struct AzureOpenAIClient {
    client: Client,
}

impl AzureOpenAIClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn chat_url(deployment: &Deployment) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            deployment.endpoint.trim_end_matches('/'),
            deployment.name
        )
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionBackend for AzureOpenAIClient {
    async fn complete(
        &self,
        deployment: &Deployment,
        messages: Vec<ChatMessage>,
        temperature: f64,
    ) -> Result<Option<String>> {
        let url = Self::chat_url(deployment);
        let body = json!({
            "messages": messages,
            "temperature": temperature,
        });

        debug!("Requesting completion from deployment {}", deployment.name);

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", API_VERSION)])
            .header("api-key", &deployment.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Completion request to {} failed: {}", url, e);
                Error::GenerationFailed(format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, body);
            return Err(Error::GenerationFailed(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to decode completion response: {}", e);
            Error::GenerationFailed(format!("invalid response: {}", e))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::GenerationFailed("response contained no choices".into()))?;

        Ok(choice.message.and_then(|m| m.content))
    }
}
