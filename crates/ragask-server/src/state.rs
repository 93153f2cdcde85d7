//! Shared application state.

use std::sync::Arc;

use ragask_chat::{AzureOpenAIClient, CompletionBackend};
use ragask_core::{ServerConfig, SettingsSource};
use ragask_search::{AzureSearchClient, SearchBackend};

/// Read-only state shared by all route handlers.
pub struct AppState {
    pub settings: SettingsSource,
    pub search: Arc<dyn SearchBackend>,
    pub completion: Arc<dyn CompletionBackend>,
}

impl AppState {
    pub fn new(
        settings: SettingsSource,
        search: Arc<dyn SearchBackend>,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            settings,
            search,
            completion,
        }
    }

    /// Production state: settings re-read from the environment per request,
    /// Azure clients sharing one connection pool.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::new(
            SettingsSource::Environment,
            Arc::new(AzureSearchClient::new(client.clone())),
            Arc::new(AzureOpenAIClient::new(client)),
        ))
    }
}

#[cfg(test)]
pub mod fakes {
    //! In-process stand-ins for the two remote services.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use ragask_chat::{ChatMessage, CompletionBackend, Deployment};
    use ragask_core::{config, Result, Settings, SettingsSource};
    use ragask_search::{SearchBackend, SearchIndex, SearchResult, SearchResults};

    use super::AppState;

    pub struct FakeSearch {
        reply: Result<Vec<SearchResult>>,
        pub calls: AtomicUsize,
        pub last_query: Mutex<Option<(String, usize)>>,
    }

    impl FakeSearch {
        pub fn returning(docs: Vec<SearchResult>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(docs),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            })
        }

        pub fn failing(err: ragask_core::Error) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchBackend for FakeSearch {
        async fn search(
            &self,
            _index: &SearchIndex,
            query_text: &str,
            top_n: usize,
        ) -> Result<SearchResults> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some((query_text.to_string(), top_n));
            // The real index honours `top`; so does the fake.
            self.reply
                .clone()
                .map(|docs| SearchResults::new(docs.into_iter().take(top_n).collect()))
        }
    }

    pub struct FakeCompletion {
        reply: Result<Option<String>>,
        pub calls: AtomicUsize,
        pub last_messages: Mutex<Vec<ChatMessage>>,
    }

    impl FakeCompletion {
        pub fn answering(text: &str) -> Arc<Self> {
            Self::with_reply(Ok(Some(text.to_string())))
        }

        pub fn with_reply(reply: Result<Option<String>>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for FakeCompletion {
        async fn complete(
            &self,
            _deployment: &Deployment,
            messages: Vec<ChatMessage>,
            _temperature: f64,
        ) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            self.reply.clone()
        }
    }

    pub fn settings() -> Settings {
        Settings {
            search_endpoint: "https://search.example.net".into(),
            search_index_name: "policies".into(),
            search_api_key: "search-key".into(),
            aoai_endpoint: "https://aoai.example.net".into(),
            aoai_api_key: "aoai-key".into(),
            aoai_deployment: "chat".into(),
        }
    }

    /// Every required variable except `missing`.
    pub fn vars_without(missing: &str) -> SettingsSource {
        let s = settings();
        let vars: HashMap<String, String> = [
            (config::SEARCH_ENDPOINT, s.search_endpoint),
            (config::SEARCH_INDEX_NAME, s.search_index_name),
            (config::SEARCH_API_KEY, s.search_api_key),
            (config::AOAI_ENDPOINT, s.aoai_endpoint),
            (config::AOAI_API_KEY, s.aoai_api_key),
            (config::AOAI_DEPLOYMENT, s.aoai_deployment),
        ]
        .into_iter()
        .filter(|(k, _)| *k != missing)
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        SettingsSource::Vars(vars)
    }

    pub fn state(
        settings: SettingsSource,
        search: Arc<FakeSearch>,
        completion: Arc<FakeCompletion>,
    ) -> Arc<AppState> {
        Arc::new(AppState::new(settings, search, completion))
    }
}
