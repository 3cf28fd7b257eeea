//! SerpAPI Client
//!
//! Runs a Google search through SerpAPI and pulls the AI Overview out of
//! the response.
//!
//! ## AI Overview retrieval
//!
//! 1. **Inline**: the `google` engine response already carries
//!    `ai_overview.text_blocks`. It is parsed as is.
//!    A `text_blocks` that is null or empty counts as no inline content.
//! 2. **Deferred**: the response only carries `ai_overview.page_token`. One
//!    follow-up request goes to the `google_ai_overview` engine with that
//!    token, and its `ai_overview` is parsed instead.
//!
//! Requests are never retried. The tool is one-shot and interactive, so a
//! failed request ends the run.

use async_trait::async_trait;
use serde_json::Value;
use serpapi_search_rust::serp_api_search::SerpApiSearch;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::overview::{extract_overview, OverviewBlock, AI_OVERVIEW};

/// Engine used to resolve a deferred AI Overview
const AI_OVERVIEW_ENGINE: &str = "google_ai_overview";

/// SerpAPI reports an empty result page as an error string
const NO_RESULTS_MESSAGE: &str = "hasn't returned any results";

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("SerpAPI key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("SerpAPI returned an error: {0}")]
    Api(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

/// Transport used by [`SerpApiClient`]
#[async_trait(?Send)]
pub trait SearchBackend {
    async fn search(
        &self,
        engine: &str,
        params: HashMap<String, String>,
    ) -> Result<Value, SearchError>;
}

/// Backend that talks to serpapi.com
pub struct SerpApiBackend {
    api_key: String,
}

impl SerpApiBackend {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait(?Send)]
impl SearchBackend for SerpApiBackend {
    async fn search(
        &self,
        engine: &str,
        params: HashMap<String, String>,
    ) -> Result<Value, SearchError> {
        let search = SerpApiSearch::new(engine.to_string(), params, self.api_key.clone());

        let results = search
            .json()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        if !results.is_object() {
            return Err(SearchError::ParseError(
                "Expected a JSON object".to_string(),
            ));
        }

        Ok(results)
    }
}

/// SerpAPI client for AI Overview lookups
pub struct SerpApiClient {
    backend: Box<dyn SearchBackend>,
    no_cache: bool,
    language: Option<String>,
    country: Option<String>,
}

impl SerpApiClient {
    /// Create a new SerpAPI client
    pub fn new(api_key: String) -> Self {
        Self::with_backend(Box::new(SerpApiBackend::new(api_key)))
    }

    /// Configure client from config
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        if config.serpapi_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        let mut client = Self::new(config.serpapi_key.clone()).with_no_cache(config.no_cache);
        client.language = config.language.clone();
        client.country = config.country.clone();
        Ok(client)
    }

    pub fn with_backend(backend: Box<dyn SearchBackend>) -> Self {
        Self {
            backend,
            no_cache: true,
            language: None,
            country: None,
        }
    }

    /// Bypass SerpAPI's result cache (on by default)
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Run a Google search, optionally pinned to a location
    pub async fn search_query(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Value, SearchError> {
        info!(query = %query, location = ?location, "Searching Google via SerpAPI");

        let mut params = self.base_params();
        params.insert("q".to_string(), query.to_string());
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            params.insert("location".to_string(), location.to_string());
        }
        if let Some(hl) = &self.language {
            params.insert("hl".to_string(), hl.clone());
        }
        if let Some(gl) = &self.country {
            params.insert("gl".to_string(), gl.clone());
        }

        let results = self.backend.search("google", params).await?;
        debug!("Raw Google response received");

        check_api_error(results)
    }

    /// Extract the AI Overview from a search response, following the page
    /// token when the overview was deferred.
    pub async fn fetch_overview(
        &self,
        response: &Value,
    ) -> Result<Option<OverviewBlock>, SearchError> {
        let Some(overview) = response.get(AI_OVERVIEW) else {
            info!("No AI Overview in search response");
            return Ok(None);
        };

        // A null or empty `text_blocks` means there is nothing inline
        if let Some(inline) = extract_overview(response).filter(|o| !o.text_blocks.is_empty()) {
            return Ok(Some(inline));
        }

        let Some(page_token) = overview.get("page_token").and_then(|v| v.as_str()) else {
            info!("AI Overview present without content or page token");
            return Ok(None);
        };

        info!("AI Overview deferred, following page token");

        let mut params = self.base_params();
        params.insert("page_token".to_string(), page_token.to_string());

        let results = self.backend.search(AI_OVERVIEW_ENGINE, params).await?;
        debug!("Raw AI Overview response received");

        let results = check_api_error(results)?;
        Ok(extract_overview(&results).filter(|o| !o.is_empty()))
    }

    fn base_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::<String, String>::new();
        if self.no_cache {
            params.insert("no_cache".to_string(), "true".to_string());
        }
        params
    }
}

/// Turn SerpAPI's in-band `error` field into a [`SearchError`]
fn check_api_error(results: Value) -> Result<Value, SearchError> {
    match results.get("error").and_then(|v| v.as_str()) {
        Some(message) if message.contains(NO_RESULTS_MESSAGE) => {
            debug!(message = %message, "Search returned no results");
            Ok(results)
        }
        Some(message) => Err(SearchError::Api(message.to_string())),
        None => Ok(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

    struct StubBackend {
        responses: Mutex<VecDeque<Result<Value, SearchError>>>,
        calls: Calls,
    }

    #[async_trait(?Send)]
    impl SearchBackend for StubBackend {
        async fn search(
            &self,
            engine: &str,
            params: HashMap<String, String>,
        ) -> Result<Value, SearchError> {
            self.calls.lock().unwrap().push((engine.to_string(), params));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SearchError::RequestFailed("no stubbed response".into())))
        }
    }

    fn stub_client(responses: Vec<Result<Value, SearchError>>) -> (SerpApiClient, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let backend = StubBackend {
            responses: Mutex::new(responses.into()),
            calls: calls.clone(),
        };
        (SerpApiClient::with_backend(Box::new(backend)), calls)
    }

    #[tokio::test]
    async fn test_search_query_params() {
        let (client, calls) = stub_client(vec![Ok(json!({ "organic_results": [] }))]);

        client.search_query("best anvils", Some("Austin, Texas")).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (engine, params) = &calls[0];
        assert_eq!(engine, "google");
        assert_eq!(params.get("q").map(String::as_str), Some("best anvils"));
        assert_eq!(params.get("location").map(String::as_str), Some("Austin, Texas"));
        assert_eq!(params.get("no_cache").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn test_search_query_without_location_or_cache_bypass() {
        let (client, calls) = stub_client(vec![Ok(json!({}))]);
        let client = client.with_no_cache(false);

        client.search_query("anvils", None).await.unwrap();

        let calls = calls.lock().unwrap();
        let (_, params) = &calls[0];
        assert!(!params.contains_key("location"));
        assert!(!params.contains_key("no_cache"));
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let (client, _) = stub_client(vec![Ok(json!({ "error": "Invalid API key." }))]);

        let err = client.search_query("anvils", None).await.unwrap_err();
        assert!(matches!(err, SearchError::Api(ref m) if m == "Invalid API key."));
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let (client, _) = stub_client(vec![Ok(json!({
            "error": "Google hasn't returned any results for this query."
        }))]);

        let results = client.search_query("zzzz", None).await.unwrap();
        assert!(client.fetch_overview(&results).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_request_failure_propagates() {
        let (client, _) = stub_client(vec![Err(SearchError::RequestFailed("timeout".into()))]);

        let err = client.search_query("anvils", None).await.unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_inline_overview() {
        let (client, calls) = stub_client(vec![]);
        let response = json!({
            "ai_overview": {
                "text_blocks": [{ "type": "heading", "snippet": "Acme" }],
                "references": []
            }
        });

        let overview = client.fetch_overview(&response).await.unwrap().unwrap();
        assert_eq!(overview.text_blocks.len(), 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_overview_follows_page_token() {
        let (client, calls) = stub_client(vec![Ok(json!({
            "ai_overview": {
                "text_blocks": [{ "type": "paragraph", "snippet": "Acme leads" }],
                "references": [{ "title": "Acme", "link": "https://acme.example" }]
            }
        }))]);
        let response = json!({ "ai_overview": { "page_token": "tok-123" } });

        let overview = client.fetch_overview(&response).await.unwrap().unwrap();
        assert_eq!(overview.references.len(), 1);

        let calls = calls.lock().unwrap();
        let (engine, params) = &calls[0];
        assert_eq!(engine, AI_OVERVIEW_ENGINE);
        assert_eq!(params.get("page_token").map(String::as_str), Some("tok-123"));
        assert!(!params.contains_key("q"));
    }

    #[tokio::test]
    async fn test_deferred_overview_missing_in_follow_up() {
        let (client, _) = stub_client(vec![Ok(json!({ "search_metadata": {} }))]);
        let response = json!({ "ai_overview": { "page_token": "tok-123" } });

        assert!(client.fetch_overview(&response).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_or_empty_text_blocks_is_no_overview() {
        let (client, calls) = stub_client(vec![]);

        for response in [
            json!({ "ai_overview": { "text_blocks": null } }),
            json!({ "ai_overview": { "text_blocks": [], "references": [] } }),
        ] {
            assert!(client.fetch_overview(&response).await.unwrap().is_none());
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_blocks_with_page_token_follows_token() {
        let (client, calls) = stub_client(vec![Ok(json!({
            "ai_overview": { "text_blocks": [{ "type": "heading", "snippet": "Acme" }] }
        }))]);
        let response = json!({ "ai_overview": { "text_blocks": [], "page_token": "tok-9" } });

        let overview = client.fetch_overview(&response).await.unwrap().unwrap();
        assert_eq!(overview.text_blocks.len(), 1);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_follow_up_overview_is_no_overview() {
        let (client, _) = stub_client(vec![Ok(json!({ "ai_overview": {} }))]);
        let response = json!({ "ai_overview": { "page_token": "tok-123" } });

        assert!(client.fetch_overview(&response).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_overview() {
        let (client, calls) = stub_client(vec![]);

        assert!(client.fetch_overview(&json!({ "organic_results": [] })).await.unwrap().is_none());
        assert!(client.fetch_overview(&json!({ "ai_overview": {} })).await.unwrap().is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = SearchConfig {
            serpapi_key: String::new(),
            no_cache: true,
            language: None,
            country: None,
        };
        assert!(matches!(SerpApiClient::from_config(&config), Err(SearchError::NoApiKey)));
    }

    #[test]
    fn test_from_config_carries_settings() {
        let config = SearchConfig {
            serpapi_key: "abc123".to_string(),
            no_cache: false,
            language: Some("en".to_string()),
            country: Some("us".to_string()),
        };
        let client = SerpApiClient::from_config(&config).unwrap();
        assert!(!client.no_cache);
        assert_eq!(client.language.as_deref(), Some("en"));
        assert_eq!(client.country.as_deref(), Some("us"));
    }
}
