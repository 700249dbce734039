//! Client for the search/index backend.
//!
//! The backend accepts raw page text on `POST /index` and answers ranked
//! snippets on `POST /search`. Nothing here retries: a failure goes straight to
//! the caller, which reports it on the status line.
//!
//! # Usage
//!
//! ```rust,no_run
//! use snipmark_core::client::BackendClient;
//! use snipmark_core::config::BackendConfig;
//!
//! #[tokio::main]
//! async fn main() -> snipmark_core::Result<()> {
//!     let client = BackendClient::new(&BackendConfig::default())?;
//!     let hits = client.search("water mill").await?;
//!     println!("{} results", hits.len());
//!     Ok(())
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::types::{IndexRequest, IndexResponse, SearchHit, SearchRequest, SearchResponse};

/// HTTP client for the search/index backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL, without trailing slash
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Self::with_timeout(&config.url, config.timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Ranked snippets for `query`. A blank query never reaches the backend.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let req = SearchRequest {
            query: query.to_string(),
        };
        let resp: SearchResponse = self.post("/search", &req).await?;
        Ok(resp.results)
    }

    /// Submit a captured page for indexing.
    pub async fn index(&self, req: &IndexRequest) -> Result<IndexResponse> {
        self.post("/index", req).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Backend request: POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::backend(status.as_u16(), body))
        }
    }
}
