//! Shared types for snipmark-core.
//!
//! Covers the message contract between the result-rendering layer and the
//! orchestrator, and the request/response shapes of the search/index backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Identity Types
// ─────────────────────────────────────────────────────────────────────────────

/// Address of a content surface (a page URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetAddress(String);

impl TargetAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TargetAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Host-assigned identity of an opened content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Correlation id carried by a relocation request through the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relocation Types
// ─────────────────────────────────────────────────────────────────────────────

/// How much of the page gets emphasised once a phrase matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightScope {
    /// Wrap exactly the matched text in a mark.
    #[default]
    ExactSpan,
    /// Style the nearest block-level ancestor of the match.
    ContainingBlock,
}

impl fmt::Display for HighlightScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightScope::ExactSpan => f.write_str("exact_span"),
            HighlightScope::ContainingBlock => f.write_str("containing_block"),
        }
    }
}

/// One user request to re-find a snippet on a target page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRequest {
    pub id: RequestId,
    pub target: TargetAddress,
    pub snippet_text: String,
}

impl RelocationRequest {
    pub fn new(target: impl Into<TargetAddress>, snippet_text: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            target: target.into(),
            snippet_text: snippet_text.into(),
        }
    }
}

/// Arguments passed into a surface when the relocator is injected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Injection {
    pub snippet_text: String,
    pub scope: HighlightScope,
}

// ─────────────────────────────────────────────────────────────────────────────
// Message Contract
// ─────────────────────────────────────────────────────────────────────────────

/// Messages the result-rendering layer sends to the orchestrator.
///
/// The older `open_and_highlight` form with `url`/`snippet` fields is accepted
/// too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    #[serde(alias = "open_and_highlight")]
    Relocate {
        #[serde(rename = "targetId", alias = "url")]
        target_id: String,
        #[serde(rename = "snippetText", alias = "snippet")]
        snippet_text: String,
    },
}

impl From<Message> for RelocationRequest {
    fn from(message: Message) -> Self {
        match message {
            Message::Relocate {
                target_id,
                snippet_text,
            } => RelocationRequest::new(target_id, snippet_text),
        }
    }
}

/// Synchronous acknowledgement of a message. Says nothing about relocation
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn received() -> Self {
        Self { success: true }
    }

    pub fn rejected() -> Self {
        Self { success: false }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Boundary Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
}

impl SearchHit {
    /// The relocation request a click on this result produces.
    pub fn relocation_request(&self) -> RelocationRequest {
        RelocationRequest::new(self.url.as_str(), self.snippet.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    pub text: String,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "chunk")]
    pub chunks: u64,
}

impl IndexResponse {
    /// The backend refuses to index a URL twice and says so in `status`.
    pub fn is_already_indexed(&self) -> bool {
        self.status.as_deref() == Some("already indexed")
    }
}

/// Text, address and title read out of a page by the extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCapture {
    pub text: String,
    pub url: String,
    pub title: String,
}

impl From<PageCapture> for IndexRequest {
    fn from(page: PageCapture) -> Self {
        IndexRequest {
            text: page.text,
            url: page.url,
            title: page.title,
        }
    }
}
