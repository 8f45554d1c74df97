use std::fmt;

use async_trait::async_trait;

use super::types::Vehicle;

/// Errors that can occur while fetching a page.
/// Every variant ends up as a fetch failure in the coordinator; none are retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Source misconfigured (missing base URL, bad table name).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The fetch did not resolve within the configured bound.
    Timeout { secs: u64 },
    /// Backend returned an error response.
    Api { status: u16, message: String },
    /// Response body could not be decoded or broke the page contract.
    Parse(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Config(msg) => write!(f, "config error: {msg}"),
            SourceError::Network(msg) => write!(f, "network error: {msg}"),
            SourceError::Timeout { secs } => write!(f, "fetch timed out after {secs}s"),
            SourceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SourceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// One page fetch, tagged with the search generation it was issued for.
///
/// `generation` and `page_index` never reach the source; they ride along so the
/// coordinator can tell whether the response still matters when it comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page_index: usize,
    pub search_term: String,
    pub offset: usize,
    pub limit: usize,
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the name of the source.
    fn name(&self) -> &str;

    /// Returns up to `limit` vehicles matching `search_term`, starting at `offset`.
    ///
    /// Ordering must be stable across pages for the same term.
    async fn fetch_page(
        &self,
        search_term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Vehicle>, SourceError>;
}
