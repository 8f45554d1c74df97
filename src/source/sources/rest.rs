//! Page source backed by a PostgREST-compatible endpoint (the hosted
//! backend-as-a-service the dashboard uses for its tables).
//!
//! A page is one `GET {base}/rest/v1/{table}` with:
//! - `select` limited to the display columns
//! - `order=created_at.desc` so pages stay stable for a given term
//! - `offset` / `limit` for the window
//! - an `or=(...)` of `ilike` filters across the display columns when a term is set

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::source::{PageSource, SourceError, Vehicle};

const SELECT_COLUMNS: &str = "id_unico,name,model,license_plate";
const SEARCH_COLUMNS: [&str; 4] = ["id_unico", "name", "model", "license_plate"];

/// Builds the PostgREST `or` filter for a search term.
///
/// Values are double-quoted so commas, dots and parentheses in the term can't
/// break out of the filter list.
fn search_filter(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    let clauses: Vec<String> = SEARCH_COLUMNS
        .iter()
        .map(|column| format!("{column}.ilike.\"*{escaped}*\""))
        .collect();
    format!("({})", clauses.join(","))
}

/// Error body PostgREST sends with non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    hint: Option<String>,
}

/// Prefers PostgREST's `message` (plus hint) over the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message,
            hint: Some(hint),
        }) => format!("{message} ({hint})"),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) => body.to_string(),
    }
}

pub struct RestPageSource {
    base_url: String,
    api_key: Option<String>,
    table: String,
    client: reqwest::Client,
}

impl RestPageSource {
    pub fn new(base_url: String, api_key: Option<String>, table: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl PageSource for RestPageSource {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_page(
        &self,
        search_term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Vehicle>, SourceError> {
        if self.table.is_empty() {
            return Err(SourceError::Config("table name is empty".to_string()));
        }

        let mut query: Vec<(&str, String)> = vec![
            ("select", SELECT_COLUMNS.to_string()),
            ("order", "created_at.desc".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        let term = search_term.trim();
        if !term.is_empty() {
            query.push(("or", search_filter(term)));
        }

        info!(
            "REST page request: table={}, offset={}, limit={}, term={:?}",
            self.table, offset, limit, term
        );

        let mut request = self.client.get(self.endpoint()).query(&query);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        debug!("REST response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("REST API error: {} - {}", status, err_body);
            return Err(SourceError::Api {
                status,
                message: error_message(&err_body),
            });
        }

        let rows: Vec<Vehicle> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if rows.len() > limit {
            warn!("REST source returned {} rows for limit {}", rows.len(), limit);
            return Err(SourceError::Parse(format!(
                "expected at most {limit} rows, got {}",
                rows.len()
            )));
        }

        debug!("REST page returned {} rows", rows.len());
        Ok(rows)
    }
}
