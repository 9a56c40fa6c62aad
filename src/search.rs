//! PubMed search (ESearch) client.
//!
//! Submits the user's query and returns the matching PubMed IDs, capped at
//! `PipelineConfig::max_results`.

use crate::config::{PipelineConfig, TOOL_NAME};
use crate::error::{PubmedError, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    #[serde(default)]
    esearchresult: ESearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Build query parameters for an ESearch request
pub fn build_search_params(query: &str, max_results: usize) -> Vec<(&'static str, String)> {
    vec![
        ("db", "pubmed".to_string()),
        ("term", query.to_string()),
        ("retmax", max_results.to_string()),
        ("retmode", "json".to_string()),
        ("tool", TOOL_NAME.to_string()),
    ]
}

/// Search PubMed and return the ordered list of matching IDs.
///
/// # Errors
///
/// Returns error if the query is blank, the request fails, the endpoint
/// answers with a non-success status, or the JSON body cannot be decoded.
pub async fn search_ids(client: &Client, config: &PipelineConfig, query: &str) -> Result<Vec<String>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(PubmedError::Validation("search query is empty".to_string()));
    }

    info!(query = query, max_results = config.max_results, "Searching PubMed");

    let response = client
        .get(&config.esearch_url)
        .query(&build_search_params(query, config.max_results))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PubmedError::Api {
            code: status.as_u16(),
            message: format!("ESearch error: {}", status),
        });
    }

    let data: ESearchResponse = response.json().await?;
    let mut ids = data.esearchresult.idlist;
    ids.truncate(config.max_results);

    debug!(ids = ?ids, "ESearch returned IDs");
    Ok(ids)
}
