//! PubMed detail (EFetch) client.

use crate::config::{PipelineConfig, TOOL_NAME};
use crate::error::{PubmedError, Result};
use reqwest::Client;
use tracing::info;

/// Build query parameters for an EFetch request covering all `ids`
pub fn build_fetch_params(ids: &[String]) -> Vec<(&'static str, String)> {
    vec![
        ("db", "pubmed".to_string()),
        ("id", ids.join(",")),
        ("retmode", "xml".to_string()),
        ("tool", TOOL_NAME.to_string()),
    ]
}

/// Fetch full records for `ids` in a single request and return the raw XML.
///
/// An empty ID list returns an empty string without touching the network.
pub async fn fetch_details(client: &Client, config: &PipelineConfig, ids: &[String]) -> Result<String> {
    if ids.is_empty() {
        return Ok(String::new());
    }

    info!(count = ids.len(), "Fetching PubMed records");

    let response = client
        .get(&config.efetch_url)
        .query(&build_fetch_params(ids))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PubmedError::Api {
            code: status.as_u16(),
            message: format!("EFetch error: {}", status),
        });
    }

    let xml = response.text().await?;
    info!(bytes = xml.len(), "EFetch complete");
    Ok(xml)
}
