//! End-to-end pipeline: search → fetch → parse/filter → export.
//!
//! Each stage's error is logged and replaced by an empty result, so a run
//! always completes.

use crate::config::{PipelineConfig, TOOL_NAME};
use crate::error::Result;
use crate::export::{self, ExportOutcome};
use crate::parser::{self, Record};
use crate::{fetch, search};
use reqwest::Client;
use std::path::Path;
use tracing::{error, info};

/// Build the HTTP client shared by both E-utilities requests
pub fn build_http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(format!("{}/{}", TOOL_NAME, env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Run search, fetch and parse; return records with company affiliations.
pub async fn collect_records(client: &Client, config: &PipelineConfig, query: &str) -> Vec<Record> {
    let ids = match search::search_ids(client, config, query).await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "PubMed search failed");
            return Vec::new();
        }
    };

    if ids.is_empty() {
        info!(query = query, "No results found");
        return Vec::new();
    }

    info!(count = ids.len(), "Found PubMed IDs");

    let xml = match fetch::fetch_details(client, config, &ids).await {
        Ok(xml) => xml,
        Err(e) => {
            error!(error = %e, "PubMed fetch failed");
            return Vec::new();
        }
    };

    match parser::parse_records(&xml, &config.keywords) {
        Ok(records) => {
            info!(
                fetched = ids.len(),
                matched = records.len(),
                "Filtered records by company affiliation"
            );
            records
        }
        Err(e) => {
            error!(error = %e, "Failed to parse PubMed records");
            Vec::new()
        }
    }
}

/// Run the whole pipeline and export the result.
///
/// Returns the matched records, even when exporting them failed. Export
/// failures are logged, not returned.
pub async fn run(config: &PipelineConfig, query: &str, output: Option<&Path>) -> Vec<Record> {
    match build_http_client() {
        Ok(client) => run_with_client(&client, config, query, output).await,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            Vec::new()
        }
    }
}

/// Same as [`run`], with a caller-supplied client
pub async fn run_with_client(
    client: &Client,
    config: &PipelineConfig,
    query: &str,
    output: Option<&Path>,
) -> Vec<Record> {
    let records = collect_records(client, config, query).await;

    match export::export(&records, output) {
        Ok(ExportOutcome::Written { path, count }) => {
            info!(path = %path.display(), count = count, "Export complete");
        }
        Ok(ExportOutcome::Printed { count }) => info!(count = count, "Printed records"),
        Ok(ExportOutcome::Empty) => {}
        Err(e) => error!(error = %e, "Export failed"),
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PubmedError;
    use crate::parser::tests::SCENARIO_XML;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Status and body returned by the local responder
    struct Canned {
        status: u16,
        body: String,
    }

    impl Canned {
        fn ok(body: &str) -> Self {
            Self {
                status: 200,
                body: body.to_string(),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                status,
                body: String::new(),
            }
        }
    }

    fn reason(status: u16) -> &'static str {
        match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Serve canned E-utilities responses on a random local port.
    ///
    /// Requests whose path contains `esearch` get `search`, everything else
    /// gets `fetch`.
    async fn spawn_eutils(search: Canned, fetch: Canned) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let (content_type, canned) = if request.contains("esearch") {
                    ("application/json", &search)
                } else {
                    ("text/xml", &fetch)
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    reason(canned.status),
                    content_type,
                    canned.body.len(),
                    canned.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn local_config(base: &str) -> PipelineConfig {
        PipelineConfig {
            esearch_url: format!("{}/esearch.fcgi", base),
            efetch_url: format!("{}/efetch.fcgi", base),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_scenario_writes_only_company_record() {
        let base = spawn_eutils(
            Canned::ok(r#"{"esearchresult": {"idlist": ["1", "2"]}}"#),
            Canned::ok(SCENARIO_XML),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let records = run_with_client(
            &local_client(),
            &local_config(&base),
            "cancer immunotherapy",
            Some(&path),
        )
        .await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][4], "Acme Pharma Inc.");
    }

    #[tokio::test]
    async fn test_no_ids_means_no_file() {
        let base = spawn_eutils(
            Canned::ok(r#"{"esearchresult": {"idlist": []}}"#),
            Canned::ok(SCENARIO_XML),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let records = run_with_client(
            &local_client(),
            &local_config(&base),
            "nothing matches",
            Some(&path),
        )
        .await;
        assert!(records.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_bad_fetch_body_degrades_to_empty() {
        let base = spawn_eutils(
            Canned::ok(r#"{"esearchresult": {"idlist": ["1"]}}"#),
            Canned::ok("<PubmedArticleSet><PubmedArticle>"),
        )
        .await;

        let records = collect_records(&local_client(), &local_config(&base), "query").await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let records = run_with_client(
            &local_client(),
            &local_config("http://127.0.0.1:9"),
            "query",
            Some(&path),
        )
        .await;
        assert!(records.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_search_server_error_is_api_error() {
        let base = spawn_eutils(Canned::status(500), Canned::ok(SCENARIO_XML)).await;

        let err = search::search_ids(&local_client(), &local_config(&base), "query")
            .await
            .unwrap_err();
        assert!(matches!(err, PubmedError::Api { code: 500, .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_api_error() {
        let base = spawn_eutils(
            Canned::ok(r#"{"esearchresult": {"idlist": ["1"]}}"#),
            Canned::status(500),
        )
        .await;
        let ids = vec!["1".to_string()];

        let err = fetch::fetch_details(&local_client(), &local_config(&base), &ids)
            .await
            .unwrap_err();
        assert!(matches!(err, PubmedError::Api { code: 500, .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_failure_after_search_degrades_to_empty() {
        let base = spawn_eutils(
            Canned::ok(r#"{"esearchresult": {"idlist": ["1", "2"]}}"#),
            Canned::status(500),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let records = run_with_client(
            &local_client(),
            &local_config(&base),
            "cancer immunotherapy",
            Some(&path),
        )
        .await;
        assert!(records.is_empty());
        assert!(!path.exists());
    }
}
