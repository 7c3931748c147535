//! CKAN Datastore alert source.
//!
//! Issues a single `datastore_search` GET and normalizes the
//! `result.records` array. No pagination and no retries: the page only
//! ever shows the first handful of alerts.

use async_trait::async_trait;
use flood_map_alerts_models::{AlertRecord, records_from_envelope};

use crate::{AlertError, AlertFeedConfig, AlertSource};

/// Alert source backed by a CKAN `datastore_search` endpoint.
pub struct CkanAlertSource {
    client: reqwest::Client,
    config: AlertFeedConfig,
}

impl CkanAlertSource {
    /// Creates a source with a client bound to the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Http`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(config: AlertFeedConfig) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AlertSource for CkanAlertSource {
    fn label(&self) -> &str {
        "PUB flood"
    }

    async fn try_fetch(&self) -> Result<Vec<AlertRecord>, AlertError> {
        log::info!(
            "Fetching flood alerts: resource_id={}, limit={}",
            self.config.resource_id,
            self.config.limit
        );

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("resource_id", self.config.resource_id.as_str()),
                ("limit", &self.config.limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        Ok(records_from_envelope(&body))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;
    use crate::fetch_alerts;

    /// Serves exactly one canned HTTP response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = Vec::new();
            while !read.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                read.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/api/action/datastore_search")
    }

    fn source_for(api_url: String) -> CkanAlertSource {
        CkanAlertSource::new(AlertFeedConfig {
            api_url,
            timeout: Duration::from_secs(5),
            ..AlertFeedConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn reads_records_in_feed_order() {
        let url = serve_once(
            "200 OK",
            r#"{"success":true,"result":{"records":[{"location":"Orchard Road","status":"Flooded"},{"location":"Changi"}]}}"#,
        )
        .await;

        let records = source_for(url).try_fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location.as_deref(), Some("Orchard Road"));
        assert_eq!(records[0].status.as_deref(), Some("Flooded"));
        assert_eq!(records[1].location.as_deref(), Some("Changi"));
        assert!(records[1].status.is_none());
    }

    #[tokio::test]
    async fn body_without_result_is_empty() {
        let url = serve_once("200 OK", r#"{"success":true}"#).await;
        let records = source_for(url).try_fetch().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_degrades_to_empty() {
        let url = serve_once("200 OK", "{not json").await;
        let source = source_for(url);
        assert!(fetch_alerts(&source).await.is_empty());
    }

    #[tokio::test]
    async fn server_error_status_is_reported() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let err = source_for(url).try_fetch().await.unwrap_err();
        assert!(matches!(err, AlertError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = source_for(format!("http://{addr}/api/action/datastore_search"));
        assert!(fetch_alerts(&source).await.is_empty());
    }
}
