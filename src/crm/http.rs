//! HTTP client for the CRM ingestion webhook

use super::{CrmClient, CrmPayload, DeliveryError};
use crate::config::CrmConfig;
use crate::lead::LeadRecord;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Configuration for the HTTP CRM client
#[derive(Debug, Clone)]
pub struct HttpCrmConfig {
    /// Webhook URL
    pub endpoint: String,
    /// Optional bearer token
    pub api_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl From<&CrmConfig> for HttpCrmConfig {
    fn from(config: &CrmConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            timeout: config.timeout(),
        }
    }
}

/// Posts leads as JSON to the CRM webhook
pub struct HttpCrmClient {
    config: HttpCrmConfig,
    client: Client,
}

impl HttpCrmClient {
    /// Create a client with the given configuration
    pub fn with_config(config: HttpCrmConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl CrmClient for HttpCrmClient {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), DeliveryError> {
        tracing::debug!(
            endpoint = %self.config.endpoint,
            lead_id = %lead.id(),
            "Posting lead to CRM"
        );

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&CrmPayload::from(lead));

        if let Some(ref token) = self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::fixtures::lead;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with `status_line`, returning the raw request
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/leads", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (url, handle)
    }

    fn client(endpoint: String, token: Option<&str>) -> HttpCrmClient {
        HttpCrmClient::with_config(HttpCrmConfig {
            endpoint,
            api_token: token.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_deliver_success_posts_json() {
        let (url, server) = serve_once("HTTP/1.1 201 Created", "").await;
        let client = client(url, Some("secret"));

        client.deliver(&lead("ana@example.com")).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /leads"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains("\"email\":\"ana@example.com\""));
    }

    #[tokio::test]
    async fn test_deliver_non_success_is_rejected() {
        let (url, server) = serve_once("HTTP/1.1 500 Internal Server Error", "boom").await;
        let client = client(url, None);

        let err = client.deliver(&lead("ana@example.com")).await.unwrap_err();
        match err {
            DeliveryError::Rejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }

        let request = server.await.unwrap();
        assert!(!request.to_lowercase().contains("authorization"));
    }

    #[tokio::test]
    async fn test_deliver_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{}/leads", addr), None);
        let err = client.deliver(&lead("ana@example.com")).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[test]
    fn test_config_from_crm_config() {
        let crm = CrmConfig::default();
        let config = HttpCrmConfig::from(&crm);
        assert_eq!(config.endpoint, crm.endpoint);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
