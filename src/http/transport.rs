//! HttpTransport — reqwest implementation of [`Transport`]

use super::{Method, Operation, Transport};
use crate::config::ClientConfig;
use crate::error::{SeraphError, SeraphResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Network transport talking JSON to the store's REST API.
///
/// No retries, pooling policy or caching beyond what reqwest does by itself.
pub struct HttpTransport {
    config: ClientConfig,
    http_client: Client,
}

impl HttpTransport {
    /// Create a transport for the given configuration
    ///
    /// # Example
    /// ```no_run
    /// # use seraph::{ClientConfig, HttpTransport};
    /// let transport = HttpTransport::new(ClientConfig::new("http://localhost:7474")).unwrap();
    /// ```
    pub fn new(config: ClientConfig) -> SeraphResult<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Absolute URL an operation path resolves to
    pub fn url_for(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Pull the store's own error message out of a failed response body
fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("message")
        .or_else(|| parsed.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, operation: &Operation) -> SeraphResult<Value> {
        let url = self.url_for(&operation.path);
        debug!("{} {}", operation.method, url);

        let mut builder = match operation.method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
            Method::Put => self.http_client.put(&url),
            Method::Delete => self.http_client.delete(&url),
        };
        builder = builder.header("Accept", "application/json");
        if let Some(body) = &operation.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        let message = error_message(&text)
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        debug!("{} {} failed with {}: {}", operation.method, url, status, message);
        Err(SeraphError::request(Some(status.as_u16()), message))
    }
}
