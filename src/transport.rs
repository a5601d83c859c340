use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use crate::error::{PageError, Result};

#[cfg(test)]
use mockall::automock;

/// JSON-over-HTTP access to the platform backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` (or nothing) to `path` and return the decoded JSON body.
    /// Non-success statuses are errors.
    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value>;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PageError::Config(format!("Invalid backend URL '{base_url}': {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PageError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PageError::Internal(format!("Invalid endpoint path '{path}': {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PageError::Transport(format!("Failed to send request to {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Server {
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PageError::Contract(format!("Failed to parse response from {path}: {e}")))
    }
}
