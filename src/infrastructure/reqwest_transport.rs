use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::domain::{
    error::RequestError,
    transport::{ApiRequest, ApiResponse, Transport},
};

/// Settings baked into every request the client sends.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Sent as `Authorization: Bearer …` when set. Off unless configured.
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

/// `Transport` over a base-configured `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &settings.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).context("invalid bearer token")?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url: settings.base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = format!("{}{}", self.base_url, request.url);
        let mut builder = self.client.request(request.method, url);
        for (name, value) in &request.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.config.query.is_empty() {
            builder = builder.query(&request.config.query);
        }
        if let Some(timeout) = request.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(ApiResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::timeout(err.to_string())
    } else if err.is_builder() {
        RequestError::unexpected(err)
    } else {
        RequestError::transport(err.to_string())
    }
}
