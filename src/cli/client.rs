//! Thin HTTP client for the gateway's JSON endpoints.

use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

pub struct GatewayClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl GatewayClient {
    pub fn new(base: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid gateway URL '{}'", base))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base, token })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> anyhow::Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn post(&self, path: &str) -> anyhow::Result<Value> {
        self.request(Method::POST, path, None).await
    }

    /// GET that reports the status instead of failing on non-2xx.
    pub async fn get_with_status(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        let response = self.send(Method::GET, path, None).await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> anyhow::Result<Value> {
        let response = self.send(method, path, body).await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
        Err(anyhow!("{} ({})", message, status.as_u16()))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> anyhow::Result<reqwest::Response> {
        let url = self.base.join(path).with_context(|| format!("invalid path '{}'", path))?;
        tracing::debug!(%method, %url, "gateway request");

        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::COOKIE, format!("sb-access-token={}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        request.send().await.with_context(|| format!("failed to reach {}", url))
    }
}
