//! Hosted chat-completions backend.
//!
//! [`CloudClient`] talks to an OpenAI-style `/v1/chat/completions`
//! endpoint, authenticated with a bearer API key. The key is required at
//! construction; its absence is a configuration failure and nothing is
//! sent over the network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::LlmClient;
use crate::config::{BackendSettings, CLOUD_API_KEY_VAR};
use crate::error::{GenError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Timeout for the single outbound POST, same bound as the offline path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the hosted chat-completions API.
#[derive(Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl CloudClient {
    /// Build a cloud client, validating the credential up front.
    pub fn new(
        settings: &BackendSettings,
        http: reqwest::Client,
        model: &str,
        temperature: f32,
    ) -> Result<Self> {
        let api_key = settings
            .cloud_api_key
            .clone()
            .ok_or_else(|| GenError::Config(format!("missing {CLOUD_API_KEY_VAR}")))?;
        let base_url = settings
            .cloud_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            http,
            base_url,
            api_key,
            model: model.to_string(),
            temperature,
        })
    }

    /// Request body: exactly two messages (system, user) plus temperature.
    fn build_body(&self, system: &str, user: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": self.temperature,
        })
    }

    /// Authenticated POST with the bounded timeout applied.
    fn build_http_request(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
    }

    /// First completion's message content.
    fn extract_text(body: &Value) -> Result<String> {
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| GenError::Backend("cloud response had no message content".into()))
    }
}

#[async_trait]
impl LlmClient for CloudClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = self.build_body(system, user);

        let resp = self
            .build_http_request(&url, &body)
            .send()
            .await
            .map_err(|e| GenError::Backend(format!("failed to reach {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenError::Backend(format!(
                "cloud endpoint returned HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let json_resp: Value = resp.json().await?;
        Self::extract_text(&json_resp)
    }

    fn name(&self) -> &'static str {
        "cloud"
    }
}
