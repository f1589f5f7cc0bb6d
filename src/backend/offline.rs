//! Bare-HTTP offline backend.
//!
//! [`OfflineClient`] posts a single JSON body to a configured endpoint on a
//! private network and coerces whatever comes back into text. The endpoint
//! URL is required at construction; its absence is a configuration failure.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::LlmClient;
use crate::config::{BackendSettings, OFFLINE_ENDPOINT_VAR};
use crate::error::{GenError, Result};

/// Timeout for the single outbound POST.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a bare HTTP completion endpoint.
#[derive(Debug, Clone)]
pub struct OfflineClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OfflineClient {
    /// Build an offline client, validating the endpoint URL up front.
    pub fn new(
        settings: &BackendSettings,
        http: reqwest::Client,
        model: &str,
        temperature: f32,
    ) -> Result<Self> {
        let endpoint = settings
            .offline_endpoint
            .clone()
            .ok_or_else(|| GenError::Config(format!("missing {OFFLINE_ENDPOINT_VAR}")))?;
        Ok(Self {
            http,
            endpoint,
            model: model.to_string(),
            temperature,
        })
    }

    /// Coerce an arbitrary response body into text.
    ///
    /// Mappings are probed for the first populated field among `content`,
    /// `text` and the first choice's `text`; when none is populated the
    /// result is empty (and the output contract will reject it downstream).
    /// A non-mapping body is returned in its string form rather than
    /// rejected — a deliberately permissive fallback for heterogeneous
    /// offline servers.
    fn coerce_body(body: Value) -> String {
        match body {
            Value::Object(ref map) => {
                let populated = |v: &Value| {
                    v.as_str()
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                map.get("content")
                    .and_then(populated)
                    .or_else(|| map.get("text").and_then(populated))
                    .or_else(|| {
                        map.get("choices")
                            .and_then(|c| c.get(0))
                            .and_then(|c| c.get("text"))
                            .and_then(populated)
                    })
                    .unwrap_or_default()
            }
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for OfflineClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "prompt": format!("{system}\n{user}"),
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GenError::Backend(format!("failed to reach {}: {e}", self.endpoint))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenError::Backend(format!(
                "offline endpoint returned HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let json_resp: Value = resp.json().await?;
        Ok(Self::coerce_body(json_resp))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
