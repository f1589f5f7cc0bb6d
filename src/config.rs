//! Process-wide backend configuration.
//!
//! [`BackendSettings`] is populated once at startup (normally from the
//! environment) and passed into the backend factory, so tests can inject a
//! fake configuration instead of mutating process-global state.

use std::env;
use std::path::PathBuf;

/// Environment variable holding the cloud API credential.
pub const CLOUD_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the offline HTTP endpoint URL.
pub const OFFLINE_ENDPOINT_VAR: &str = "OFFLINE_LLM_ENDPOINT";
/// Environment variable holding the local model checkpoint path.
pub const LOCAL_MODEL_PATH_VAR: &str = "LLAMA_MODEL_PATH";

/// Credentials and endpoints required by the three backend variants.
///
/// All fields are optional here; each backend validates the field it needs
/// at construction time and reports a configuration failure when it is
/// absent. Read-only after construction.
#[derive(Clone, Default)]
pub struct BackendSettings {
    /// API credential for the cloud backend.
    pub cloud_api_key: Option<String>,
    /// Base URL override for the cloud backend (compat providers, tests).
    pub cloud_base_url: Option<String>,
    /// Endpoint URL for the offline HTTP backend.
    pub offline_endpoint: Option<String>,
    /// Checkpoint path for the local in-process backend.
    pub local_model_path: Option<PathBuf>,
}

impl BackendSettings {
    /// Read the settings from the process environment.
    ///
    /// Empty variables are treated as absent.
    pub fn from_env() -> Self {
        Self {
            cloud_api_key: non_empty_var(CLOUD_API_KEY_VAR),
            cloud_base_url: None,
            offline_endpoint: non_empty_var(OFFLINE_ENDPOINT_VAR),
            local_model_path: non_empty_var(LOCAL_MODEL_PATH_VAR).map(PathBuf::from),
        }
    }

    /// Set the cloud API credential.
    pub fn with_cloud_api_key(mut self, key: impl Into<String>) -> Self {
        self.cloud_api_key = Some(key.into());
        self
    }

    /// Override the cloud base URL.
    pub fn with_cloud_base_url(mut self, url: impl Into<String>) -> Self {
        self.cloud_base_url = Some(url.into());
        self
    }

    /// Set the offline endpoint URL.
    pub fn with_offline_endpoint(mut self, url: impl Into<String>) -> Self {
        self.offline_endpoint = Some(url.into());
        self
    }

    /// Set the local model checkpoint path.
    pub fn with_local_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_model_path = Some(path.into());
        self
    }
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("cloud_api_key", &self.cloud_api_key.as_ref().map(redact))
            .field("cloud_base_url", &self.cloud_base_url)
            .field("offline_endpoint", &self.offline_endpoint)
            .field("local_model_path", &self.local_model_path)
            .finish()
    }
}

fn redact(key: &String) -> String {
    if key.len() > 6 {
        format!("{}***", &key[..6])
    } else {
        "***".to_string()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_style_construction() {
        let settings = BackendSettings::default()
            .with_cloud_api_key("sk-test")
            .with_offline_endpoint("http://127.0.0.1:8080/v1/generate")
            .with_local_model_path("/models/model.gguf");

        assert_eq!(settings.cloud_api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            settings.offline_endpoint.as_deref(),
            Some("http://127.0.0.1:8080/v1/generate")
        );
        assert_eq!(
            settings.local_model_path,
            Some(PathBuf::from("/models/model.gguf"))
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = BackendSettings::default().with_cloud_api_key("sk-1234567890abcdef");
        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("1234567890abcdef"));
        assert!(debug_output.contains("sk-123"));
        assert!(debug_output.contains("***"));
    }

    #[test]
    fn test_debug_redacts_short_key() {
        let settings = BackendSettings::default().with_cloud_api_key("abc");
        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("abc"));
    }

    #[test]
    fn test_default_is_empty() {
        let settings = BackendSettings::default();
        assert!(settings.cloud_api_key.is_none());
        assert!(settings.offline_endpoint.is_none());
        assert!(settings.local_model_path.is_none());
    }
}
