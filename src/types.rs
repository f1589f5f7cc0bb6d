//! Wire types for the generation request and response.
//!
//! These mirror the JSON shape an embedding HTTP server exposes; the
//! pipeline consumes [`GenerateRequest`] and produces [`GenerateResponse`].

use serde::{Deserialize, Serialize};

fn default_backend() -> String {
    "cloud".to_string()
}

fn default_return_archive() -> bool {
    true
}

/// A single request to generate the four converter files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Name of the root struct driving the generation.
    pub root: String,

    /// Full text of the legacy header.
    pub old_header: String,

    /// Full text of the updated header.
    pub new_header: String,

    /// Backend identifier: `"cloud"`, `"offline"` or `"local"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Optional model override passed to the backend.
    #[serde(default)]
    pub model: Option<String>,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Whether to include the base64 zip archive in the response.
    #[serde(default = "default_return_archive")]
    pub return_archive: bool,
}

impl GenerateRequest {
    /// Build a request with the default backend, temperature 0 and the
    /// archive enabled.
    pub fn new(
        root: impl Into<String>,
        old_header: impl Into<String>,
        new_header: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            old_header: old_header.into(),
            new_header: new_header.into(),
            backend: default_backend(),
            model: None,
            temperature: 0.0,
            return_archive: default_return_archive(),
        }
    }

    /// Select a backend by name.
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable the archive payload.
    pub fn with_archive(mut self, return_archive: bool) -> Self {
        self.return_archive = return_archive;
        self
    }
}

/// One generated source file, immutable once parsed.
///
/// Identity is the `name`; `language` is the fence tag (`"c"` or `"cpp"`)
/// and `content` is the fenced body, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub name: String,
    pub language: String,
    pub content: String,
}

/// Successful generation result: the echoed root, exactly four files, and
/// the optional base64-encoded zip archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub root: String,
    pub files: Vec<GeneratedFile>,
    pub archive_base64: Option<String>,
}
