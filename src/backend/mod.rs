//! Backend clients and the factory that selects them.
//!
//! The [`LlmClient`] trait abstracts over the three text-generation
//! transports behind one capability:
//!
//! ```text
//! Pipeline ──► select() ──► LlmClient::generate(system, user) ──► text
//!                                     │
//!                  ┌──────────────────┼──────────────────┐
//!             CloudClient      OfflineClient        LocalClient
//!          chat completions    bare HTTP POST    in-process runtime
//! ```
//!
//! Each variant validates its required credential or path at construction
//! (a [`GenError::Config`] failure, before any network or runtime work) and
//! reports every failure inside `generate` as [`GenError::Backend`].

pub mod cloud;
pub mod local;
pub mod mock;
pub mod offline;

pub use cloud::CloudClient;
pub use local::{ChatRuntime, LocalClient, RuntimeLoader};
pub use mock::MockClient;
pub use offline::OfflineClient;

use std::str::FromStr;

use async_trait::async_trait;

use crate::config::BackendSettings;
use crate::error::{GenError, Result};

/// Model identifier used when the request carries no override. The local
/// variant also treats this value as "no path override".
pub const DEFAULT_MODEL: &str = "gpt-5";

/// The single capability every backend provides.
///
/// Object-safe; the factory returns `Box<dyn LlmClient>`. A client is
/// constructed fresh per request and owns its own connection or runtime
/// resources for that request's duration.
#[async_trait]
pub trait LlmClient: Send + Sync + std::fmt::Debug {
    /// Run one completion over a (system, user) message pair and return the
    /// model's raw text.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;

    /// Variant name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// The closed enumeration of backend variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted chat-completions API, authenticated with an API key.
    Cloud,
    /// Bare HTTP endpoint on a private network.
    Offline,
    /// In-process model runtime over a local checkpoint.
    Local,
}

impl FromStr for BackendKind {
    type Err = GenError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "" | "cloud" | "openai" => Ok(BackendKind::Cloud),
            "offline" => Ok(BackendKind::Offline),
            "local" | "local-llama" | "llama" => Ok(BackendKind::Local),
            other => Err(GenError::UnknownBackend(other.to_string())),
        }
    }
}

/// Select and construct a backend client.
///
/// `name` defaults to the cloud variant when empty. Required credentials
/// and paths are validated here, so a misconfigured backend fails before
/// any prompt is assembled or sent. Selection is a pure function of the
/// name and the settings: the same inputs always yield the same outcome.
pub fn select(
    name: &str,
    model: Option<&str>,
    temperature: f32,
    settings: &BackendSettings,
    http: &reqwest::Client,
) -> Result<Box<dyn LlmClient>> {
    let kind = BackendKind::from_str(name)?;
    tracing::debug!(backend = ?kind, model = model.unwrap_or(DEFAULT_MODEL), "selecting backend");
    match kind {
        BackendKind::Cloud => Ok(Box::new(CloudClient::new(
            settings,
            http.clone(),
            model.unwrap_or(DEFAULT_MODEL),
            temperature,
        )?)),
        BackendKind::Offline => Ok(Box::new(OfflineClient::new(
            settings,
            http.clone(),
            model.unwrap_or(DEFAULT_MODEL),
            temperature,
        )?)),
        BackendKind::Local => Ok(Box::new(LocalClient::new(settings, model, temperature)?)),
    }
}
