//! In-process local model backend.
//!
//! [`LocalClient`] resolves and verifies a checkpoint path at construction,
//! then drives a [`ChatRuntime`] for inference. The runtime handle is
//! created lazily on the first `generate` call and cached for the lifetime
//! of the client; a `tokio::sync::Mutex` serializes access so one handle
//! runs one inference at a time. Instantiation failure is a backend
//! failure, not a configuration failure — the path was already verified to
//! exist.
//!
//! The concrete runtime is pluggable through [`RuntimeLoader`] so the
//! inference engine (llama.cpp bindings, a candle model, a test fake) can
//! be linked by the embedding application. The stock loader reports that no
//! runtime is linked into the build.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{LlmClient, DEFAULT_MODEL};
use crate::config::{BackendSettings, LOCAL_MODEL_PATH_VAR};
use crate::error::{GenError, Result};

/// A loaded in-process model capable of one chat completion at a time.
///
/// The response is the runtime's structured dump in OpenAI chat-completion
/// shape: `{"choices": [{"message": {"content": ...}}]}` where `content`
/// is either a string or a list of typed parts.
pub trait ChatRuntime: Send {
    /// Run one chat completion over a (system, user) pair.
    fn chat_completion(&mut self, system: &str, user: &str, temperature: f32) -> Result<Value>;
}

/// Factory that instantiates a runtime from a verified checkpoint path.
pub type RuntimeLoader = Box<dyn Fn(&Path) -> Result<Box<dyn ChatRuntime>> + Send + Sync>;

fn unavailable_loader(_path: &Path) -> Result<Box<dyn ChatRuntime>> {
    Err(GenError::Backend(
        "no local inference runtime is linked into this build; \
         supply one with LocalClient::with_runtime_loader"
            .into(),
    ))
}

/// Client that runs inference in-process over a local checkpoint.
pub struct LocalClient {
    model_path: PathBuf,
    temperature: f32,
    loader: RuntimeLoader,
    runtime: Mutex<Option<Box<dyn ChatRuntime>>>,
}

impl std::fmt::Debug for LocalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClient")
            .field("model_path", &self.model_path)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LocalClient {
    /// Build a local client, resolving and verifying the checkpoint path.
    ///
    /// The path comes from the explicit `model` override unless it is
    /// absent or the generic default model name, in which case the
    /// configured path is used. A leading `~` resolves against the home
    /// directory. A missing path, or no file at that path, is a
    /// configuration failure; no runtime is loaded here.
    pub fn new(
        settings: &BackendSettings,
        model: Option<&str>,
        temperature: f32,
    ) -> Result<Self> {
        let override_path = model
            .filter(|m| !m.is_empty() && *m != DEFAULT_MODEL)
            .map(PathBuf::from);
        let model_path = override_path
            .or_else(|| settings.local_model_path.clone())
            .ok_or_else(|| {
                GenError::Config(format!(
                    "missing {LOCAL_MODEL_PATH_VAR} or model path override"
                ))
            })?;
        let model_path = expand_tilde(model_path);
        if !model_path.exists() {
            return Err(GenError::Config(format!(
                "local model not found: {}",
                model_path.display()
            )));
        }
        Ok(Self {
            model_path,
            temperature,
            loader: Box::new(unavailable_loader),
            runtime: Mutex::new(None),
        })
    }

    /// Install the runtime factory used on first `generate`.
    pub fn with_runtime_loader(mut self, loader: RuntimeLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Resolved checkpoint path.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Coerce a runtime response into text.
    ///
    /// Takes the first choice's message content; a list of typed parts is
    /// concatenated keeping only `text`-typed parts. Anything that ends up
    /// empty or non-textual is a backend failure, never silently
    /// substituted.
    fn coerce_response(response: &Value) -> Result<String> {
        if !response.is_object() {
            return Err(GenError::Backend(
                "unexpected response from local runtime".into(),
            ));
        }
        let choice = response
            .get("choices")
            .and_then(|c| c.get(0))
            .ok_or_else(|| GenError::Backend("local runtime returned no choices".into()))?;
        let content = choice.get("message").and_then(|m| m.get("content"));

        let text = match content {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(parts)) => parts
                .iter()
                .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>(),
            _ => {
                return Err(GenError::Backend(
                    "local runtime returned empty content".into(),
                ))
            }
        };

        if text.trim().is_empty() {
            return Err(GenError::Backend(
                "local runtime returned empty content".into(),
            ));
        }
        Ok(text)
    }
}

/// Resolve a leading `~` or `~/` against the home directory; anything
/// else (including `~user` forms) is taken literally.
fn expand_tilde(path: PathBuf) -> PathBuf {
    let expanded = match path.to_str() {
        Some("~") => dirs::home_dir(),
        Some(s) => s
            .strip_prefix("~/")
            .and_then(|rest| dirs::home_dir().map(|home| home.join(rest))),
        None => None,
    };
    expanded.unwrap_or(path)
}

#[async_trait]
impl LlmClient for LocalClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        // One inference per handle: the lock is held across load and call.
        let mut guard = self.runtime.lock().await;
        if guard.is_none() {
            tracing::info!(path = %self.model_path.display(), "loading local model runtime");
            *guard = Some((self.loader)(&self.model_path)?);
        }
        let runtime = guard.as_mut().expect("runtime populated above");

        let response = runtime.chat_completion(system, user, self.temperature)?;
        Self::coerce_response(&response)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeRuntime {
        response: Value,
    }

    impl ChatRuntime for FakeRuntime {
        fn chat_completion(&mut self, _: &str, _: &str, _: f32) -> Result<Value> {
            Ok(self.response.clone())
        }
    }

    fn checkpoint() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().expect("temp checkpoint")
    }

    fn client_with_response(path: &Path, response: Value) -> LocalClient {
        let settings = BackendSettings::default().with_local_model_path(path);
        LocalClient::new(&settings, None, 0.0)
            .unwrap()
            .with_runtime_loader(Box::new(move |_| {
                Ok(Box::new(FakeRuntime {
                    response: response.clone(),
                }))
            }))
    }

    #[test]
    fn test_missing_path_is_config_error() {
        let settings = BackendSettings::default();
        let err = LocalClient::new(&settings, None, 0.0).unwrap_err();
        assert!(matches!(err, GenError::Config(ref m) if m.contains("LLAMA_MODEL_PATH")));
    }

    #[test]
    fn test_nonexistent_file_is_config_error() {
        let settings =
            BackendSettings::default().with_local_model_path("/nonexistent/model.gguf");
        let err = LocalClient::new(&settings, None, 0.0).unwrap_err();
        assert!(matches!(err, GenError::Config(ref m) if m.contains("local model not found")));
    }

    #[test]
    fn test_explicit_override_wins() {
        let file = checkpoint();
        let settings = BackendSettings::default();
        let client = LocalClient::new(
            &settings,
            Some(file.path().to_str().unwrap()),
            0.0,
        )
        .unwrap();
        assert_eq!(client.model_path(), file.path());
    }

    #[test]
    fn test_default_model_name_is_not_an_override() {
        let file = checkpoint();
        let settings = BackendSettings::default().with_local_model_path(file.path());
        let client = LocalClient::new(&settings, Some(DEFAULT_MODEL), 0.0).unwrap();
        assert_eq!(client.model_path(), file.path());
    }

    #[test]
    fn test_tilde_paths_resolve_against_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_tilde(PathBuf::from("~/models/model.gguf")),
            home.join("models/model.gguf")
        );
        assert_eq!(expand_tilde(PathBuf::from("~")), home);
    }

    #[test]
    fn test_plain_paths_are_not_expanded() {
        assert_eq!(
            expand_tilde(PathBuf::from("/opt/models/model.gguf")),
            PathBuf::from("/opt/models/model.gguf")
        );
        assert_eq!(
            expand_tilde(PathBuf::from("~user/model.gguf")),
            PathBuf::from("~user/model.gguf")
        );
    }

    #[test]
    fn test_tilde_override_is_expanded_before_existence_check() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let settings = BackendSettings::default();
        let err = LocalClient::new(&settings, Some("~/convgen-no-such-dir/model.gguf"), 0.0)
            .unwrap_err();
        match err {
            GenError::Config(message) => {
                assert!(message.contains("local model not found"));
                assert!(!message.contains('~'));
                assert!(message.contains(&home.display().to_string()));
            }
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_string_content() {
        let file = checkpoint();
        let client = client_with_response(
            file.path(),
            json!({"choices": [{"message": {"content": "hello"}}]}),
        );
        assert_eq!(client.generate("s", "u").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_generate_concatenates_text_parts() {
        let file = checkpoint();
        let client = client_with_response(
            file.path(),
            json!({"choices": [{"message": {"content": [
                {"type": "text", "text": "part one, "},
                {"type": "image", "url": "ignored"},
                {"type": "text", "text": "part two"},
            ]}}]}),
        );
        assert_eq!(client.generate("s", "u").await.unwrap(), "part one, part two");
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_backend_error() {
        let file = checkpoint();
        let client = client_with_response(
            file.path(),
            json!({"choices": [{"message": {"content": "   "}}]}),
        );
        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(ref m) if m.contains("empty content")));
    }

    #[tokio::test]
    async fn test_generate_no_choices_is_backend_error() {
        let file = checkpoint();
        let client = client_with_response(file.path(), json!({"choices": []}));
        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(ref m) if m.contains("no choices")));
    }

    #[tokio::test]
    async fn test_generate_non_object_response_is_backend_error() {
        let file = checkpoint();
        let client = client_with_response(file.path(), json!("raw"));
        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(ref m) if m.contains("unexpected response")));
    }

    #[tokio::test]
    async fn test_runtime_loaded_once_and_cached() {
        let file = checkpoint();
        let loads = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&loads);

        let settings = BackendSettings::default().with_local_model_path(file.path());
        let client = LocalClient::new(&settings, None, 0.0)
            .unwrap()
            .with_runtime_loader(Box::new(move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(FakeRuntime {
                    response: json!({"choices": [{"message": {"content": "ok"}}]}),
                }))
            }));

        client.generate("s", "u").await.unwrap();
        client.generate("s", "u").await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_failure_is_backend_error() {
        let file = checkpoint();
        let settings = BackendSettings::default().with_local_model_path(file.path());
        let client = LocalClient::new(&settings, None, 0.0)
            .unwrap()
            .with_runtime_loader(Box::new(|_| {
                Err(GenError::Backend("failed to initialise runtime: oom".into()))
            }));
        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(_)));
    }

    #[tokio::test]
    async fn test_stock_loader_reports_unlinked_runtime() {
        let file = checkpoint();
        let settings = BackendSettings::default().with_local_model_path(file.path());
        let client = LocalClient::new(&settings, None, 0.0).unwrap();
        let err = client.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(ref m) if m.contains("no local inference runtime")));
    }
}
