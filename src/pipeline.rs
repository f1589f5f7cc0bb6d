//! Request pipeline: validate → select backend → assemble prompt →
//! generate → parse → package.
//!
//! Each step is a hard sequence point with no retries and no fan-out; the
//! first failure is surfaced immediately under its own classification. A
//! request is handled statelessly end-to-end — nothing is retained across
//! requests except the injected [`BackendSettings`] and the shared HTTP
//! client.

use tracing::{debug, info};

use crate::archive;
use crate::backend::{self, LlmClient};
use crate::config::BackendSettings;
use crate::contract;
use crate::error::{GenError, Result};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::types::{GenerateRequest, GenerateResponse};

/// Size ceiling applied to each header text, in bytes.
pub const MAX_HEADER_LEN: usize = 100_000;

/// Orchestrates one generation request end to end.
pub struct Pipeline {
    settings: BackendSettings,
    http: reqwest::Client,
}

impl Pipeline {
    /// Build a pipeline over the given settings.
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// Run a request: selects the backend named by the request, then drives
    /// it through prompt assembly, generation, output validation and
    /// archive packaging.
    pub async fn run(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        validate(request)?;
        let client = backend::select(
            &request.backend,
            request.model.as_deref(),
            request.temperature,
            &self.settings,
            &self.http,
        )?;
        self.dispatch(request, client.as_ref()).await
    }

    /// Run a request against an already-constructed client.
    ///
    /// This is the seam tests use to substitute a mock for the model.
    pub async fn run_with_client(
        &self,
        request: &GenerateRequest,
        client: &dyn LlmClient,
    ) -> Result<GenerateResponse> {
        validate(request)?;
        self.dispatch(request, client).await
    }

    async fn dispatch(
        &self,
        request: &GenerateRequest,
        client: &dyn LlmClient,
    ) -> Result<GenerateResponse> {
        info!(
            backend = client.name(),
            root = %request.root,
            "dispatching generation"
        );

        let user_prompt =
            build_user_prompt(&request.root, &request.old_header, &request.new_header);
        let text = client.generate(SYSTEM_PROMPT, &user_prompt).await?;
        debug!(chars = text.len(), "model returned text");

        let files = contract::parse(&text)?;
        debug!(files = files.len(), "output contract satisfied");

        let archive_base64 = if request.return_archive {
            Some(archive::zip_base64(&files)?)
        } else {
            None
        };

        Ok(GenerateResponse {
            root: request.root.clone(),
            files,
            archive_base64,
        })
    }
}

/// Request shape validation: non-empty fields, headers within the ceiling.
/// Runs before any backend is constructed.
fn validate(request: &GenerateRequest) -> Result<()> {
    if request.root.is_empty() || request.old_header.is_empty() || request.new_header.is_empty()
    {
        return Err(GenError::InvalidInput("missing input".into()));
    }
    if request.old_header.len() > MAX_HEADER_LEN || request.new_header.len() > MAX_HEADER_LEN {
        return Err(GenError::InvalidInput("input too large".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_fields() {
        let err = validate(&GenerateRequest::new("", "old", "new")).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(ref m) if m == "missing input"));

        let err = validate(&GenerateRequest::new("Port", "", "new")).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));

        let err = validate(&GenerateRequest::new("Port", "old", "")).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_header() {
        let big = "x".repeat(MAX_HEADER_LEN + 1);
        let err = validate(&GenerateRequest::new("Port", big, "new")).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(ref m) if m == "input too large"));
    }

    #[test]
    fn test_validate_accepts_header_at_ceiling() {
        let exact = "x".repeat(MAX_HEADER_LEN);
        assert!(validate(&GenerateRequest::new("Port", exact.clone(), exact)).is_ok());
    }
}
