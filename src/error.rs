use thiserror::Error;

/// Errors produced by the generation pipeline and its components.
///
/// Each variant is one externally visible classification; none of them is
/// ever collapsed into a generic error. [`GenError::status_code`] maps a
/// classification to the HTTP-style status class an embedding server would
/// report.
#[derive(Error, Debug)]
pub enum GenError {
    /// Missing or oversized request fields. Raised before any backend is
    /// constructed or called.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required credential or path was absent when the backend was
    /// constructed. Never touches the network.
    #[error("backend configuration: {0}")]
    Config(String),

    /// The request named a backend outside the closed enumeration.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Any failure during the `generate` call itself: connection error,
    /// non-success transport status, malformed or empty provider response,
    /// local runtime initialization or inference error.
    #[error("backend failure: {0}")]
    Backend(String),

    /// The model explicitly reported that no common root struct exists.
    /// Carries the sentinel comment's inner text verbatim.
    #[error("no common root: {0}")]
    OutputConflict(String),

    /// The model's output did not contain exactly four file blocks, or left
    /// unmatched non-whitespace text around them.
    #[error("{0}")]
    OutputStructure(String),

    /// Four well-formed blocks were found but one or more required filenames
    /// were missing.
    #[error("{0}")]
    OutputContent(String),

    /// Packing the four files into the result archive failed.
    #[error("archive packing failed: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl GenError {
    /// HTTP-style status class for this classification.
    ///
    /// 400 invalid input / unknown backend, 424 backend misconfigured or
    /// failed, 422 output failed validation, 409 explicit no-common-root.
    pub fn status_code(&self) -> u16 {
        match self {
            GenError::InvalidInput(_) | GenError::UnknownBackend(_) => 400,
            GenError::Config(_) | GenError::Backend(_) => 424,
            GenError::OutputConflict(_) => 409,
            GenError::OutputStructure(_) | GenError::OutputContent(_) => 422,
            GenError::Archive(_) => 500,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        GenError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        GenError::Backend(format!("malformed provider response: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(GenError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(GenError::UnknownBackend("x".into()).status_code(), 400);
        assert_eq!(GenError::Config("x".into()).status_code(), 424);
        assert_eq!(GenError::Backend("x".into()).status_code(), 424);
        assert_eq!(GenError::OutputConflict("x".into()).status_code(), 409);
        assert_eq!(GenError::OutputStructure("x".into()).status_code(), 422);
        assert_eq!(GenError::OutputContent("x".into()).status_code(), 422);
    }

    #[test]
    fn test_display_preserves_detail() {
        let err = GenError::OutputStructure("expected four file blocks".into());
        assert_eq!(err.to_string(), "expected four file blocks");

        let err = GenError::OutputConflict("error: no common root".into());
        assert!(err.to_string().contains("error: no common root"));
    }
}
