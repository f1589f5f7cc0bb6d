//! Mock client for testing without a live model.
//!
//! [`MockClient`] returns pre-configured responses in order, so the
//! pipeline and the output contract can be exercised deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::LlmClient;
use crate::error::{GenError, Result};

/// A test client that returns canned responses in order.
///
/// Cycles back to the beginning when all responses have been consumed.
#[derive(Debug)]
pub struct MockClient {
    responses: Vec<String>,
    failure: Option<String>,
    index: AtomicUsize,
}

impl MockClient {
    /// Create a mock with the given canned responses.
    pub fn new(responses: Vec<String>) -> Self {
        assert!(
            !responses.is_empty(),
            "MockClient requires at least one response"
        );
        Self {
            responses,
            failure: None,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Create a mock whose `generate` always fails with a backend error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            failure: Some(message.into()),
            index: AtomicUsize::new(0),
        }
    }

    fn next_response(&self) -> String {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        self.responses[idx].clone()
    }
}

#[async_trait]
impl LlmClient for MockClient {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
        if let Some(ref message) = self.failure {
            return Err(GenError::Backend(message.clone()));
        }
        Ok(self.next_response())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let mock = MockClient::fixed("hello");
        assert_eq!(mock.generate("s", "u").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_cycles_responses() {
        let mock = MockClient::new(vec!["first".into(), "second".into()]);
        assert_eq!(mock.generate("s", "u").await.unwrap(), "first");
        assert_eq!(mock.generate("s", "u").await.unwrap(), "second");
        assert_eq!(mock.generate("s", "u").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockClient::failing("simulated outage");
        let err = mock.generate("s", "u").await.unwrap_err();
        assert!(matches!(err, GenError::Backend(ref m) if m == "simulated outage"));
    }
}
