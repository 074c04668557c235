use thiserror::Error;

use crate::models::{Completion, FailureKind};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Connect(_) => FailureKind::Connect,
            ProviderError::Timeout(_) => FailureKind::Timeout,
            ProviderError::Status { status, .. } => FailureKind::Status(*status),
            ProviderError::Decode(_) => FailureKind::Decode,
            ProviderError::Request(_) => FailureKind::Request,
        }
    }

    /// Text shown in the conversation in place of generated copy.
    pub fn user_text(&self) -> String {
        match self {
            ProviderError::Status { status, body } => format!("Error: {} - {}", status, body),
            other => format!("An error occurred: {}", other),
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProviderError::Connect(err.to_string())
        } else if err.is_decode() || err.is_body() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

impl From<ProviderError> for Completion {
    fn from(err: ProviderError) -> Self {
        Completion::Failed {
            kind: err.kind(),
            detail: err.user_text(),
        }
    }
}

#[derive(Clone)]
pub struct CompletionRequest {
    pub api_key: String,
    pub model: String,
    pub prompt: String,
}

impl std::fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_text_carries_code_and_body() {
        let err = ProviderError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.user_text(), "Error: 403 - forbidden");
        assert_eq!(err.kind(), FailureKind::Status(403));
    }

    #[test]
    fn test_transport_error_text_keeps_description() {
        let err = ProviderError::Connect("connection refused".to_string());
        assert_eq!(
            err.user_text(),
            "An error occurred: Failed to connect: connection refused"
        );

        let completion: Completion = err.into();
        assert_eq!(completion.failure_kind(), Some(FailureKind::Connect));
    }

    #[test]
    fn test_request_debug_hides_api_key() {
        let request = CompletionRequest {
            api_key: "gsk_secret".to_string(),
            model: "m".to_string(),
            prompt: "p".to_string(),
        };
        assert!(!format!("{:?}", request).contains("gsk_secret"));
    }
}
