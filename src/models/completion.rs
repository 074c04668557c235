use serde::{Deserialize, Serialize};

/// Text returned when the provider answers 200 but the expected
/// `choices[0].message.content` path is missing or not a string.
pub const NO_CONTENT_FALLBACK: &str = "No content generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Connect,
    Timeout,
    Status(u16),
    Decode,
    Request,
}

impl FailureKind {
    pub fn title(&self) -> String {
        match self {
            FailureKind::Connect => "Could not reach the content service".to_string(),
            FailureKind::Timeout => "The content service timed out".to_string(),
            FailureKind::Status(code) => format!("The content service answered {}", code),
            FailureKind::Decode => "The content service sent an unreadable reply".to_string(),
            FailureKind::Request => "The request could not be sent".to_string(),
        }
    }
}

/// Outcome of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Generated(String),
    Failed { kind: FailureKind, detail: String },
}

impl Completion {
    pub fn text(&self) -> &str {
        match self {
            Completion::Generated(text) => text,
            Completion::Failed { detail, .. } => detail,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Completion::Generated(_) => None,
            Completion::Failed { kind, .. } => Some(*kind),
        }
    }
}
