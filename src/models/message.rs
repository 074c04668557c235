use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::completion::FailureKind;
use super::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Platform selected when the turn was submitted.
    pub platform: Platform,
    pub image_path: Option<PathBuf>,
    pub failure: Option<FailureKind>,
    pub created_at: DateTime<Local>,
}

impl Message {
    pub fn time_label(&self) -> String {
        self.created_at.format("%I:%M %p").to_string()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_schedulable(&self) -> bool {
        self.role == Role::Assistant
    }
}
