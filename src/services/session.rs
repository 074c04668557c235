use std::path::PathBuf;

use chrono::{DateTime, Local};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Completion, Conversation, Message, Platform, Role, ScheduledPost};
use crate::services::assets::AssetPicker;
use crate::services::completion::CompletionClient;
use crate::services::prompt::compose_prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    AwaitingResponse,
    IdleWithHistory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Describe the property first")]
    EmptyInput,

    #[error("Still waiting for the previous reply")]
    Busy,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Only assistant messages can be scheduled")]
    NotAssistantMessage,

}

/// A submitted user message waiting for its reply.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub id: String,
    pub conversation_id: String,
    pub prompt: String,
    pub platform: Platform,
    pub user_message: Message,
}

/// Everything gathered for the assistant side of a turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub completion: Completion,
    pub image: Option<PathBuf>,
    pub warning: Option<String>,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub message: Message,
    pub warning: Option<String>,
}

/// Calls the model, then picks an image. A listing failure becomes a warning
/// and no image.
pub async fn fetch_reply(client: &CompletionClient, picker: &AssetPicker, prompt: String) -> TurnReply {
    let completion = client.generate(prompt).await;

    match picker.pick() {
        Ok(image) => TurnReply {
            completion,
            image,
            warning: None,
        },
        Err(e) => {
            tracing::warn!("{}", e);
            TurnReply {
                completion,
                image: None,
                warning: Some(e.to_string()),
            }
        }
    }
}

/// Per-window state: the conversation, the selected platform and the posts
/// queued so far. Scheduled posts outlive conversation resets.
#[derive(Debug, Default)]
pub struct Session {
    conversation: Conversation,
    platform: Platform,
    scheduled: Vec<ScheduledPost>,
    in_flight: Option<String>,
}

impl Session {
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.is_some() {
            SessionState::AwaitingResponse
        } else if self.conversation.is_empty() {
            SessionState::Empty
        } else {
            SessionState::IdleWithHistory
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn scheduled_posts(&self) -> &[ScheduledPost] {
        &self.scheduled
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    /// Appends the user message and returns the prompt to send.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }

        let platform = self.platform;
        let user_message = Message {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: text.to_string(),
            platform,
            image_path: None,
            failure: None,
            created_at: self.next_timestamp(),
        };
        self.conversation.push(user_message.clone());

        let turn_id = Uuid::new_v4().to_string();
        self.in_flight = Some(turn_id.clone());

        Ok(PendingTurn {
            id: turn_id,
            conversation_id: self.conversation.id.clone(),
            prompt: compose_prompt(text, platform),
            platform,
            user_message,
        })
    }

    /// Appends the assistant message for `pending`. Returns `None` when the
    /// conversation was reset while the request was running.
    pub fn finish_turn(
        &mut self,
        pending: &PendingTurn,
        completion: Completion,
        image: Option<PathBuf>,
    ) -> Option<&Message> {
        if self.in_flight.as_deref() != Some(pending.id.as_str())
            || self.conversation.id != pending.conversation_id
        {
            tracing::info!("Dropping reply for a turn that is no longer current");
            return None;
        }
        self.in_flight = None;

        let assistant_message = Message {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            failure: completion.failure_kind(),
            content: completion.text().to_string(),
            platform: pending.platform,
            image_path: image,
            created_at: self.next_timestamp(),
        };
        self.conversation.push(assistant_message);
        self.conversation.messages().last()
    }

    /// The whole submit transition for callers that can await in place. The
    /// window splits it across the command runtime instead.
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        text: &str,
        client: &CompletionClient,
        picker: &AssetPicker,
    ) -> Result<TurnOutcome, SessionError> {
        let pending = self.begin_turn(text)?;
        let reply = fetch_reply(client, picker, pending.prompt.clone()).await;
        let message = self
            .finish_turn(&pending, reply.completion, reply.image)
            .cloned()
            .expect("turn stays current while the session is borrowed");

        Ok(TurnOutcome {
            message,
            warning: reply.warning,
        })
    }

    /// Starts a fresh conversation. Scheduled posts and the platform stay.
    pub fn reset(&mut self) {
        self.conversation = Conversation::new();
        self.in_flight = None;
    }

    pub fn schedule(&mut self, message_id: &str) -> Result<&ScheduledPost, SessionError> {
        let message = self
            .conversation
            .find(message_id)
            .ok_or(SessionError::MessageNotFound)?;
        if !message.is_schedulable() {
            return Err(SessionError::NotAssistantMessage);
        }

        let post = ScheduledPost::from_message(message, Local::now());
        tracing::info!(platform = post.platform.as_str(), "Scheduled post {}", post.id);
        self.scheduled.push(post);
        Ok(&self.scheduled[self.scheduled.len() - 1])
    }

    pub fn title(&self) -> Option<String> {
        self.conversation
            .first_user_message()
            .map(|m| truncate_title(&m.content))
    }

    fn next_timestamp(&self) -> DateTime<Local> {
        let now = Local::now();
        match self.conversation.messages().last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        }
    }
}

/// Truncate text to a short title.
pub fn truncate_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or(text);
    if first_line.chars().count() > 50 {
        let boundary = first_line
            .char_indices()
            .nth(47)
            .map(|(i, _)| i)
            .unwrap_or(first_line.len());
        format!("{}...", &first_line[..boundary])
    } else {
        first_line.to_string()
    }
}
