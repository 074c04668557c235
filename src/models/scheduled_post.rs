use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use super::platform::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: String,
    pub title: String,
    pub platform: Platform,
    pub content: String,
    pub image_path: Option<PathBuf>,
    pub scheduled_at: DateTime<Local>,
}

impl ScheduledPost {
    /// Snapshot an assistant message into a queued post.
    pub fn from_message(message: &Message, scheduled_at: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: format!("AI Generated Content - {}", message.platform.display_name()),
            platform: message.platform,
            content: message.content.clone(),
            image_path: message.image_path.clone(),
            scheduled_at,
        }
    }

    pub fn time_label(&self, now: DateTime<Local>) -> String {
        let elapsed = now.signed_duration_since(self.scheduled_at);
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            "Just now".to_string()
        } else if minutes == 1 {
            "1 minute ago".to_string()
        } else if minutes < 60 {
            format!("{} minutes ago", minutes)
        } else if elapsed.num_hours() == 1 {
            "1 hour ago".to_string()
        } else if elapsed.num_hours() < 24 {
            format!("{} hours ago", elapsed.num_hours())
        } else if elapsed.num_days() == 1 {
            "Yesterday".to_string()
        } else {
            self.scheduled_at.format("%b %d").to_string()
        }
    }
}
