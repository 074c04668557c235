use chrono::{DateTime, Local};

use crate::models::{Conversation, Role, ScheduledPost};
use crate::services::markdown::extract_hashtags;
use crate::services::session::truncate_title;

pub fn export_scheduled_posts(posts: &[ScheduledPost], now: DateTime<Local>) -> String {
    let mut output = String::from("# Scheduled Posts\n\n");
    output.push_str(&format!(
        "> Exported: {} | Posts: {}\n\n",
        now.format("%Y-%m-%d %H:%M"),
        posts.len()
    ));

    for post in posts {
        output.push_str("---\n\n");
        output.push_str(&format!("## {}\n\n", post.title));
        output.push_str(&format!(
            "> Platform: {} | Scheduled: {}\n\n",
            post.platform.display_name(),
            post.scheduled_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(image) = &post.image_path {
            output.push_str(&format!("![Property image]({})\n\n", image.display()));
        }
        output.push_str(&format!("{}\n\n", post.content.trim_end()));
        let hashtags = extract_hashtags(&post.content);
        if !hashtags.is_empty() {
            output.push_str(&format!("_Hashtags: {}_\n\n", hashtags.join(" ")));
        }
    }

    output
}

pub fn export_conversation(conversation: &Conversation) -> String {
    let title = conversation
        .first_user_message()
        .map(|m| truncate_title(&m.content))
        .unwrap_or_else(|| "Conversation".to_string());
    let mut output = format!("# {}\n\n", title);
    output.push_str(&format!(
        "> Date: {}\n\n---\n\n",
        conversation.started_at.format("%Y-%m-%d %H:%M")
    ));

    for msg in conversation.messages() {
        let role_label = match msg.role {
            Role::User => "You".to_string(),
            Role::Assistant => format!("Alira ({})", msg.platform.display_name()),
        };
        output.push_str(&format!(
            "### {} · {}\n\n{}\n\n",
            role_label,
            msg.time_label(),
            msg.content
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::{Message, Platform};

    fn assistant(content: &str, platform: Platform) -> Message {
        Message {
            id: "m1".to_string(),
            role: Role::Assistant,
            content: content.to_string(),
            platform,
            image_path: Some(PathBuf::from("images/porch.png")),
            failure: None,
            created_at: Local::now(),
        }
    }

    #[test]
    fn test_scheduled_posts_export() {
        let now = Local::now();
        let posts = vec![
            ScheduledPost::from_message(&assistant("Sunny kitchen #Home", Platform::Facebook), now),
            ScheduledPost::from_message(&assistant("Corner office", Platform::LinkedIn), now),
        ];
        let output = export_scheduled_posts(&posts, now);

        assert!(output.starts_with("# Scheduled Posts\n\n"));
        assert!(output.contains("Posts: 2"));
        assert!(output.contains("## AI Generated Content - Facebook"));
        assert!(output.contains("## AI Generated Content - LinkedIn"));
        assert!(output.contains("Sunny kitchen #Home"));
        assert!(output.contains("_Hashtags: #Home_"));
        assert!(output.contains("![Property image](images/porch.png)"));
        assert!(output.find("Sunny kitchen").unwrap() < output.find("Corner office").unwrap());
    }

    #[test]
    fn test_empty_schedule_export() {
        let output = export_scheduled_posts(&[], Local::now());
        assert!(output.contains("Posts: 0"));
        assert!(!output.contains("---"));
    }

    #[test]
    fn test_conversation_export() {
        let mut conversation = Conversation::new();
        conversation.push(Message {
            role: Role::User,
            image_path: None,
            ..assistant("Lakefront cabin", Platform::Instagram)
        });
        conversation.push(assistant("Wake up to the water #LakeLife", Platform::Instagram));

        let output = export_conversation(&conversation);
        assert!(output.starts_with("# Lakefront cabin\n\n"));
        assert!(output.contains("### You"));
        assert!(output.contains("### Alira (Instagram)"));
        assert!(output.contains("Wake up to the water #LakeLife"));
    }
}
