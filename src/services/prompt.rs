use crate::models::Platform;

pub const PROMPT_SEPARATOR: &str = " Based on this additional information: ";

/// Build the prompt sent to the model: the platform's instruction followed by
/// the user's description, untouched.
pub fn compose_prompt(free_text: &str, platform: Platform) -> String {
    let template = platform.prompt_template();
    let mut prompt = String::with_capacity(template.len() + PROMPT_SEPARATOR.len() + free_text.len());
    prompt.push_str(template);
    prompt.push_str(PROMPT_SEPARATOR);
    prompt.push_str(free_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_starts_with_template_and_ends_with_input() {
        let input = "4 bed colonial, walk to the lake, new roof 2022";
        for platform in Platform::ALL {
            let prompt = compose_prompt(input, platform);
            assert!(prompt.starts_with(platform.prompt_template()));
            assert!(prompt.ends_with(input));
            assert_eq!(
                prompt,
                format!("{}{}{}", platform.prompt_template(), PROMPT_SEPARATOR, input)
            );
        }
    }

    #[test]
    fn test_input_is_not_sanitized() {
        let input = "  <b>penthouse</b>\n\n#views  ";
        let prompt = compose_prompt(input, Platform::LinkedIn);
        assert!(prompt.ends_with(input));
    }

    #[test]
    fn test_platforms_produce_different_prompts() {
        let facebook = compose_prompt("loft", Platform::Facebook);
        let instagram = compose_prompt("loft", Platform::Instagram);
        assert_ne!(facebook, instagram);
        assert!(instagram.contains("5-7 trending real estate hashtags"));
    }
}
