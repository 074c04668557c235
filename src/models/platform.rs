use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Facebook,
    Instagram,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Facebook, Platform::Instagram, Platform::LinkedIn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Some(Platform::Facebook),
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::LinkedIn),
            _ => None,
        }
    }

    /// Instruction prepended to the user's property description.
    pub fn prompt_template(&self) -> &'static str {
        match self {
            Platform::Facebook => {
                "Generate a promotional real estate post for Facebook. Include a compelling \
                 paragraph (100-150 words) that highlights property features and neighborhood \
                 benefits. End with 3-4 relevant hashtags."
            }
            Platform::Instagram => {
                "Create an Instagram caption for a real estate property. Keep it under 100 words, \
                 engaging and visually descriptive. Include 5-7 trending real estate hashtags at \
                 the end."
            }
            Platform::LinkedIn => {
                "Craft a professional real estate listing for LinkedIn. Focus on investment \
                 potential, property specifications, and market analysis (100-150 words). \
                 Include 2-3 professional hashtags."
            }
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Platform::Facebook => "platform-facebook",
            Platform::Instagram => "platform-instagram",
            Platform::LinkedIn => "platform-linkedin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_every_platform() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_str(platform.as_str()), Some(platform));
            assert_eq!(Platform::from_str(platform.display_name()), Some(platform));
        }
        assert_eq!(Platform::from_str("myspace"), None);
    }

    #[test]
    fn test_default_is_facebook() {
        assert_eq!(Platform::default(), Platform::Facebook);
    }

    #[test]
    fn test_templates_name_their_platform() {
        for platform in Platform::ALL {
            assert!(platform.prompt_template().contains(platform.display_name()));
            assert!(!platform.prompt_template().contains("  "));
        }
    }
}
