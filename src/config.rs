use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Platform;

pub const APP_ID: &str = "com.alira.Alira";
pub const APP_NAME: &str = "Alira";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const KEYRING_KEY_REF: &str = "groq";

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_USER_NAME: &str = "Sarah Mitchell";
pub const DEFAULT_USER_ROLE: &str = "Senior Real Estate Agent";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key found: set GROQ_API_KEY or store one in the keyring with --save-api-key")]
    MissingApiKey,

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Optional overrides read from `settings.json` in the user config dir.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub images_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
    pub default_platform: Option<String>,
}

impl FileSettings {
    pub fn default_path() -> PathBuf {
        glib::user_config_dir().join("alira").join("settings.json")
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub images_dir: PathBuf,
    pub request_timeout: Duration,
    pub user_name: String,
    pub user_role: String,
    pub platform: Platform,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("images_dir", &self.images_dir)
            .field("request_timeout", &self.request_timeout)
            .field("user_name", &self.user_name)
            .field("user_role", &self.user_role)
            .field("platform", &self.platform)
            .finish()
    }
}

impl AppConfig {
    /// Environment beats the settings file, which beats the defaults. The API
    /// key comes from the environment first and the keyring second.
    pub fn resolve<F>(
        settings: FileSettings,
        env: F,
        keyring_secret: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_empty(env(API_KEY_ENV))
            .or_else(|| non_empty(keyring_secret))
            .ok_or(ConfigError::MissingApiKey)?;

        let api_url = non_empty(env("ALIRA_API_URL"))
            .or(settings.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_url(&api_url)?;

        let model = non_empty(env("ALIRA_MODEL"))
            .or(settings.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let images_dir = non_empty(env("ALIRA_IMAGES_DIR"))
            .map(PathBuf::from)
            .or(settings.images_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR));

        let timeout_secs = match non_empty(env("ALIRA_REQUEST_TIMEOUT_SECS")) {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "ALIRA_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            None => settings.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "request_timeout_secs",
                value: "0".to_string(),
            });
        }

        let platform = match settings.default_platform {
            Some(name) => Platform::from_str(&name).ok_or(ConfigError::InvalidValue {
                name: "default_platform",
                value: name.clone(),
            })?,
            None => Platform::default(),
        };

        Ok(Self {
            api_key,
            api_url,
            model,
            images_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            user_name: settings
                .user_name
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            user_role: settings
                .user_role
                .unwrap_or_else(|| DEFAULT_USER_ROLE.to_string()),
            platform,
        })
    }

    pub fn user_initials(&self) -> String {
        self.user_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_env_key() {
        let config =
            AppConfig::resolve(FileSettings::default(), env_from(&[(API_KEY_ENV, "gsk_1")]), None)
                .unwrap();
        assert_eq!(config.api_key, "gsk_1");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.images_dir, PathBuf::from("images"));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.user_initials(), "SM");
        assert_eq!(config.platform, Platform::Facebook);
    }

    #[test]
    fn test_default_platform_from_settings() {
        let settings = FileSettings {
            default_platform: Some("LinkedIn".to_string()),
            ..Default::default()
        };
        let config =
            AppConfig::resolve(settings, env_from(&[(API_KEY_ENV, "k")]), None).unwrap();
        assert_eq!(config.platform, Platform::LinkedIn);

        let settings = FileSettings {
            default_platform: Some("tiktok".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(settings, env_from(&[(API_KEY_ENV, "k")]), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "default_platform", .. }));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = AppConfig::resolve(FileSettings::default(), env_from(&[]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = AppConfig::resolve(
            FileSettings::default(),
            env_from(&[(API_KEY_ENV, "   ")]),
            Some(String::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_keyring_secret_used_when_env_missing() {
        let config = AppConfig::resolve(
            FileSettings::default(),
            env_from(&[]),
            Some("gsk_keyring".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_key, "gsk_keyring");
    }

    #[test]
    fn test_env_overrides_settings_file() {
        let settings = FileSettings {
            model: Some("llama-file".to_string()),
            images_dir: Some(PathBuf::from("/srv/listing-photos")),
            request_timeout_secs: Some(15),
            ..Default::default()
        };
        let config = AppConfig::resolve(
            settings,
            env_from(&[
                (API_KEY_ENV, "gsk_1"),
                ("ALIRA_MODEL", "llama-env"),
                ("ALIRA_REQUEST_TIMEOUT_SECS", "30"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.model, "llama-env");
        assert_eq!(config.images_dir, PathBuf::from("/srv/listing-photos"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_bad_url_and_timeout() {
        let err = AppConfig::resolve(
            FileSettings::default(),
            env_from(&[(API_KEY_ENV, "k"), ("ALIRA_API_URL", "ftp://example.com/x")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = AppConfig::resolve(
            FileSettings::default(),
            env_from(&[(API_KEY_ENV, "k"), ("ALIRA_REQUEST_TIMEOUT_SECS", "soon")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_settings_file_missing_or_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(FileSettings::load_from(&path).unwrap().model.is_none());

        std::fs::write(&path, r#"{"model": "llama-3.3-70b-versatile", "user_name": "Ana Ruiz"}"#)
            .unwrap();
        let settings = FileSettings::load_from(&path).unwrap();
        assert_eq!(settings.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(settings.user_name.as_deref(), Some("Ana Ruiz"));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileSettings::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
