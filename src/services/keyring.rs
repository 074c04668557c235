use std::sync::Arc;

use anyhow::{Context, Result};
use oo7::Keyring;

use crate::config::APP_ID;

const KEYRING_ATTR_APP: &str = "application";
const KEYRING_ATTR_REF: &str = "key-ref";

#[derive(Debug, Clone)]
pub struct KeyringService {
    keyring: Arc<Keyring>,
}

impl KeyringService {
    pub async fn new() -> Result<Self> {
        let keyring = Keyring::new()
            .await
            .context("Failed to initialize keyring")?;
        Ok(Self {
            keyring: Arc::new(keyring),
        })
    }

    pub async fn store(&self, key_ref: &str, secret: &str) -> Result<()> {
        let attributes = Self::attributes(key_ref);
        let attr_refs: Vec<(&str, &str)> =
            attributes.iter().map(|(k, v)| (*k, v.as_str())).collect();

        self.keyring
            .create_item(
                &format!("Alira API Key - {}", key_ref),
                &attr_refs,
                secret,
                true,
            )
            .await
            .context("Failed to store API key in keyring")?;

        Ok(())
    }

    pub async fn retrieve(&self, key_ref: &str) -> Result<Option<String>> {
        let attributes = Self::attributes(key_ref);
        let attr_refs: Vec<(&str, &str)> =
            attributes.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let items = self
            .keyring
            .search_items(&attr_refs)
            .await
            .context("Failed to search keyring")?;

        let Some(item) = items.first() else {
            return Ok(None);
        };
        let secret = item.secret().await.context("Failed to read API key")?;
        let secret = String::from_utf8(secret.to_vec()).context("API key is not valid UTF-8")?;
        Ok(Some(secret))
    }

    fn attributes(key_ref: &str) -> Vec<(&'static str, String)> {
        vec![
            (KEYRING_ATTR_APP, APP_ID.to_string()),
            (KEYRING_ATTR_REF, key_ref.to_string()),
        ]
    }
}

/// Reads a secret from the keyring outside of any async runtime, for use
/// before the UI starts. Keyring failures are logged and treated as "absent".
pub fn retrieve_blocking(key_ref: &str) -> Option<String> {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::warn!("Could not start runtime for keyring lookup: {}", e);
            return None;
        }
    };

    let result = runtime.block_on(async {
        let keyring = KeyringService::new().await?;
        keyring.retrieve(key_ref).await
    });

    match result {
        Ok(secret) => secret,
        Err(e) => {
            tracing::warn!("Keyring lookup failed: {:#}", e);
            None
        }
    }
}

pub fn store_blocking(key_ref: &str, secret: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime for keyring")?;

    runtime.block_on(async {
        let keyring = KeyringService::new().await?;
        keyring.store(key_ref, secret).await
    })
}
