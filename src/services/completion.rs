use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::Completion;
use crate::providers::{CompletionProvider, CompletionRequest, GroqProvider, ProviderError};

/// Sends composed prompts to the configured provider and folds every outcome
/// into a `Completion`.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn CompletionProvider>,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, api_key: String, model: String) -> Self {
        Self {
            provider,
            api_key,
            model,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let provider = GroqProvider::new(config.api_url.clone(), config.request_timeout)?;
        Ok(Self::new(
            Arc::new(provider),
            config.api_key.clone(),
            config.model.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, prompt: String) -> Completion {
        let request = CompletionRequest {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            prompt,
        };

        match self.provider.complete(request).await {
            Ok(text) => Completion::Generated(text),
            Err(e) => {
                tracing::warn!("{} completion failed: {}", self.provider.name(), e);
                e.into()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays canned results and records the requests it was given.
    #[derive(Default)]
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("default reply".to_string()))
        }
    }

    pub fn client(provider: Arc<ScriptedProvider>) -> CompletionClient {
        CompletionClient::new(provider, "gsk_test".to_string(), "test-model".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{client, ScriptedProvider};
    use super::*;
    use crate::models::FailureKind;

    #[tokio::test]
    async fn test_success_is_generated() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("Charming bungalow".to_string())]));
        let completion = client(provider.clone()).generate("prompt".to_string()).await;

        assert_eq!(completion, Completion::Generated("Charming bungalow".to_string()));
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].api_key, "gsk_test");
        assert_eq!(requests[0].prompt, "prompt");
    }

    #[tokio::test]
    async fn test_status_error_is_tagged_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Status {
            status: 403,
            body: "forbidden".to_string(),
        })]));
        let completion = client(provider).generate("prompt".to_string()).await;

        assert_eq!(completion.failure_kind(), Some(FailureKind::Status(403)));
        assert!(completion.text().contains("403"));
        assert!(completion.text().contains("forbidden"));
    }
}
