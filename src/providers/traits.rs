use async_trait::async_trait;

use super::types::{CompletionRequest, ProviderError};

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the first choice's text, or the no-content fallback when the
    /// reply has no such path.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
