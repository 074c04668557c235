pub mod groq;
pub mod traits;
pub mod types;

pub use groq::GroqProvider;
pub use traits::CompletionProvider;
pub use types::{CompletionRequest, ProviderError};
