pub mod assets;
pub mod completion;
pub mod export;
pub mod keyring;
pub mod markdown;
pub mod prompt;
pub mod session;

pub use assets::AssetPicker;
pub use completion::CompletionClient;
pub use session::Session;
