pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{LLMError, LLMProvider, Result};
pub use providers::OpenAIProvider;
pub use types::LLMResponse;
