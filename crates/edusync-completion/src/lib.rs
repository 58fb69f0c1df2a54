//! Completion gateway: the single seam between EduSync and the external
//! chat-completion API.
//!
//! Handlers depend on [`CompletionClient`] only, so tests can swap in a fake
//! and the production client can point at any OpenAI-compatible endpoint.

pub mod chat;
pub mod error;
pub mod prompts;

use async_trait::async_trait;

pub use chat::{ChatClientConfig, ChatCompletionClient};
pub use error::CompletionError;

/// One system-instruction + user-content exchange with a token budget.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub instruction: &'a str,
    pub content: &'a str,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the model's reply text with surrounding whitespace removed.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError>;
}
