use anyhow::Result;
use async_trait::async_trait;
use chatbot_types::Message;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

/// Lazy, finite, non-restartable sequence of reply text fragments.
///
/// An `Err` item ends the reply; fragments yielded before it are valid.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Failures talking to the chat backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("stream error: {0}")]
    Stream(String),
}

/// LLM client trait - the backend seam used by the conversation driver
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Send the full transcript and return the streamed reply
    async fn chat_streaming(&self, messages: &[Message]) -> Result<FragmentStream>;
}
