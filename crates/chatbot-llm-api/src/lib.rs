//! # chatbot-llm-api
//!
//! Streaming access to OpenAI-compatible chat-completions endpoints.
//!
//! - **`LlmClient`**: the backend seam; one call takes the whole transcript
//!   and returns a [`FragmentStream`] of reply text.
//! - **`OpenAiClient`**: the HTTP implementation (`stream: true`, SSE body).
//! - **`SseDecoder`**: incremental server-sent-events framing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatbot_llm_api::{LlmClient, OpenAiClient, OPENAI_API_URL};
//! use chatbot_types::Message;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OpenAiClient::new("your-api-key", "gpt-3.5-turbo", OPENAI_API_URL);
//!     let mut fragments = client.chat_streaming(&[Message::user("Hello!")]).await?;
//!     while let Some(fragment) = fragments.next().await {
//!         print!("{}", fragment?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod models;
pub mod sse;

pub use client::{ApiError, FragmentStream, LlmClient, OpenAiClient};
pub use config::{normalize_api_url, OPENAI_API_URL};
pub use sse::{parse_stream_data, SseDecoder, StreamEvent};
