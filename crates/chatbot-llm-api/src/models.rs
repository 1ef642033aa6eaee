use chatbot_types::Message;
use serde::{Deserialize, Serialize};

/// Chat-completions request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

// ============================================================================
// Streaming Response Structures
// ============================================================================

/// Streaming chunk from chat API
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default)]
    pub error: Option<StreamErrorBody>,
}

/// Choice structure within streaming chunk
#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    pub delta: StreamDelta,
}

/// Delta structure within streaming choice
#[derive(Debug, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object some servers send in place of a chunk
#[derive(Debug, Deserialize)]
pub struct StreamErrorBody {
    #[serde(default)]
    pub message: String,
}
