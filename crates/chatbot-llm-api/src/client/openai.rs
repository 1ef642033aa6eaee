use anyhow::Result;
use async_stream::stream;
use async_trait::async_trait;
use chatbot_logging::{
    log_request, log_request_to_file, log_response, log_stream_chunk, safe_truncate,
};
use chatbot_types::Message;
use colored::Colorize;
use futures_util::StreamExt;

use crate::client::{ApiError, FragmentStream, LlmClient};
use crate::models::ChatRequest;
use crate::sse::{parse_stream_data, SseDecoder, StreamEvent};

const BODY_PREVIEW_BYTES: usize = 512;

/// Client for OpenAI and OpenAI-compatible chat-completions endpoints
pub struct OpenAiClient {
    api_key: String,
    model: String,
    api_url: String,
    verbose: bool,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// `api_url` must be the full chat-completions URL; see [`crate::normalize_api_url`]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            api_url: api_url.into(),
            verbose: false,
            client: reqwest::Client::new(),
        }
    }

    /// Print request and stream diagnostics to the console
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_streaming(&self, messages: &[Message]) -> Result<FragmentStream> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        log_request(&self.api_url, &request, &self.api_key, self.verbose);
        if self.verbose {
            match log_request_to_file(&self.api_url, &request, &self.model, &self.api_key) {
                Ok(path) => {
                    let note = format!("📝 Request logged to: {}", path.display());
                    println!("{}", note.bright_blue());
                }
                Err(e) => eprintln!("{} {}", "Request log failed:".yellow(), e),
            }
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            log_response(status.as_u16(), &body, self.verbose);
            return Err(ApiError::Status { status: status.as_u16(), body }.into());
        }

        let verbose = self.verbose;
        let mut byte_stream = response.bytes_stream();

        let fragments = stream! {
            let mut decoder = SseDecoder::new();
            let mut chunk_counter = 0;
            let mut finished = false;
            // Start of the body, kept to describe a response that is not SSE
            let mut head = Vec::new();

            while !finished {
                let payloads = match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        if chunk_counter == 0 && head.len() < BODY_PREVIEW_BYTES {
                            let room = BODY_PREVIEW_BYTES - head.len();
                            head.extend_from_slice(&bytes[..bytes.len().min(room)]);
                        }
                        decoder.push(&bytes)
                    }
                    Some(Err(e)) => {
                        yield Err(anyhow::Error::from(ApiError::Transport(e)));
                        return;
                    }
                    None => {
                        finished = true;
                        decoder.finish().into_iter().collect()
                    }
                };

                for data in payloads {
                    chunk_counter += 1;
                    log_stream_chunk(chunk_counter, &data, verbose);

                    match parse_stream_data(&data) {
                        Ok(StreamEvent::Fragment(text)) => {
                            yield Ok(text);
                        }
                        Ok(StreamEvent::Done) => {
                            finished = true;
                            break;
                        }
                        Ok(StreamEvent::Error(message)) => {
                            yield Err(anyhow::Error::from(ApiError::Stream(message)));
                            finished = true;
                            break;
                        }
                        Ok(StreamEvent::Empty) => {}
                        Err(e) => {
                            let message = format!(
                                "unreadable stream event ({}): {}",
                                e,
                                safe_truncate(&data, 200)
                            );
                            yield Err(anyhow::Error::from(ApiError::Stream(message)));
                            finished = true;
                            break;
                        }
                    }
                }
            }

            if chunk_counter == 0 {
                let body = String::from_utf8_lossy(&head);
                let message = format!(
                    "response is not an event stream: {}",
                    safe_truncate(body.trim(), 200)
                );
                yield Err(anyhow::Error::from(ApiError::Stream(message)));
            }
        };

        Ok(Box::pin(fragments))
    }
}
