use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chatbot_llm_api::{FragmentStream, LlmClient};
use chatbot_types::Message;
use std::sync::{Arc, Mutex};

use crate::view::ChatView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Message(Message),
    Partial(String),
    Final(String),
    Error(String),
    Notice(String),
}

/// View that records every call
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Error(e) => Some(e.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn partials(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Partial(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatView for RecordingView {
    fn show_message(&mut self, message: &Message) {
        self.events.push(ViewEvent::Message(message.clone()));
    }

    fn show_partial_reply(&mut self, buffer: &str) {
        self.events.push(ViewEvent::Partial(buffer.to_string()));
    }

    fn show_final_reply(&mut self, buffer: &str) {
        self.events.push(ViewEvent::Final(buffer.to_string()));
    }

    fn show_error(&mut self, error: &str) {
        self.events.push(ViewEvent::Error(error.to_string()));
    }

    fn show_notice(&mut self, notice: &str) {
        self.events.push(ViewEvent::Notice(notice.to_string()));
    }
}

/// One scripted backend reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// The request itself fails
    RequestFails(String),
    /// Fragments, optionally followed by a stream error
    Stream {
        fragments: Vec<String>,
        error: Option<String>,
    },
}

impl Reply {
    pub fn text(fragments: &[&str]) -> Self {
        Reply::Stream {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            error: None,
        }
    }

    pub fn broken(fragments: &[&str], error: &str) -> Self {
        Reply::Stream {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            error: Some(error.to_string()),
        }
    }
}

/// Backend that plays back scripted replies and records every request
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: Arc<Mutex<Vec<Reply>>>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<Vec<Message>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn chat_streaming(&self, messages: &[Message]) -> Result<FragmentStream> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Reply::text(&[]));

        match reply {
            Reply::RequestFails(error) => Err(anyhow!(error)),
            Reply::Stream { fragments, error } => {
                let mut items: Vec<Result<String>> = fragments.into_iter().map(Ok).collect();
                if let Some(error) = error {
                    items.push(Err(anyhow!(error)));
                    // Anything after an error must never be consumed
                    items.push(Ok("unreachable".to_string()));
                }
                Ok(Box::pin(futures::stream::iter(items)))
            }
        }
    }
}
