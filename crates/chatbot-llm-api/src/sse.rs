//! Server-sent events framing for streamed chat completions.

use crate::models::StreamChunk;

/// What a single `data:` payload means for the reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of reply text
    Fragment(String),
    /// The server announced the end of the stream
    Done,
    /// The server reported an error in place of a chunk
    Error(String),
    /// A valid chunk carrying no text (role announcement, finish reason, ...)
    Empty,
}

/// Incremental SSE decoder.
///
/// Network chunks may split lines (and multi-byte characters) anywhere, so
/// raw bytes are buffered until a full line is available. Each dispatched
/// event is the `data:` payload of one SSE event, multi-line data joined
/// with `\n`.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns the payloads of every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush whatever is left once the byte stream has ended
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            let value = rest.strip_prefix(' ').unwrap_or(rest);
            self.data_lines.push(value.to_string());
        }
        // event:, id: and retry: fields carry nothing we use
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(data)
    }
}

/// Interpret one event payload.
///
/// A payload that is neither `[DONE]` nor a chat-completions chunk is an error.
pub fn parse_stream_data(data: &str) -> Result<StreamEvent, serde_json::Error> {
    if data.trim() == "[DONE]" {
        return Ok(StreamEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data)?;

    if let Some(error) = chunk.error {
        return Ok(StreamEvent::Error(error.message));
    }

    let event = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
        .map(StreamEvent::Fragment)
        .unwrap_or(StreamEvent::Empty);

    Ok(event)
}
