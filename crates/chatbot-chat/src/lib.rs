//! Conversation core for chatbot
//!
//! - [`store`]: the durable history file ([`HistoryStore`], [`FileHistoryStore`])
//! - [`session`]: the in-memory transcript with explicit start/finish
//! - [`driver`]: one user turn, from utterance to persisted reply
//! - [`view`]: the rendering seam the UI implements

pub mod driver;
pub mod error;
pub mod session;
pub mod store;
pub mod view;

pub use driver::{ConversationDriver, TurnOutcome, TurnState};
pub use error::StoreError;
pub use session::ChatSession;
pub use store::{FileHistoryStore, HistoryStore, Saved};
pub use view::{ChatView, IN_PROGRESS_MARKER};

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests;
