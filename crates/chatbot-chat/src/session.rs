use chatbot_types::{Message, Transcript};

use crate::store::HistoryStore;
use crate::view::ChatView;

/// In-memory conversation for one run of the program.
///
/// Created by [`ChatSession::start`] from the history store and handed back
/// to it by [`ChatSession::finish`]. In between, the transcript only grows,
/// except for an explicit [`ChatSession::clear`].
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Transcript,
}

impl ChatSession {
    /// Load the persisted transcript and replay it to the view
    pub fn start<S: HistoryStore + ?Sized>(store: &S, view: &mut dyn ChatView) -> Self {
        let transcript = store.load(view);
        for message in &transcript {
            view.show_message(message);
        }
        Self { transcript }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub(crate) fn push_user(&mut self, content: &str) -> &Message {
        self.transcript.push_user(content);
        self.last_message()
    }

    pub(crate) fn push_assistant(&mut self, content: String) -> &Message {
        self.transcript.push_assistant(content);
        self.last_message()
    }

    fn last_message(&self) -> &Message {
        // Only called right after a push
        &self.transcript.messages()[self.transcript.len() - 1]
    }

    pub fn persist<S: HistoryStore + ?Sized>(&self, store: &S, view: &mut dyn ChatView) {
        store.save(&self.transcript, view);
    }

    /// Forget the whole conversation, in memory and on disk
    pub fn clear<S: HistoryStore + ?Sized>(&mut self, store: &S, view: &mut dyn ChatView) {
        self.transcript.clear();
        store.clear(view);
        view.show_notice("Chat history deleted");
    }

    /// Persist one last time and hand the transcript back
    pub fn finish<S: HistoryStore + ?Sized>(
        self,
        store: &S,
        view: &mut dyn ChatView,
    ) -> Transcript {
        self.persist(store, view);
        self.transcript
    }
}
