use chatbot_llm_api::LlmClient;
use chatbot_logging::ConversationLogger;
use chatbot_types::Transcript;
use futures::StreamExt;

use crate::session::ChatSession;
use crate::store::HistoryStore;
use crate::view::ChatView;

/// Where the driver is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingInput,
    UserAppended,
    Streaming,
    AssistantAppended,
    Persisted,
}

/// How a submitted utterance ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input: nothing appended, backend not called
    Skipped,
    Completed { reply: String },
    /// The backend failed; `reply` is whatever arrived before the failure
    Interrupted { reply: String, error: String },
}

/// Runs turns of the conversation: user utterance in, streamed reply out,
/// transcript persisted after every turn.
pub struct ConversationDriver<C, S> {
    client: C,
    store: S,
    session: ChatSession,
    state: TurnState,
    trace: Vec<TurnState>,
    logger: Option<ConversationLogger>,
}

impl<C: LlmClient, S: HistoryStore> ConversationDriver<C, S> {
    /// Open the session: load and replay the persisted history
    pub fn start(client: C, store: S, view: &mut dyn ChatView) -> Self {
        let session = ChatSession::start(&store, view);
        Self {
            client,
            store,
            session,
            state: TurnState::Idle,
            trace: vec![TurnState::Idle],
            logger: None,
        }
    }

    /// Mirror every appended message into a JSONL conversation log
    pub fn with_logger(mut self, logger: ConversationLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// States visited by the most recent turn, starting from `Idle`
    pub fn turn_trace(&self) -> &[TurnState] {
        &self.trace
    }

    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn enter(&mut self, state: TurnState) {
        self.state = state;
        self.trace.push(state);
    }

    /// The UI is about to read the next utterance
    pub fn await_input(&mut self) {
        self.trace.clear();
        self.trace.push(self.state);
        self.enter(TurnState::AwaitingInput);
    }

    /// Run one full turn for `utterance`
    pub async fn submit(&mut self, utterance: &str, view: &mut dyn ChatView) -> TurnOutcome {
        if self.state != TurnState::AwaitingInput {
            self.await_input();
        }

        if utterance.trim().is_empty() {
            self.enter(TurnState::Idle);
            return TurnOutcome::Skipped;
        }

        let model = self.client.model().to_string();

        let message = self.session.push_user(utterance);
        view.show_message(message);
        if let Some(logger) = &mut self.logger {
            logger.log_message(message, None).await;
        }
        self.enter(TurnState::UserAppended);

        self.enter(TurnState::Streaming);
        let (reply, error) = self.stream_reply(view).await;
        view.show_final_reply(&reply);
        if let Some(error) = &error {
            view.show_error(&format!("Error in chat response: {}", error));
        }

        let message = self.session.push_assistant(reply.clone());
        if let Some(logger) = &mut self.logger {
            logger.log_message(message, Some(&model)).await;
        }
        self.enter(TurnState::AssistantAppended);

        self.session.persist(&self.store, view);
        self.enter(TurnState::Persisted);
        self.enter(TurnState::Idle);

        match error {
            None => TurnOutcome::Completed { reply },
            Some(error) => TurnOutcome::Interrupted { reply, error },
        }
    }

    /// Pull fragments until the stream ends or fails.
    ///
    /// Returns the accumulated text and, on failure, the error message.
    async fn stream_reply(&self, view: &mut dyn ChatView) -> (String, Option<String>) {
        let mut buffer = String::new();

        let mut fragments = match self
            .client
            .chat_streaming(self.session.transcript().messages())
            .await
        {
            Ok(fragments) => fragments,
            Err(e) => return (buffer, Some(format!("{:#}", e))),
        };

        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    buffer.push_str(&fragment);
                    view.show_partial_reply(&buffer);
                }
                Err(e) => return (buffer, Some(format!("{:#}", e))),
            }
        }

        (buffer, None)
    }

    /// Delete the conversation, in memory and on disk
    pub fn clear_history(&mut self, view: &mut dyn ChatView) {
        self.session.clear(&self.store, view);
    }

    /// Close the session: persist one last time and flush the log
    pub async fn finish(mut self, view: &mut dyn ChatView) -> Transcript {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
        self.session.finish(&self.store, view)
    }
}
