use chatbot_logging::ConversationLogger;
use chatbot_types::{Message, Role, Transcript};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::test_support::{RecordingView, Reply, ScriptedClient, ViewEvent};
use crate::{ConversationDriver, FileHistoryStore, HistoryStore, TurnOutcome, TurnState};

fn store_in(temp_dir: &TempDir) -> FileHistoryStore {
    FileHistoryStore::new(temp_dir.path().join("chat_history.json"))
}

fn start_driver(
    temp_dir: &TempDir,
    replies: Vec<Reply>,
) -> (ConversationDriver<ScriptedClient, FileHistoryStore>, ScriptedClient, RecordingView) {
    let client = ScriptedClient::new(replies);
    let mut view = RecordingView::default();
    let driver = ConversationDriver::start(client.clone(), store_in(temp_dir), &mut view);
    (driver, client, view)
}

#[tokio::test]
async fn test_successful_turn_appends_user_then_assistant() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, client, mut view) =
        start_driver(&temp_dir, vec![Reply::text(&["Hi", " there"])]);

    let outcome = driver.submit("Hello", &mut view).await;

    assert_eq!(outcome, TurnOutcome::Completed { reply: "Hi there".to_string() });
    let messages = driver.transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[messages.len() - 2].role, Role::User);
    assert_eq!(messages[messages.len() - 1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hi there");
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_turn_is_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["Pong"])]);

    driver.submit("Ping", &mut view).await;

    let persisted = store_in(&temp_dir).try_load().unwrap();
    assert_eq!(
        persisted,
        Transcript::from_messages(vec![Message::user("Ping"), Message::assistant("Pong")])
    );
}

#[tokio::test]
async fn test_view_sees_user_message_partials_then_final() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) =
        start_driver(&temp_dir, vec![Reply::text(&["Hel", "lo", "!"])]);

    driver.submit("Greet me", &mut view).await;

    assert_eq!(
        view.events,
        vec![
            ViewEvent::Message(Message::user("Greet me")),
            ViewEvent::Partial("Hel".to_string()),
            ViewEvent::Partial("Hello".to_string()),
            ViewEvent::Partial("Hello!".to_string()),
            ViewEvent::Final("Hello!".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_stream_error_keeps_partial_reply() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) =
        start_driver(&temp_dir, vec![Reply::broken(&["Hel", "lo"], "connection reset")]);

    let outcome = driver.submit("Say hello", &mut view).await;

    match outcome {
        TurnOutcome::Interrupted { reply, error } => {
            assert_eq!(reply, "Hello");
            assert!(error.contains("connection reset"));
        }
        other => panic!("expected an interrupted turn, got {:?}", other),
    }

    let persisted = store_in(&temp_dir).try_load().unwrap();
    assert_eq!(persisted.last(), Some(&Message::assistant("Hello")));
    assert_eq!(persisted.len(), 2);

    assert_eq!(view.partials(), vec!["Hel", "Hello"]);
    assert_eq!(view.errors(), vec!["Error in chat response: connection reset"]);
    assert!(view.events.contains(&ViewEvent::Final("Hello".to_string())));
}

#[tokio::test]
async fn test_request_failure_records_empty_reply() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) =
        start_driver(&temp_dir, vec![Reply::RequestFails("invalid api key".to_string())]);

    let outcome = driver.submit("Anyone there?", &mut view).await;

    assert_eq!(
        outcome,
        TurnOutcome::Interrupted {
            reply: String::new(),
            error: "invalid api key".to_string(),
        }
    );
    let persisted = store_in(&temp_dir).try_load().unwrap();
    assert_eq!(
        persisted,
        Transcript::from_messages(vec![Message::user("Anyone there?"), Message::assistant("")])
    );
    assert_eq!(driver.state(), TurnState::Idle);
}

#[tokio::test]
async fn test_empty_utterance_does_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["unused"])]);

    assert_eq!(driver.submit("", &mut view).await, TurnOutcome::Skipped);
    assert_eq!(driver.submit("   \n", &mut view).await, TurnOutcome::Skipped);

    assert!(driver.transcript().is_empty());
    assert_eq!(client.request_count(), 0);
    assert!(view.events.is_empty());
    assert!(!store_in(&temp_dir).path().exists());
}

#[tokio::test]
async fn test_full_transcript_is_sent_as_context() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, client, mut view) =
        start_driver(&temp_dir, vec![Reply::text(&["One"]), Reply::text(&["Two"])]);

    driver.submit("First", &mut view).await;
    driver.submit("Second", &mut view).await;

    assert_eq!(
        client.last_request().unwrap(),
        vec![
            Message::user("First"),
            Message::assistant("One"),
            Message::user("Second"),
        ]
    );
    assert_eq!(driver.transcript().len(), 4);
}

#[tokio::test]
async fn test_turn_walks_every_state() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["ok"])]);

    assert_eq!(driver.state(), TurnState::Idle);
    driver.await_input();
    assert_eq!(driver.state(), TurnState::AwaitingInput);

    driver.submit("go", &mut view).await;

    assert_eq!(
        driver.turn_trace(),
        &[
            TurnState::Idle,
            TurnState::AwaitingInput,
            TurnState::UserAppended,
            TurnState::Streaming,
            TurnState::AssistantAppended,
            TurnState::Persisted,
            TurnState::Idle,
        ]
    );
}

#[tokio::test]
async fn test_skipped_turn_returns_to_idle() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) = start_driver(&temp_dir, vec![]);

    driver.submit(" ", &mut view).await;

    assert_eq!(
        driver.turn_trace(),
        &[TurnState::Idle, TurnState::AwaitingInput, TurnState::Idle]
    );
}

#[tokio::test]
async fn test_start_replays_persisted_history() {
    let temp_dir = TempDir::new().unwrap();
    let history = Transcript::from_messages(vec![
        Message::user("old question"),
        Message::assistant("old answer"),
    ]);
    store_in(&temp_dir).try_save(&history).unwrap();

    let (driver, _client, view) = start_driver(&temp_dir, vec![]);

    assert_eq!(driver.transcript(), &history);
    assert_eq!(
        view.events,
        vec![
            ViewEvent::Message(Message::user("old question")),
            ViewEvent::Message(Message::assistant("old answer")),
        ]
    );
}

#[tokio::test]
async fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let (mut driver, _client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["4"])]);
        driver.submit("2+2?", &mut view).await;
        driver.finish(&mut view).await;
    }

    let (mut driver, client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["8"])]);
    assert_eq!(driver.transcript().len(), 2);

    driver.submit("4+4?", &mut view).await;
    assert_eq!(client.last_request().unwrap().len(), 3);
    assert_eq!(store_in(&temp_dir).try_load().unwrap().len(), 4);
}

#[tokio::test]
async fn test_clear_history_empties_memory_and_disk() {
    let temp_dir = TempDir::new().unwrap();
    let (mut driver, _client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["hi"])]);
    driver.submit("hello", &mut view).await;

    driver.clear_history(&mut view);

    assert!(driver.transcript().is_empty());
    assert!(store_in(&temp_dir).try_load().unwrap().is_empty());
    assert_eq!(
        view.events.last(),
        Some(&ViewEvent::Notice("Chat history deleted".to_string()))
    );
}

#[tokio::test]
async fn test_store_failure_does_not_abort_turn() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let client = ScriptedClient::new(vec![Reply::text(&["still here"])]);
    let mut view = RecordingView::default();
    let store = FileHistoryStore::new(blocker.join("chat_history.json"));
    let mut driver = ConversationDriver::start(client, store, &mut view);

    let outcome = driver.submit("hello", &mut view).await;

    assert_eq!(outcome, TurnOutcome::Completed { reply: "still here".to_string() });
    assert_eq!(driver.transcript().len(), 2);
    assert_eq!(driver.state(), TurnState::Idle);
    // One failed load at start, one failed save after the turn
    assert_eq!(view.errors().len(), 2);
}

#[tokio::test]
async fn test_conversation_logger_records_turn() {
    let temp_dir = TempDir::new().unwrap();
    let logger = ConversationLogger::new(&temp_dir.path().join("logs")).await.unwrap();
    let log_path = logger.file_path().to_path_buf();

    let (driver, _client, mut view) = start_driver(&temp_dir, vec![Reply::text(&["logged"])]);
    let mut driver = driver.with_logger(logger);

    driver.submit("log this", &mut view).await;
    driver.finish(&mut view).await;

    let lines: Vec<serde_json::Value> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["role"], "user");
    assert_eq!(lines[1]["content"], "logged");
    assert_eq!(lines[1]["model"], "scripted-model");
}
