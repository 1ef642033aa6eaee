use anyhow::Result;
use chatbot_chat::{ConversationDriver, FileHistoryStore, TurnOutcome};
use chatbot_llm_api::{LlmClient, OpenAiClient};
use chatbot_logging::{get_logs_dir, ConversationLogger};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::AppConfig;
use crate::terminal_view::{TerminalView, USER_AVATAR};

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Nothing to do
    Empty,
    Exit,
    Clear,
    Help,
    Say(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => ReplCommand::Empty,
            "exit" | "quit" | "/exit" | "/quit" => ReplCommand::Exit,
            "/clear" => ReplCommand::Clear,
            "/help" => ReplCommand::Help,
            text => ReplCommand::Say(text.to_string()),
        }
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /clear                  - Delete the chat history");
    println!("  /help                   - Show this help");
    println!("  exit, quit, Ctrl-D      - Leave the chat");
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: AppConfig) -> Result<()> {
    println!("{}", "🤖 Chatbot".bright_cyan().bold());
    let summary = format!(
        "Model: {} • History: {}",
        config.model,
        config.history_file.display()
    );
    println!("{}", summary.bright_black());
    let hint = "Type 'exit' or 'quit' to exit, or '/help' to see available commands\n";
    println!("{}", hint.bright_black());

    let client = OpenAiClient::new(&config.api_key, &config.model, &config.api_url)
        .with_verbose(config.verbose);
    if config.verbose {
        println!("{}", format!("🔧 DEBUG: API URL: {}", client.api_url()).bright_black());
    }

    let mut view = TerminalView::stdout();
    let store = FileHistoryStore::new(&config.history_file);
    let mut driver = ConversationDriver::start(client, store, &mut view);

    if config.log_conversation {
        let logger = match get_logs_dir() {
            Ok(dir) => ConversationLogger::new(&dir).await,
            Err(e) => Err(e),
        };
        driver = match logger {
            Ok(logger) => {
                let note = format!("📝 Logging conversation to {}", logger.file_path().display());
                println!("{}", note.bright_black());
                driver.with_logger(logger)
            }
            Err(e) => {
                eprintln!("Logging disabled: {}", e);
                driver
            }
        };
    }

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} {} ", USER_AVATAR, "How can I help?".bright_green().bold());

    loop {
        driver.await_input();
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => match ReplCommand::parse(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Exit => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                ReplCommand::Clear => driver.clear_history(&mut view),
                ReplCommand::Help => print_help(),
                ReplCommand::Say(text) => {
                    let _ = rl.add_history_entry(text.as_str());
                    let outcome = driver.submit(&text, &mut view).await;
                    if config.verbose && matches!(outcome, TurnOutcome::Interrupted { .. }) {
                        let model = driver.client().model();
                        let note = format!("🔧 DEBUG: turn interrupted ({})", model);
                        println!("{}", note.bright_black());
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C (type 'exit' to quit)".bright_black());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    driver.finish(&mut view).await;
    Ok(())
}
