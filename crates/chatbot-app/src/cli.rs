use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for chatbot
#[derive(Parser, Debug)]
#[command(name = "chatbot")]
#[command(about = "Chatbot - streaming terminal chat with persistent history")]
#[command(version)]
pub struct Cli {
    /// API key for the chat-completions backend
    #[arg(long, value_name = "KEY", env = "OPEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model to chat with
    #[arg(
        long,
        value_name = "MODEL",
        env = "CHATBOT_MODEL",
        default_value = chatbot_types::DEFAULT_MODEL
    )]
    pub model: String,

    /// Chat-completions endpoint (e.g., http://localhost:8080 for llama.cpp)
    #[arg(long, value_name = "URL", env = "CHATBOT_API_URL")]
    pub api_url: Option<String>,

    /// File holding the conversation history
    #[arg(
        long,
        value_name = "PATH",
        env = "CHATBOT_HISTORY_FILE",
        default_value = "chat_history.json"
    )]
    pub history_file: PathBuf,

    /// Env file loaded before reading the environment
    #[arg(long, value_name = "PATH", default_value = "example.env")]
    pub env_file: PathBuf,

    /// Record every message to a JSONL file under ~/.chatbot/logs
    #[arg(long)]
    pub log_conversation: bool,

    /// Enable verbose debug output (shows HTTP requests and stream chunks)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}
