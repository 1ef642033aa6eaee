//! Terminal front end for chatbot: CLI, configuration, the colored
//! [`TerminalView`] and the REPL loop.

pub mod app;
pub mod cli;
pub mod config;
pub mod terminal_view;

pub use cli::Cli;
pub use config::{AppConfig, ConfigError};
pub use terminal_view::TerminalView;
