use chatbot_llm_api::{normalize_api_url, OPENAI_API_URL};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::Cli;

/// Fallback variable for the API key, checked after `OPEN_API_KEY`
pub const FALLBACK_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key configured: set OPEN_API_KEY (or OPENAI_API_KEY) or pass --api-key")]
    MissingApiKey,
}

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub history_file: PathBuf,
    pub log_conversation: bool,
    pub verbose: bool,
}

impl AppConfig {
    /// Precedence: CLI flag > `OPEN_API_KEY` > `OPENAI_API_KEY`
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = [cli.api_key.clone(), env::var(FALLBACK_API_KEY_VAR).ok()]
            .into_iter()
            .flatten()
            .find(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_url = cli
            .api_url
            .as_deref()
            .map(normalize_api_url)
            .unwrap_or_else(|| OPENAI_API_URL.to_string());

        Ok(Self {
            api_key,
            model: cli.model.clone(),
            api_url,
            history_file: cli.history_file.clone(),
            log_conversation: cli.log_conversation,
            verbose: cli.verbose,
        })
    }
}
