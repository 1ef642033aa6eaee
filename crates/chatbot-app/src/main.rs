use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::io;
use std::process::ExitCode;

use chatbot::app::run_repl_mode;
use chatbot::{AppConfig, Cli};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // First pass only locates the env file; env-backed flags are re-read below
    let cli = Cli::parse();
    dotenvy::from_path(&cli.env_file).ok();
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".bright_red().bold(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    run_repl_mode(config).await?;
    Ok(ExitCode::SUCCESS)
}
