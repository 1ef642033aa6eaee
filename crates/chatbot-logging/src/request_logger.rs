use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;

use crate::{get_logs_dir, safe_truncate};

/// Longest body printed to the console before truncation
const MAX_CONSOLE_BODY: usize = 5000;

/// Show only the first few characters of a secret
pub fn mask_api_key(api_key: &str) -> String {
    format!("{}***", api_key.chars().take(6).collect::<String>())
}

fn describe_url(url: &str) -> Vec<(&'static str, String)> {
    match reqwest::Url::parse(url) {
        Ok(parsed) => vec![
            ("URL", url.to_string()),
            ("Host", parsed.host_str().unwrap_or("unknown").to_string()),
            (
                "Port",
                parsed
                    .port()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| {
                        if parsed.scheme() == "https" {
                            "443 (default)".to_string()
                        } else {
                            "80 (default)".to_string()
                        }
                    }),
            ),
            ("Scheme", parsed.scheme().to_string()),
        ],
        Err(_) => vec![("URL", url.to_string())],
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request<T: Serialize>(url: &str, request: &T, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    for (label, value) in describe_url(url) {
        println!("{}: {}", label.bright_yellow(), value);
    }

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Authorization: Bearer {}", mask_api_key(api_key));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            if json.chars().count() > MAX_CONSOLE_BODY {
                println!("{}", safe_truncate(&json, MAX_CONSOLE_BODY));
                let note = format!("... (truncated, total {} bytes)", json.len());
        println!("\n{}", note.bright_black());
            } else {
                println!("{}", json);
            }
        }
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP request to a timestamped file in the logs directory.
///
/// Returns the path written so callers can mention it.
pub fn log_request_to_file<T: Serialize>(
    url: &str,
    request: &T,
    model: &str,
    api_key: &str,
) -> Result<std::path::PathBuf> {
    let logs_dir = get_logs_dir()?;

    let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S%.3f");
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("req-{}-{}.txt", timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));

    for (label, value) in describe_url(url) {
        log_content.push_str(&format!("{}: {}\n", label, value));
    }
    log_content.push('\n');

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", mask_api_key(api_key)));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    Ok(file_path)
}

/// Log a non-success HTTP response (console output)
pub fn log_response(status: u16, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());
    println!("{}: {}", "Status".bright_yellow(), status);

    println!("\n{}", "Response Body:".bright_yellow());
    let shown = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json_val) => {
                serde_json::to_string_pretty(&json_val).unwrap_or_else(|_| body.to_string())
            }
        Err(_) => body.to_string(),
    };
    if shown.chars().count() > MAX_CONSOLE_BODY {
        println!("{}", safe_truncate(&shown, MAX_CONSOLE_BODY));
        println!("\n{}", format!("... (truncated, total {} bytes)", shown.len()).bright_black());
    } else {
        println!("{}", shown);
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log streaming chunk for debugging (console output)
pub fn log_stream_chunk(chunk_num: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", format!("📦 Stream Chunk #{}: {}", chunk_num,
        if data.chars().count() > 200 {
            format!("{}... ({} bytes)", safe_truncate(data, 200), data.len())
        } else {
            data.to_string()
        }
    ).bright_black());
}
