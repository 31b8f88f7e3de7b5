//! TUI-less "ask" command

use std::error::Error;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::api::Answer;
use crate::core::ask_service::{ask, ServiceTarget};
use crate::core::constants::REQUEST_FAILED_MESSAGE;
use crate::core::message::latency_millis;

pub async fn run_ask(prompt: Vec<String>, target: ServiceTarget) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: rag-chat ask <question>");
        std::process::exit(1);
    }

    let client = reqwest::Client::new();
    let started = Instant::now();
    match ask(&client, &target, &prompt).await {
        Ok(answer) => {
            let latency = started.elapsed();
            info!(latency_ms = latency_millis(latency), "answer received");
            for line in format_answer(&answer, latency) {
                println!("{line}");
            }
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "request failed");
            eprintln!("{REQUEST_FAILED_MESSAGE}");
            std::process::exit(1);
        }
    }
}

/// Plain-text rendering of an answer: text, then sources when present, then latency.
pub fn format_answer(answer: &Answer, latency: Duration) -> Vec<String> {
    let mut lines: Vec<String> = answer.text.lines().map(str::to_string).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    if !answer.sources.is_empty() {
        lines.push(String::new());
        lines.push("Sources:".to_string());
        lines.extend(answer.sources.iter().map(|source| format!("  • {source}")));
    }
    lines.push(String::new());
    lines.push(format!("{} ms", latency_millis(latency)));
    lines
}
