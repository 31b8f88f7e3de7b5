//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::cli::ask::run_ask;
use crate::core::app::session::process_env;
use crate::core::app::{resolve_target, App, SessionError};
use crate::core::ask_service::ServiceTarget;
use crate::core::config::{Config, ConfigKey};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};

const DEFAULT_LOG_DIRECTIVE: &str = "rag_chat=info";

#[derive(Parser)]
#[command(name = "rag-chat")]
#[command(about = "A terminal chat client for a retrieval-augmented answer service")]
#[command(
    long_about = "rag-chat sends each question to an answer service and shows the reply, \
the documents it was drawn from, and how long the round trip took.\n\n\
Environment Variables:\n\
  RAG_CHAT_API_KEY   API key sent with every request (variable name is configurable)\n\
  RAG_CHAT_ENDPOINT  Answer service URL (overrides the config file)\n\n\
Controls:\n\
  Enter             Send the question\n\
  Shift/Alt+Enter   Insert a newline\n\
  Up/Down/PgUp/PgDn Scroll the conversation\n\
  Ctrl+L            Start a new conversation\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Answer service URL, overriding the environment and config file
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Write diagnostics to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let key = parse_key_or_exit(&key);
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let value = value.join(" ");
            config.set(key, value.clone());
            config.save()?;
            println!("✅ Set {} to: {}", key.as_str(), value);
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key_or_exit(&key);
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Ask { prompt } => {
            let config = Config::load()?;
            init_logging(LogTarget::Stderr);
            let target = resolve_target_or_exit(&config, args.endpoint.as_deref());
            run_ask(prompt, target).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            if let Some(path) = chat_log_path(args.log.as_deref(), &config) {
                init_logging(LogTarget::File(Path::new(path)));
            }
            let target = resolve_target_or_exit(&config, args.endpoint.as_deref());
            let app = App::new(&config, reqwest::Client::new(), target);
            run_chat(app).await
        }
    }
}

/// `--log` wins over the configured `log_file`.
fn chat_log_path<'a>(flag: Option<&'a str>, config: &'a Config) -> Option<&'a str> {
    flag.or(config.log_file.as_deref())
        .map(str::trim)
        .filter(|path| !path.is_empty())
}

fn init_logging(target: LogTarget<'_>) {
    if let Err(err) = init_tracing(target, DEFAULT_LOG_DIRECTIVE) {
        eprintln!("⚠️  {err}");
    }
}

fn parse_key_or_exit(key: &str) -> ConfigKey {
    match ConfigKey::parse(key) {
        Some(key) => key,
        None => {
            eprintln!("❌ Unknown config key: {key}");
            let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
            eprintln!("Available keys: {}", known.join(", "));
            std::process::exit(1);
        }
    }
}

fn resolve_target_or_exit(config: &Config, endpoint: Option<&str>) -> ServiceTarget {
    match resolve_target(config, endpoint, process_env) {
        Ok(target) => target,
        Err(err) => {
            warn!(error = %err, "startup configuration incomplete");
            report_session_error(&err);
            std::process::exit(1);
        }
    }
}

fn report_session_error(err: &SessionError) {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
}
