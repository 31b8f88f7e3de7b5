use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_API_KEY_HEADER, DEFAULT_GREETING, DEFAULT_TITLE,
};

/// On-disk settings. Every field is optional; accessors supply the defaults.
///
/// The API key itself is never stored here, only the name of the environment
/// variable it is read from.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the answer service, e.g. `https://example.execute-api.us-east-1.amazonaws.com/Prod/ask/`
    pub endpoint: Option<String>,
    /// Header carrying the API key (default `x-api-key`)
    pub api_key_header: Option<String>,
    /// Environment variable holding the API key (default `RAG_CHAT_API_KEY`)
    pub api_key_env: Option<String>,
    /// Seed record shown on start and after a reset
    pub greeting: Option<String>,
    /// Header title of the chat view
    pub title: Option<String>,
    /// Write diagnostics to this file while the chat view is open
    pub log_file: Option<String>,
}

/// Keys accepted by `rag-chat set` / `rag-chat unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    ApiKeyHeader,
    ApiKeyEnv,
    Greeting,
    Title,
    LogFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Endpoint,
        ConfigKey::ApiKeyHeader,
        ConfigKey::ApiKeyEnv,
        ConfigKey::Greeting,
        ConfigKey::Title,
        ConfigKey::LogFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::ApiKeyHeader => "api-key-header",
            ConfigKey::ApiKeyEnv => "api-key-env",
            ConfigKey::Greeting => "greeting",
            ConfigKey::Title => "title",
            ConfigKey::LogFile => "log-file",
        }
    }

    /// Accepts the kebab-case CLI name or the snake_case file field name.
    pub fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(&normalized))
    }
}

impl Config {
    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn api_key_header(&self) -> &str {
        self.api_key_header
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_HEADER)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn get(&self, key: ConfigKey) -> Option<&String> {
        self.slot(key).as_ref()
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    pub fn unset(&mut self, key: ConfigKey) {
        *self.slot_mut(key) = None;
    }

    fn slot(&self, key: ConfigKey) -> &Option<String> {
        match key {
            ConfigKey::Endpoint => &self.endpoint,
            ConfigKey::ApiKeyHeader => &self.api_key_header,
            ConfigKey::ApiKeyEnv => &self.api_key_env,
            ConfigKey::Greeting => &self.greeting,
            ConfigKey::Title => &self.title,
            ConfigKey::LogFile => &self.log_file,
        }
    }

    fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::Endpoint => &mut self.endpoint,
            ConfigKey::ApiKeyHeader => &mut self.api_key_header,
            ConfigKey::ApiKeyEnv => &mut self.api_key_env,
            ConfigKey::Greeting => &mut self.greeting,
            ConfigKey::Title => &mut self.title,
            ConfigKey::LogFile => &mut self.log_file,
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
