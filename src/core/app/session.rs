use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::ask_service::{AskParams, ServiceTarget};
use crate::core::config::Config;
use crate::core::constants::ENDPOINT_ENV;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("❌ No answer service endpoint configured")]
    MissingEndpoint,
    #[error("❌ {var} environment variable not set")]
    MissingApiKey { var: String },
}

impl SessionError {
    pub fn quick_fixes(&self) -> Vec<String> {
        match self {
            SessionError::MissingEndpoint => vec![
                "rag-chat set endpoint https://your-api.example.com/ask".to_string(),
                format!("export {ENDPOINT_ENV}=\"https://your-api.example.com/ask\""),
                "rag-chat --endpoint https://your-api.example.com/ask".to_string(),
            ],
            SessionError::MissingApiKey { var } => {
                vec![format!("export {var}=\"your-api-key-here\"")]
            }
        }
    }
}

/// Resolve where requests go. The endpoint comes from the command line, then
/// the environment, then the config file; the key only ever comes from the
/// environment.
pub fn resolve_target<F>(
    config: &Config,
    endpoint_override: Option<&str>,
    env: F,
) -> Result<ServiceTarget, SessionError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = endpoint_override
        .map(str::to_string)
        .or_else(|| env(ENDPOINT_ENV))
        .or_else(|| config.endpoint.clone())
        .map(|endpoint| endpoint.trim().to_string())
        .filter(|endpoint| !endpoint.is_empty())
        .ok_or(SessionError::MissingEndpoint)?;

    let var = config.api_key_env();
    let api_key = env(var)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| SessionError::MissingApiKey {
            var: var.to_string(),
        })?;

    Ok(ServiceTarget {
        endpoint,
        api_key_header: config.api_key_header().to_string(),
        api_key,
    })
}

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub struct SessionContext {
    pub client: Client,
    pub target: ServiceTarget,
    pub request_cancel_token: Option<CancellationToken>,
    last_request_id: u64,
}

impl SessionContext {
    pub fn new(client: Client, target: ServiceTarget) -> Self {
        Self {
            client,
            target,
            request_cancel_token: None,
            last_request_id: 0,
        }
    }

    pub fn next_request_id(&mut self) -> u64 {
        self.last_request_id = self.last_request_id.wrapping_add(1);
        self.last_request_id
    }

    pub fn build_ask_params(&mut self, prompt: String, request_id: u64) -> AskParams {
        let cancel_token = CancellationToken::new();
        self.request_cancel_token = Some(cancel_token.clone());
        AskParams {
            client: self.client.clone(),
            target: self.target.clone(),
            prompt,
            cancel_token,
            request_id,
        }
    }

    pub fn cancel_current_request(&mut self) {
        if let Some(token) = self.request_cancel_token.take() {
            token.cancel();
        }
    }

    pub fn clear_cancel_token(&mut self) {
        self.request_cancel_token = None;
    }
}
