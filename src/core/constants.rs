//! Shared constants used across the application

/// Seed record for a fresh or reset transcript.
pub const DEFAULT_GREETING: &str =
    "Hi! Ask me a technical question. I’ll use the knowledge base (RAG) when relevant.";

/// Text carried by the in-flight assistant placeholder.
pub const PENDING_PLACEHOLDER: &str = "Thinking... retrieving relevant context";

/// Shown when a successful response has no usable `response` field.
pub const NO_RESPONSE_FALLBACK: &str = "No response received.";

/// Shown for every failed request, whatever the cause.
pub const REQUEST_FAILED_MESSAGE: &str =
    "Something went wrong on the Server. Please try again in a moment.";

pub const DEFAULT_TITLE: &str = "AI Cloud Assistant";

pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_API_KEY_ENV: &str = "RAG_CHAT_API_KEY";

pub const ENDPOINT_ENV: &str = "RAG_CHAT_ENDPOINT";

pub const INPUT_PLACEHOLDER: &str = "Ask a technical question...";

/// Tallest the input box grows before it scrolls internally.
pub const MAX_INPUT_LINES: u16 = 6;

/// One step of the "Thinking" dots animation.
pub const THINKING_FRAME_MS: u128 = 500;
