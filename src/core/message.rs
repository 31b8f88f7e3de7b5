use std::time::Duration;

use crate::core::constants::PENDING_PLACEHOLDER;

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn latency_millis(latency: Duration) -> u64 {
    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

/// A single record in the transcript.
///
/// `latency_ms` and `sources` are only populated on an assistant record that
/// settled successfully; the pending placeholder and failure records carry
/// neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: TranscriptRole,
    pub text: String,
    pub is_pending: bool,
    pub latency_ms: Option<u64>,
    pub sources: Option<Vec<String>>,
}

impl Message {
    pub fn new(role: TranscriptRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            is_pending: false,
            latency_ms: None,
            sources: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Assistant, text)
    }

    /// Placeholder shown while a request is in flight.
    pub fn pending() -> Self {
        Self {
            is_pending: true,
            ..Self::assistant(PENDING_PLACEHOLDER)
        }
    }

    pub fn answered(text: impl Into<String>, sources: Vec<String>, latency_ms: u64) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            sources: Some(sources),
            ..Self::assistant(text)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    /// Sources worth rendering: present and non-empty.
    pub fn visible_sources(&self) -> Option<&[String]> {
        self.sources
            .as_deref()
            .filter(|sources| !sources.is_empty())
    }
}
