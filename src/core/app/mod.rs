//! Application state and the request lifecycle.
//!
//! [`App`] owns the transcript, the single-flight request state and the view
//! state. It is only ever mutated through [`apply_actions`], which returns the
//! side effects (outbound requests) for the caller to execute.

use std::time::Instant;

use crate::core::ask_service::ServiceTarget;
use crate::core::config::Config;
use crate::core::transcript::Transcript;

pub mod actions;
pub mod session;
pub mod ui_state;


pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use session::{resolve_target, SessionContext, SessionError};
pub use ui_state::UiState;

/// Whether a request is outstanding. At most one is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Awaiting { request_id: u64, started_at: Instant },
}

impl RequestState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, RequestState::Awaiting { .. })
    }

    pub fn awaiting_request_id(&self) -> Option<u64> {
        match self {
            RequestState::Awaiting { request_id, .. } => Some(*request_id),
            RequestState::Idle => None,
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        match self {
            RequestState::Awaiting { started_at, .. } => Some(*started_at),
            RequestState::Idle => None,
        }
    }
}

pub struct App {
    pub session: SessionContext,
    pub transcript: Transcript,
    pub request: RequestState,
    pub ui: UiState,
}

impl App {
    pub fn new(config: &Config, client: reqwest::Client, target: ServiceTarget) -> Self {
        Self {
            session: SessionContext::new(client, target),
            transcript: Transcript::new(config.greeting()),
            request: RequestState::Idle,
            ui: UiState::new(config.title()),
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.request.is_awaiting()
    }

    /// True when `request_id` belongs to the request currently in flight.
    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.request.awaiting_request_id() == Some(request_id)
    }

    /// Send is possible: idle and the input holds something besides whitespace.
    pub fn can_send(&self) -> bool {
        !self.is_awaiting() && !self.ui.input_is_blank()
    }
}
